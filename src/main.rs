//! Command line entry point: filter a trio VCF for de novo candidates.

#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    name = "denovo-filter",
    version,
    about = "Keep candidate de novo variants of a family trio",
    long_about = "Reads a trio VCF and its PED pedigree and writes a VCF holding all meta \
                  lines plus the PASS records where both parents are homozygous reference \
                  and the proband is heterozygous"
)]
struct Cli {
    /// Input VCF (plain or .gz)
    input_vcf: PathBuf,

    /// Input PED pedigree with one father, one mother and one affected child
    input_ped: PathBuf,

    /// Output VCF (gzip-compressed if ending in .gz)
    output_vcf: PathBuf,

    /// Verbosity of the program
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    debug!("args: {:#?}", cli);
    info!("filtering {:?} with pedigree {:?}", cli.input_vcf, cli.input_ped);

    let stats = denovo_filter::run(&cli.input_vcf, &cli.input_ped, &cli.output_vcf)
        .context("de novo filtering failed")?;

    info!(
        "wrote {} de novo candidate(s) to {:?}",
        stats.retained, cli.output_vcf
    );
    Ok(())
}
