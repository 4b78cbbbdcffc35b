//! # De Novo Filter Library
//!
//! Filters the VCF of a sequenced family trio down to candidate de novo
//! variants.
//!
//! ## Features
//!
//! - Resolve father, mother and proband from a PED pedigree
//! - Map each trio member to its sample column in the VCF `#CHROM` header
//! - Stream records, keeping meta lines and de novo candidates in order
//! - Transparent gzip input and output
//!
//! ## Example
//!
//! ```rust
//! use denovo_filter::DenovoFilter;
//!
//! let ped = "FAM1\tCHILD\tDAD\tMOM\t2\t2\nFAM1\tDAD\t0\t0\t1\t1\nFAM1\tMOM\t0\t0\t2\t1\n";
//! let vcf = concat!(
//!     "##fileformat=VCFv4.2\n",
//!     "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tCHILD\tDAD\tMOM\n",
//!     "chr1\t100\t.\tA\tG\t50\tPASS\t.\tGT\tA/G\tA/A\tA/A\n",
//!     "chr1\t200\t.\tA\tG\t50\tPASS\t.\tGT\tA/A\tA/A\tA/A\n",
//! );
//!
//! let engine = DenovoFilter::from_pedigree(ped.as_bytes()).unwrap();
//! let columns = engine.resolve_columns(vcf.as_bytes()).unwrap();
//!
//! let mut out = Vec::new();
//! let stats = engine.filter(&columns, vcf.as_bytes(), &mut out).unwrap();
//! assert_eq!(stats.retained, 1);
//! assert!(String::from_utf8(out).unwrap().contains("chr1\t100\t"));
//! ```
//!
//! ## Inclusion Rule
//!
//! A data record is kept when all of the following hold:
//! - `FILTER` is exactly `PASS`
//! - the father's GT is `REF/REF` or `REF`
//! - the mother's GT is `REF/REF` or `REF`
//! - the proband's GT is `REF/ALT` or `ALT`
//!
//! Genotypes are compared using the record's literal allele sequences, so
//! `A/G` at a site with `REF=A`, `ALT=G` is heterozygous.

pub mod error;
pub mod filter;
pub mod genotype;
pub mod header;
pub mod io;
pub mod pedigree;
pub mod row;

use std::io::{BufRead, Write};
use std::path::Path;

use log::info;

pub use error::{DenovoFilterError, Result};
pub use filter::FilterStats;
pub use genotype::{AlleleSets, GenotypeCall};
pub use header::SampleColumnIndex;
pub use pedigree::{AffectedStatus, PedigreeRecord, Sex, TrioRole, TrioRoles};
pub use row::VcfRow;

use crate::filter::{filter_records, is_denovo};
use crate::header::resolve_sample_columns;
use crate::io::{open_read_maybe_gz, open_write_maybe_gz};

/// The filter engine for one trio.
///
/// Create an instance from a pedigree, resolve the trio's columns from the
/// VCF header, then stream the VCF through `filter`.
#[derive(Debug, Clone)]
pub struct DenovoFilter {
    trio: TrioRoles,
}

impl DenovoFilter {
    pub fn new(trio: TrioRoles) -> Self {
        Self { trio }
    }

    /// Create an engine from a PED source.
    ///
    /// # Example
    ///
    /// ```rust
    /// use denovo_filter::DenovoFilter;
    ///
    /// let ped = "F\tKID\tPA\tMA\t1\t2\nF\tPA\t0\t0\t1\t1\nF\tMA\t0\t0\t2\t1";
    /// let engine = DenovoFilter::from_pedigree(ped.as_bytes()).unwrap();
    /// assert_eq!(engine.trio().proband(), "KID");
    /// ```
    pub fn from_pedigree<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Self::new(TrioRoles::from_reader(reader)?))
    }

    pub fn trio(&self) -> &TrioRoles {
        &self.trio
    }

    /// Resolve the trio's sample columns from the start of a VCF source.
    pub fn resolve_columns<R: BufRead>(&self, reader: R) -> Result<SampleColumnIndex> {
        resolve_sample_columns(reader, &self.trio)
    }

    /// Evaluate a single data line.
    ///
    /// `line_no` is the 1-based position of `line` in its VCF and is only
    /// used in error reports.
    ///
    /// # Returns
    ///
    /// `true` if the line is a de novo candidate, `false` otherwise.
    pub fn evaluate(
        &self,
        columns: &SampleColumnIndex,
        line_no: usize,
        line: &str,
    ) -> Result<bool> {
        let row = VcfRow::parse(line_no, line.trim())?;
        is_denovo(&row, columns)
    }

    /// Stream a full VCF from `reader` to `writer`.
    ///
    /// `reader` must start at the first line of the VCF.
    pub fn filter<R: BufRead, W: Write>(
        &self,
        columns: &SampleColumnIndex,
        reader: R,
        writer: &mut W,
    ) -> Result<FilterStats> {
        filter_records(reader, writer, columns)
    }
}

/// Filter `input_vcf` for de novo candidates of the trio in `input_ped`.
///
/// The VCF is read twice: once up to its `#CHROM` line, then in full. The
/// output is only created once the pedigree and the sample columns have
/// been resolved. Paths ending in `.gz` are (de)compressed transparently.
pub fn run<P, Q, S>(input_vcf: P, input_ped: Q, output_vcf: S) -> Result<FilterStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: AsRef<Path>,
{
    let engine = DenovoFilter::from_pedigree(open_read_maybe_gz(&input_ped)?)?;
    info!("resolved trio: {}", engine.trio());

    let columns = engine.resolve_columns(open_read_maybe_gz(&input_vcf)?)?;

    let mut writer = open_write_maybe_gz(&output_vcf)?;
    let stats = engine.filter(&columns, open_read_maybe_gz(&input_vcf)?, &mut writer)?;
    writer.finish()?;
    info!(
        "kept {} of {} records ({} meta lines)",
        stats.retained, stats.records, stats.meta_lines
    );
    Ok(stats)
}
