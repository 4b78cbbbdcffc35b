//! Genotype call parser using chumsky.
//!
//! Parses the GT value of a sample column, for example:
//! - `A/G` (diploid, two alleles)
//! - `G` (haploid, single allele)
//!
//! Calls are written with the record's literal allele sequences rather than
//! allele indices. Anything else (`./.`, `A|G`, `A/G/T`) is not a valid
//! call and never matches an allele set.

use std::fmt;

use chumsky::prelude::*;

/// A parsed genotype call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenotypeCall {
    /// A single allele, e.g. `G`.
    Haploid(String),
    /// Two slash-separated alleles, e.g. `A/G`.
    Diploid(String, String),
}

impl fmt::Display for GenotypeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenotypeCall::Haploid(allele) => write!(f, "{}", allele),
            GenotypeCall::Diploid(first, second) => write!(f, "{}/{}", first, second),
        }
    }
}

/// Create the genotype call parser.
pub fn parser() -> impl Parser<char, GenotypeCall, Error = Simple<char>> {
    let allele = filter(|c: &char| *c != '/')
        .repeated()
        .at_least(1)
        .collect::<String>();

    allele
        .clone()
        .then(just('/').ignore_then(allele).or_not())
        .then_ignore(end())
        .map(|(first, second)| match second {
            Some(second) => GenotypeCall::Diploid(first, second),
            None => GenotypeCall::Haploid(first),
        })
}

/// Parse a genotype call string.
pub fn parse_call(call: &str) -> Result<GenotypeCall, Vec<Simple<char>>> {
    parser().parse(call)
}

/// The hom-ref and het calls expected at one variant site.
///
/// Built per record from its own REF and ALT columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleSets {
    /// `ref/ref` and `ref`.
    pub hom_ref: [GenotypeCall; 2],
    /// `ref/alt` and `alt`.
    pub het: [GenotypeCall; 2],
}

impl AlleleSets {
    pub fn new(reference: &str, alternate: &str) -> Self {
        Self {
            hom_ref: [
                GenotypeCall::Diploid(reference.to_string(), reference.to_string()),
                GenotypeCall::Haploid(reference.to_string()),
            ],
            het: [
                GenotypeCall::Diploid(reference.to_string(), alternate.to_string()),
                GenotypeCall::Haploid(alternate.to_string()),
            ],
        }
    }

    /// Whether `call` is homozygous reference at this site.
    pub fn is_hom_ref(&self, call: &str) -> bool {
        Self::contains(&self.hom_ref, call)
    }

    /// Whether `call` is heterozygous (or haploid alternate) at this site.
    pub fn is_het(&self, call: &str) -> bool {
        Self::contains(&self.het, call)
    }

    fn contains(set: &[GenotypeCall], call: &str) -> bool {
        match parse_call(call) {
            Ok(parsed) => set.contains(&parsed),
            Err(_) => false,
        }
    }
}
