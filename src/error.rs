//! Error types for the de novo filter library.

use thiserror::Error;

use crate::pedigree::TrioRole;

/// Errors that can occur while resolving a trio or filtering a VCF.
///
/// Every variant is fatal for a run. Records that simply do not look de novo
/// are dropped and never reported here.
#[derive(Error, Debug)]
pub enum DenovoFilterError {
    /// The pedigree did not yield one father, one mother and one proband.
    #[error("Pedigree does not define the trio role(s): {}", join_roles(.roles))]
    MissingTrioRole { roles: Vec<TrioRole> },

    /// A trio member has an empty individual ID.
    #[error("Pedigree gives an empty individual ID for the {role}")]
    EmptySampleId { role: TrioRole },

    /// One individual fills two trio roles.
    #[error("Individual {id:?} is assigned both the {first} and the {second} role")]
    DuplicateSampleId {
        id: String,
        first: TrioRole,
        second: TrioRole,
    },

    /// A pedigree line could not be parsed.
    #[error("Pedigree parse error on line {line}: {message}")]
    PedigreeParseError { line: usize, message: String },

    /// The `#CHROM` header line was never found.
    #[error("No #CHROM header line found in VCF")]
    MissingColumnHeader,

    /// A trio member has no sample column in the `#CHROM` header line.
    #[error("Sample {0:?} not found in the VCF #CHROM header")]
    UnresolvedSampleColumn(String),

    /// A data row's FORMAT column does not lead with the GT tag.
    #[error("Malformed FORMAT field on line {line}: expected leading GT, found {found:?}")]
    MalformedFormatField { line: usize, found: String },

    /// Failed to parse a VCF data row.
    #[error("Row parse error on line {line}: {message}")]
    RowParseError { line: usize, message: String },

    /// Reading the inputs or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_roles(roles: &[TrioRole]) -> String {
    roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for de novo filter operations.
pub type Result<T> = std::result::Result<T, DenovoFilterError>;
