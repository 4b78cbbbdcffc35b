//! VCF column header resolution.
//!
//! Locates the `#CHROM` line and maps each trio member to the index of its
//! sample column.

use std::io::BufRead;

use log::debug;

use crate::error::{DenovoFilterError, Result};
use crate::pedigree::TrioRoles;

/// First field of the VCF column header line.
pub const COLUMN_HEADER_MARKER: &str = "#CHROM";

/// Zero-based column positions of the trio's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleColumnIndex {
    pub father: usize,
    pub mother: usize,
    pub proband: usize,
}

impl SampleColumnIndex {
    /// Resolve sample columns from a `#CHROM` line.
    ///
    /// # Errors
    ///
    /// `UnresolvedSampleColumn` naming the first trio member (father, then
    /// mother, then proband) that has no column.
    pub fn from_header_line(line: &str, trio: &TrioRoles) -> Result<Self> {
        let tokens: Vec<&str> = line.trim().split('\t').collect();
        let find = |id: &str| {
            tokens
                .iter()
                .position(|token| *token == id)
                .ok_or_else(|| DenovoFilterError::UnresolvedSampleColumn(id.to_string()))
        };

        Ok(Self {
            father: find(trio.father())?,
            mother: find(trio.mother())?,
            proband: find(trio.proband())?,
        })
    }
}

fn is_column_header(line: &str) -> bool {
    line.trim_end().split('\t').next() == Some(COLUMN_HEADER_MARKER)
}

/// Scan a VCF source up to its `#CHROM` line and resolve the trio's columns.
///
/// Reading stops at the `#CHROM` line; no data line is consumed.
///
/// # Arguments
///
/// * `reader` - The VCF source, positioned at its first line
/// * `trio` - The resolved trio
///
/// # Returns
///
/// The column index of each trio member.
pub fn resolve_sample_columns<R: BufRead>(
    mut reader: R,
    trio: &TrioRoles,
) -> Result<SampleColumnIndex> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(DenovoFilterError::MissingColumnHeader);
        }
        if is_column_header(&line) {
            let columns = SampleColumnIndex::from_header_line(&line, trio)?;
            debug!(
                "sample columns: father={} mother={} proband={}",
                columns.father, columns.mother, columns.proband
            );
            return Ok(columns);
        }
    }
}
