//! VCF data row view.
//!
//! Splits a data line into its tab-separated columns once and exposes the
//! fixed columns through named accessors.

use crate::error::{DenovoFilterError, Result};

/// The FORMAT key every row must lead with.
pub const GENOTYPE_TAG: &str = "GT";

/// The FILTER value of records that passed all filters.
pub const PASS: &str = "PASS";

const REF_COLUMN: usize = 3;
const ALT_COLUMN: usize = 4;
const FILTER_COLUMN: usize = 6;
const FORMAT_COLUMN: usize = 8;

/// A VCF data row borrowed from its source line.
#[derive(Debug, Clone)]
pub struct VcfRow<'a> {
    /// 1-based line number in the source file.
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> VcfRow<'a> {
    /// Split a data line and check its structure.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-based line number, used in error messages
    /// * `text` - The data line without its line terminator
    ///
    /// # Errors
    ///
    /// `RowParseError` if there is no FORMAT column, `MalformedFormatField`
    /// if FORMAT does not start with `GT`.
    pub fn parse(line: usize, text: &'a str) -> Result<Self> {
        let fields: Vec<&str> = text.split('\t').collect();

        if fields.len() <= FORMAT_COLUMN {
            return Err(DenovoFilterError::RowParseError {
                line,
                message: format!(
                    "expected at least {} columns, got {}",
                    FORMAT_COLUMN + 1,
                    fields.len()
                ),
            });
        }

        let row = Self { line, fields };
        let leading_key = row.format().split(':').next().unwrap_or_default();
        if leading_key != GENOTYPE_TAG {
            return Err(DenovoFilterError::MalformedFormatField {
                line,
                found: row.format().to_string(),
            });
        }

        Ok(row)
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn chrom(&self) -> &'a str {
        self.fields[0]
    }

    pub fn pos(&self) -> &'a str {
        self.fields[1]
    }

    /// REF column.
    pub fn reference(&self) -> &'a str {
        self.fields[REF_COLUMN]
    }

    /// ALT column, unsplit.
    pub fn alternate(&self) -> &'a str {
        self.fields[ALT_COLUMN]
    }

    /// FILTER column, unsplit.
    pub fn filter(&self) -> &'a str {
        self.fields[FILTER_COLUMN]
    }

    pub fn is_pass(&self) -> bool {
        self.filter() == PASS
    }

    pub fn format(&self) -> &'a str {
        self.fields[FORMAT_COLUMN]
    }

    /// The full sample column at `index` (0-based over all columns).
    pub fn sample(&self, index: usize) -> Result<&'a str> {
        self.fields
            .get(index)
            .copied()
            .ok_or_else(|| DenovoFilterError::RowParseError {
                line: self.line,
                message: format!(
                    "no sample column at index {} (row has {} columns)",
                    index,
                    self.fields.len()
                ),
            })
    }

    /// The GT value of the sample column at `index`: everything before the
    /// first colon.
    pub fn genotype_call(&self, index: usize) -> Result<&'a str> {
        let sample = self.sample(index)?;
        Ok(sample.split(':').next().unwrap_or_default())
    }
}
