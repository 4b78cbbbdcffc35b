//! Pedigree (PED) parser and trio role resolution.
//!
//! A pedigree is a headerless, tab-separated file with one individual per
//! line: family ID, individual ID, paternal ID, maternal ID, sex code and
//! affected-status code.

use std::fmt;
use std::io::BufRead;

use log::{debug, warn};

use crate::error::{DenovoFilterError, Result};

/// Sex as encoded in the fifth PED column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    /// Code `1`.
    Male,
    /// Code `2`.
    Female,
    /// Any other code.
    Unknown,
}

impl Sex {
    fn from_code(code: &str) -> Self {
        match code {
            "1" => Sex::Male,
            "2" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

/// Affected status as encoded in the sixth PED column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffectedStatus {
    /// Code `2`.
    Affected,
    /// Any other code, including missing (`0`/`-9`).
    Unaffected,
}

impl AffectedStatus {
    fn from_code(code: &str) -> Self {
        match code {
            "2" => AffectedStatus::Affected,
            _ => AffectedStatus::Unaffected,
        }
    }
}

/// One line of a pedigree file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedigreeRecord {
    pub family_id: String,
    /// Join key into the VCF sample columns.
    pub individual_id: String,
    pub paternal_id: String,
    pub maternal_id: String,
    pub sex: Sex,
    pub affected_status: AffectedStatus,
}

impl PedigreeRecord {
    /// Parse a single pedigree line.
    ///
    /// # Arguments
    ///
    /// * `line_no` - 1-based line number, used in error messages
    /// * `line` - The raw line; surrounding whitespace is ignored
    pub fn from_line(line_no: usize, line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.trim().split('\t').collect();

        if tokens.len() < 6 {
            return Err(DenovoFilterError::PedigreeParseError {
                line: line_no,
                message: format!("expected at least 6 columns, got {}", tokens.len()),
            });
        }

        Ok(Self {
            family_id: tokens[0].to_string(),
            individual_id: tokens[1].to_string(),
            paternal_id: tokens[2].to_string(),
            maternal_id: tokens[3].to_string(),
            sex: Sex::from_code(tokens[4]),
            affected_status: AffectedStatus::from_code(tokens[5]),
        })
    }
}

/// Read all non-empty lines of a pedigree source.
pub fn read_pedigree<R: BufRead>(reader: R) -> Result<Vec<PedigreeRecord>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(PedigreeRecord::from_line(i + 1, &line)?);
    }
    Ok(records)
}

/// One of the three roles in a trio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrioRole {
    Father,
    Mother,
    Proband,
}

impl fmt::Display for TrioRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrioRole::Father => write!(f, "father"),
            TrioRole::Mother => write!(f, "mother"),
            TrioRole::Proband => write!(f, "proband"),
        }
    }
}

/// The resolved sample IDs of a trio.
///
/// Built once from a pedigree and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrioRoles {
    father: String,
    mother: String,
    proband: String,
}

impl TrioRoles {
    /// Create a trio from known sample IDs.
    ///
    /// # Errors
    ///
    /// `EmptySampleId` if an ID is empty, `DuplicateSampleId` if one ID
    /// fills two roles.
    pub fn new(
        father: impl Into<String>,
        mother: impl Into<String>,
        proband: impl Into<String>,
    ) -> Result<Self> {
        let trio = Self {
            father: father.into(),
            mother: mother.into(),
            proband: proband.into(),
        };

        let roles = trio.roles();
        for (role, id) in roles {
            if id.is_empty() {
                return Err(DenovoFilterError::EmptySampleId { role });
            }
        }
        for (i, (first, id)) in roles.iter().enumerate() {
            if let Some((second, _)) = roles[i + 1..].iter().find(|(_, other)| other == id) {
                return Err(DenovoFilterError::DuplicateSampleId {
                    id: id.to_string(),
                    first: *first,
                    second: *second,
                });
            }
        }

        Ok(trio)
    }

    fn roles(&self) -> [(TrioRole, &str); 3] {
        [
            (TrioRole::Father, self.father.as_str()),
            (TrioRole::Mother, self.mother.as_str()),
            (TrioRole::Proband, self.proband.as_str()),
        ]
    }

    /// Assign trio roles from pedigree records.
    ///
    /// The affected individual becomes the proband. Among the unaffected
    /// individuals, the male becomes the father and the female the mother.
    /// If a role is matched more than once the last match wins.
    ///
    /// # Errors
    ///
    /// `MissingTrioRole` listing every role that no record filled, or the
    /// errors of [`TrioRoles::new`] when the filled roles clash.
    pub fn resolve<'a, I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a PedigreeRecord>,
    {
        let mut father: Option<&str> = None;
        let mut mother: Option<&str> = None;
        let mut proband: Option<&str> = None;

        for record in records {
            let id = record.individual_id.as_str();
            let slot = match (record.affected_status, record.sex) {
                (AffectedStatus::Affected, _) => (TrioRole::Proband, &mut proband),
                (AffectedStatus::Unaffected, Sex::Male) => (TrioRole::Father, &mut father),
                (AffectedStatus::Unaffected, Sex::Female) => (TrioRole::Mother, &mut mother),
                (AffectedStatus::Unaffected, Sex::Unknown) => {
                    debug!("ignoring unaffected individual {} of unknown sex", id);
                    continue;
                }
            };
            let (role, current) = slot;
            if let Some(previous) = current.replace(id) {
                warn!("{} assigned twice: {} replaced by {}", role, previous, id);
            }
        }

        match (father, mother, proband) {
            (Some(father), Some(mother), Some(proband)) => Self::new(father, mother, proband),
            _ => {
                let roles = [
                    (TrioRole::Father, father),
                    (TrioRole::Mother, mother),
                    (TrioRole::Proband, proband),
                ]
                .into_iter()
                .filter(|(_, id)| id.is_none())
                .map(|(role, _)| role)
                .collect();
                Err(DenovoFilterError::MissingTrioRole { roles })
            }
        }
    }

    /// Read a pedigree and resolve its trio.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let records = read_pedigree(reader)?;
        Self::resolve(&records)
    }

    pub fn father(&self) -> &str {
        &self.father
    }

    pub fn mother(&self) -> &str {
        &self.mother
    }

    pub fn proband(&self) -> &str {
        &self.proband
    }
}

impl fmt::Display for TrioRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "father={} mother={} proband={}",
            self.father, self.mother, self.proband
        )
    }
}
