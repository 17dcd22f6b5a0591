//! Student directory loaded from CSV
//!
//! The directory is read once at startup and never written back. Records are
//! immutable for the lifetime of the process and shared behind an `Arc`.

use std::collections::BTreeMap;
use std::path::Path;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{HoosWhoError, Result};

/// CSV headers the directory file must provide
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "current_company",
    "current_role",
    "past_companies",
    "industries",
    "contact",
];

/// One classmate in the directory
///
/// Field order matches the CSV and the serialized prompt context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub current_company: String,
    pub current_role: String,
    /// Free text, usually comma separated
    pub past_companies: String,
    /// Free text, usually comma separated
    pub industries: String,
    pub contact: String,
}

/// Company with the number of students currently working there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company: String,
    pub count: usize,
}

/// In-memory student directory
#[derive(Debug, Clone, Default)]
pub struct Directory {
    records: Vec<StudentRecord>,
}

impl Directory {
    /// Build a directory from records already in memory
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    /// Load the directory from a CSV file
    ///
    /// Headers must include every entry of [`REQUIRED_COLUMNS`]; extra
    /// columns are ignored. Cell whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `HoosWhoError::Directory` if the file cannot be opened, a
    /// required column is missing, or a row cannot be decoded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| {
                HoosWhoError::Directory(format!("Failed to open {}: {}", path.display(), e))
            })?;
        let directory = Self::from_reader(reader)?;
        tracing::info!(
            "Loaded {} student records from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Parse a directory from in-memory CSV text
    ///
    /// # Errors
    ///
    /// Same conditions as [`Directory::load`]
    pub fn from_csv_str(data: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        Self::from_reader(reader)
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(HoosWhoError::Directory(format!(
                    "Missing required column: {}",
                    column
                ))
                .into());
            }
        }

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<StudentRecord>().enumerate() {
            let record = row.map_err(|e| {
                HoosWhoError::Directory(format!("Invalid row {}: {}", index + 1, e))
            })?;
            records.push(record);
        }

        Ok(Self { records })
    }

    /// Number of students
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the directory has no students
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in file order
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Companies represented, alphabetical, with head counts
    ///
    /// # Arguments
    ///
    /// * `filter` - Keep only companies containing this text (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use hooswho::directory::Directory;
    ///
    /// let csv = "name,current_company,current_role,past_companies,industries,contact\n\
    ///            Ann,ICF,Analyst,,Consulting,ann@x.edu\n\
    ///            Bo,Amazon,PM,,Tech,bo@x.edu\n\
    ///            Cy,ICF,Manager,,Consulting,cy@x.edu\n";
    /// let directory = Directory::from_csv_str(csv).unwrap();
    /// let companies = directory.companies(None);
    /// assert_eq!(companies[0].company, "Amazon");
    /// assert_eq!(companies[1].count, 2);
    /// ```
    pub fn companies(&self, filter: Option<&str>) -> Vec<CompanySummary> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.current_company.as_str()).or_insert(0) += 1;
        }

        let needle = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());

        counts
            .into_iter()
            .filter(|(company, _)| match &needle {
                Some(n) => company.to_lowercase().contains(n),
                None => true,
            })
            .map(|(company, count)| CompanySummary {
                company: company.to_string(),
                count,
            })
            .collect()
    }

    /// Random sample of up to `n` distinct classmates
    pub fn featured(&self, n: usize) -> Vec<StudentRecord> {
        let mut rng = rand::rng();
        self.records
            .choose_multiple(&mut rng, n.min(self.records.len()))
            .cloned()
            .collect()
    }

    /// Serialize every record for the model context
    ///
    /// Pretty-printed JSON array with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_context_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}
