//! File-backed store of raw per-test-method coverage records.
//!
//! Exported coverage query results are ingested into a single JSON document.
//! Each record is unique on `(unit id, test id, test method)`; re-ingesting
//! the same export is a no-op. The store projects its records into
//! [`CoverageRecord`]s for the aggregation stage.

use crate::coverage::{CoverageRecord, LineSet};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default store location, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = ".covsuite/coverage.json";

/// `Id`/`Name` pair as exported for classes, triggers and test classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCoverage {
    #[serde(rename = "coveredLines", default)]
    pub covered_lines: LineSet,
    #[serde(rename = "uncoveredLines", default)]
    pub uncovered_lines: LineSet,
}

/// One exported coverage row: a test method's coverage of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "ApexClassOrTrigger", alias = "ApexClassorTrigger")]
    pub unit: Option<NamedRef>,
    #[serde(rename = "ApexTestClass")]
    pub test_class: Option<NamedRef>,
    #[serde(rename = "TestMethodName", default)]
    pub test_method: Option<String>,
    #[serde(rename = "Coverage", default)]
    pub coverage: LineCoverage,
}

/// Uniqueness key of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    unit_id: String,
    test_id: String,
    method: String,
}

impl StoredRecord {
    fn key(&self) -> Option<RecordKey> {
        let unit = self.unit.as_ref()?;
        let test = self.test_class.as_ref()?;
        Some(RecordKey {
            unit_id: unit.id.clone(),
            test_id: test.id.clone(),
            method: self.test_method.clone().unwrap_or_default(),
        })
    }

    fn to_coverage_record(&self) -> Option<CoverageRecord> {
        let unit = self.unit.as_ref()?;
        let test = self.test_class.as_ref()?;
        Some(CoverageRecord {
            unit_id: unit.id.clone(),
            unit_name: unit.name.clone(),
            test_id: test.id.clone(),
            test_name: test.name.clone(),
            covered_lines: self.coverage.covered_lines.clone(),
            uncovered_lines: self.coverage.uncovered_lines.clone(),
        })
    }
}

/// Either a query response (`{"records": [...], "done": true, ...}`) or a
/// bare array of records. The store file itself uses the first shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Response { records: Vec<StoredRecord> },
    Records(Vec<StoredRecord>),
}

impl RecordDocument {
    fn into_records(self) -> Vec<StoredRecord> {
        match self {
            Self::Response { records } | Self::Records(records) => records,
        }
    }
}

#[derive(Serialize)]
struct StoreDocument<'a> {
    records: &'a [StoredRecord],
}

/// Result of an ingest: how many of the offered records were new.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub inserted: usize,
    pub total: usize,
}

impl IngestSummary {
    pub fn duplicates(&self) -> usize {
        self.total - self.inserted
    }
}

impl std::ops::AddAssign for IngestSummary {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.total += other.total;
    }
}

/// Read records from an exported JSON file.
pub fn read_export(path: &Path) -> Result<Vec<StoredRecord>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::store(path, format!("failed to read: {e}")))?;
    let document: RecordDocument = serde_json::from_str(&contents)
        .map_err(|e| Error::store(path, format!("failed to parse: {e}")))?;
    Ok(document.into_records())
}

#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<StoredRecord>,
    keys: HashSet<RecordKey>,
}

impl RecordStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = Self {
            path,
            records: Vec::new(),
            keys: HashSet::new(),
        };

        if store.path.exists() {
            let records = read_export(&store.path)?;
            store.insert_many(records);
            log::debug!(
                "Opened store {} with {} record(s)",
                store.path.display(),
                store.records.len()
            );
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    /// Insert records whose key is not yet present. Records missing a unit
    /// or test class cannot be keyed and are skipped.
    pub fn insert_many(&mut self, records: impl IntoIterator<Item = StoredRecord>) -> IngestSummary {
        let mut summary = IngestSummary::default();

        for record in records {
            summary.total += 1;
            let Some(key) = record.key() else {
                log::warn!("Skipping coverage record without unit or test class");
                continue;
            };
            if self.keys.insert(key) {
                self.records.push(record);
                summary.inserted += 1;
            }
        }

        summary
    }

    /// Persist the store. Written to a sibling file first, then renamed
    /// into place.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(&StoreDocument {
            records: &self.records,
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Project every stored record into a [`CoverageRecord`].
    pub fn coverage_records(&self) -> Vec<CoverageRecord> {
        self.records
            .iter()
            .filter_map(StoredRecord::to_coverage_record)
            .collect()
    }

    /// Remove the store file. Returns whether there was anything to remove.
    pub fn clean(path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
