//! The UKMEC reference table.
//!
//! An immutable mapping from condition identifier to one
//! [`CategoryPair`] per [`Method`], built once from a structured data file
//! and validated at load time. The UKMEC 2016 summary table is embedded in
//! the crate and available through [`ReferenceTable::builtin`].
//!
//! # Examples
//!
//! ```
//! use ukmec::{Category, Method, Rating, ReferenceTable};
//!
//! let table = ReferenceTable::builtin().unwrap();
//! let pair = table.lookup("PP_SEPSIS", Method::CuIud).unwrap();
//! assert_eq!(pair.initiation, Rating::Category(Category::Four));
//! assert!(table.lookup("NOT_A_REAL_KEY", Method::CuIud).is_err());
//! ```

mod source;
mod traits;
mod validation;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::category::{CategoryPair, Rating};
use crate::condition::{ConditionId, ConditionInfo, ConditionRecord};
use crate::error::{IntegrityError, LookupError};
use crate::method::Method;

pub use source::{ConditionSource, RevisionSource, TableSource};
pub use traits::EligibilityTable;

const BUILTIN_DATA: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/ukmec_2016.json"));

/// BLAKE3 digest of a table's identifiers and category pairs.
///
/// Labels, groups and review notes do not contribute, so relabelling a
/// condition does not change the fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    fn of(records: &[ConditionRecord]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for record in records {
            hasher.update(record.id().as_str().as_bytes());
            hasher.update(&[0]);
            for pair in record.pairs() {
                hasher.update(&[rating_byte(pair.initiation), rating_byte(pair.continuation)]);
            }
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

fn rating_byte(rating: Rating) -> u8 {
    rating.category().map_or(0, |c| c.value())
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Identity of a loaded data revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRevision {
    /// Human-readable revision name.
    pub name: String,
    /// Publication date of the source table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
    /// Citation of the source table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Content fingerprint.
    pub fingerprint: Fingerprint,
}

/// Validated, immutable reference table.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    revision: TableRevision,
    records: Vec<ConditionRecord>,
    index: HashMap<ConditionId, usize>,
}

impl ReferenceTable {
    /// Loads the embedded UKMEC 2016 table.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError` if the embedded data fails validation.
    pub fn builtin() -> Result<Self, IntegrityError> {
        Self::from_json(BUILTIN_DATA)
    }

    /// Parses and validates a JSON data document.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError::Parse` for malformed JSON, or the first
    /// integrity violation found.
    pub fn from_json(json: &str) -> Result<Self, IntegrityError> {
        let source: TableSource = serde_json::from_str(json).map_err(|e| IntegrityError::Parse {
            message: e.to_string(),
        })?;
        Self::from_source(source)
    }

    /// Reads, parses and validates a JSON data file.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError::Io` if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IntegrityError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading reference table");
        let json = std::fs::read_to_string(path).map_err(|e| IntegrityError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Validates an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns the first integrity violation found.
    pub fn from_source(source: TableSource) -> Result<Self, IntegrityError> {
        let TableSource { revision, conditions } = source;
        let records = validation::build_records(conditions)?;

        let index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id().clone(), i))
            .collect();

        let revision = TableRevision {
            name: revision.name,
            published: revision.published,
            source: revision.source,
            fingerprint: Fingerprint::of(&records),
        };

        let table = Self {
            revision,
            records,
            index,
        };

        info!(
            revision = %table.revision.name,
            conditions = table.len(),
            fingerprint = %table.revision.fingerprint,
            "Loaded reference table"
        );
        for record in table.flagged_for_review() {
            warn!(
                condition = %record.id(),
                note = record.review_note().unwrap_or_default(),
                "Reference row flagged for clinical review"
            );
        }

        Ok(table)
    }

    /// Returns the pair for a condition and method.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownCondition`] if the identifier is not present.
    pub fn lookup(&self, condition: &str, method: Method) -> Result<CategoryPair, LookupError> {
        EligibilityTable::lookup(self, condition, method)
    }

    /// Like [`lookup`](Self::lookup), with the method given as a string code.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownMethod`] for a code outside the fixed
    /// set, or [`LookupError::UnknownCondition`].
    pub fn lookup_code(
        &self,
        condition: &str,
        method_code: &str,
    ) -> Result<CategoryPair, LookupError> {
        let method = Method::from_code(method_code).ok_or_else(|| LookupError::UnknownMethod {
            method: method_code.to_string(),
        })?;
        self.lookup(condition, method)
    }

    /// Returns the full record for a condition.
    #[must_use]
    pub fn record(&self, condition: &str) -> Option<&ConditionRecord> {
        self.index.get(condition).map(|&i| &self.records[i])
    }

    /// Returns true if the identifier is present.
    #[must_use]
    pub fn contains(&self, condition: &str) -> bool {
        self.index.contains_key(condition)
    }

    /// Records in data-file order.
    pub fn records(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter()
    }

    /// Condition metadata in data-file order.
    pub fn conditions(&self) -> impl Iterator<Item = &ConditionInfo> {
        self.records.iter().map(ConditionRecord::info)
    }

    /// Number of conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a successfully constructed table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Revision metadata.
    #[must_use]
    pub fn revision(&self) -> &TableRevision {
        &self.revision
    }

    /// Content fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.revision.fingerprint
    }

    /// Records carrying a clinical review note.
    pub fn flagged_for_review(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter().filter(|r| r.review_note().is_some())
    }
}

impl EligibilityTable for ReferenceTable {
    fn pair(&self, condition: &str, method: Method) -> Option<CategoryPair> {
        self.index.get(condition).map(|&i| self.records[i].pair(method))
    }
}
