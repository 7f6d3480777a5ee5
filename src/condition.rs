//! Conditions and their reference records.
//!
//! A condition is identified by a [`ConditionId`] (upper snake case, e.g.
//! `PP_SEPSIS`). Labels and groups are presentation metadata; only the
//! per-method category pairs feed the resolver.

use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category::CategoryPair;
use crate::error::ValidationError;
use crate::method::Method;

/// Maximum length of a condition identifier.
pub const MAX_CONDITION_ID_LEN: usize = 128;

static CONDITION_ID_PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn condition_id_pattern() -> Result<&'static Regex, ValidationError> {
    CONDITION_ID_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]*$"))
        .as_ref()
        .map_err(|e| ValidationError::InvalidField {
            field: "condition".to_string(),
            reason: format!("identifier pattern failed to compile: {e}"),
        })
}

/// Unique identifier of a condition in the reference table.
///
/// # Examples
///
/// ```
/// use ukmec::ConditionId;
///
/// let id = ConditionId::new("PP_SEPSIS").unwrap();
/// assert_eq!(id.as_str(), "PP_SEPSIS");
/// assert!(ConditionId::new("pp sepsis").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(String);

impl ConditionId {
    /// Creates a validated identifier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the value is empty, too long, or not
    /// upper snake case.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::MissingField {
                field: "condition".to_string(),
            });
        }
        if value.len() > MAX_CONDITION_ID_LEN {
            return Err(ValidationError::FieldTooLong {
                field: "condition".to_string(),
                max_length: MAX_CONDITION_ID_LEN,
            });
        }
        if !condition_id_pattern()?.is_match(&value) {
            return Err(ValidationError::InvalidField {
                field: "condition".to_string(),
                reason: format!("'{value}' is not an upper snake case identifier"),
            });
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ConditionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ConditionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Section of the UKMEC table a condition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionGroup {
    /// Age, parity, breastfeeding, postpartum, post-abortion, past ectopic, pelvic surgery.
    PersonalCharacteristics,
    /// Smoking
    Smoking,
    /// Obesity
    Obesity,
    /// Solid organ transplantation
    OrganTransplant,
    /// Cardiovascular disease, hypertension, VTE, arrhythmias.
    Cardiovascular,
    /// Headaches, migraine, epilepsy.
    Neurological,
    /// Depressive disorders
    DepressiveDisorders,
    /// Bleeding patterns, gynaecological and breast conditions.
    BreastAndReproductiveTract,
    /// PID, STIs, HIV, tuberculosis.
    Infections,
    /// Diabetes
    Endocrine,
    /// Hepatitis, cirrhosis, liver tumours, IBD.
    Gastrointestinal,
    /// Anaemias
    Anaemias,
    /// Rheumatic diseases
    Rheumatic,
}

impl ConditionGroup {
    /// Heading used when listing conditions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalCharacteristics => "Personal characteristics and reproductive history",
            Self::Smoking => "Smoking",
            Self::Obesity => "Obesity",
            Self::OrganTransplant => "Organ transplant",
            Self::Cardiovascular => "Cardiovascular disease",
            Self::Neurological => "Neurological conditions",
            Self::DepressiveDisorders => "Depressive disorders",
            Self::BreastAndReproductiveTract => "Breast and reproductive tract conditions",
            Self::Infections => "Infections",
            Self::Endocrine => "Endocrine conditions",
            Self::Gastrointestinal => "Gastrointestinal conditions",
            Self::Anaemias => "Anaemias",
            Self::Rheumatic => "Rheumatic diseases",
        }
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation metadata for a condition picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionInfo {
    /// Condition identifier.
    pub id: ConditionId,
    /// Human-readable label.
    pub label: String,
    /// Table section.
    pub group: ConditionGroup,
}

/// A condition with one category pair per method.
///
/// Only constructed by the reference table loader, which guarantees that
/// every method has a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionRecord {
    info: ConditionInfo,
    pairs: [CategoryPair; Method::COUNT],
    review: Option<String>,
}

impl ConditionRecord {
    pub(crate) fn new(
        info: ConditionInfo,
        pairs: [CategoryPair; Method::COUNT],
        review: Option<String>,
    ) -> Self {
        Self {
            info,
            pairs,
            review,
        }
    }

    /// Condition identifier.
    #[must_use]
    pub fn id(&self) -> &ConditionId {
        &self.info.id
    }

    /// Presentation metadata.
    #[must_use]
    pub fn info(&self) -> &ConditionInfo {
        &self.info
    }

    /// The category pair for a method.
    #[must_use]
    pub fn pair(&self, method: Method) -> CategoryPair {
        self.pairs[method.index()]
    }

    /// All pairs, indexed like [`Method::ALL`].
    #[must_use]
    pub fn pairs(&self) -> &[CategoryPair; Method::COUNT] {
        &self.pairs
    }

    /// Clinical review note, when the row is flagged as a possible transcription error.
    #[must_use]
    pub fn review_note(&self) -> Option<&str> {
        self.review.as_deref()
    }
}
