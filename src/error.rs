//! Error types for the eligibility lookup.
//!
//! Errors are strongly typed using thiserror and split by the layer that
//! raises them:
//! - [`IntegrityError`]: the reference data is broken (load time only)
//! - [`LookupError`]: a direct table query named something the table lacks
//! - [`ValidationError`]: caller input was rejected before any processing
//!
//! Unknown condition identifiers and not-applicable pairings are *not*
//! errors during resolution; they are skipped.

use thiserror::Error;

use crate::method::Method;

/// Reference-data integrity errors.
///
/// Raised only while constructing a [`ReferenceTable`](crate::ReferenceTable).
/// A table that fails any of these checks is never served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("Condition '{condition}' has no entry for method '{method}'")]
    MissingMethod {
        condition: String,
        method: Method,
    },

    #[error("Condition '{condition}' lists unknown method column '{column}'")]
    UnknownMethodColumn {
        condition: String,
        column: String,
    },

    #[error("Condition '{condition}', method '{method}': category {value} is out of range [1, 4]")]
    CategoryOutOfRange {
        condition: String,
        method: Method,
        value: i64,
    },

    #[error(
        "Condition '{condition}', method '{method}': expected an (initiation, continuation) pair, found {len} values"
    )]
    MalformedPair {
        condition: String,
        method: Method,
        len: usize,
    },

    #[error("Condition '{condition}' is defined more than once")]
    DuplicateCondition {
        condition: String,
    },

    #[error("Invalid condition identifier '{condition}': {reason}")]
    InvalidConditionId {
        condition: String,
        reason: String,
    },

    #[error("Condition '{condition}' has an empty label")]
    EmptyLabel {
        condition: String,
    },

    #[error("Reference table defines no conditions")]
    EmptyTable,

    #[error("Reference data is not valid: {message}")]
    Parse {
        message: String,
    },

    #[error("Failed to read reference data from {path}: {message}")]
    Io {
        path: String,
        message: String,
    },
}

/// Errors from direct table queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown condition: {condition}")]
    UnknownCondition {
        condition: String,
    },

    /// Only reachable through string-facing entry points; the [`Method`]
    /// enum itself cannot name an unknown method.
    #[error("Unknown method: {method}")]
    UnknownMethod {
        method: String,
    },
}

/// Validation errors for caller-supplied input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unknown contraceptive method '{value}'")]
    UnknownMethod {
        value: String,
    },

    #[error("Unknown intent '{value}' (expected 'initiation' or 'continuation')")]
    UnknownIntent {
        value: String,
    },

    #[error("Category {value} is out of range [1, 4]")]
    CategoryOutOfRange {
        value: i64,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Request has {count} condition entries, maximum is {max}")]
    TooManyConditions {
        count: usize,
        max: usize,
    },

    #[error("Field '{field}' value {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        field: String,
        reason: String,
    },

    #[error("Unsupported protocol version '{version}'")]
    UnsupportedVersion {
        version: String,
    },
}

/// Top-level error type for the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MecError {
    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl MecError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a reference-data integrity error.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Returns true if this is a lookup error.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if the caller named a method outside the fixed set.
    #[must_use]
    pub const fn is_invalid_method(&self) -> bool {
        matches!(
            self,
            Self::Validation(ValidationError::UnknownMethod { .. })
                | Self::Lookup(LookupError::UnknownMethod { .. })
        )
    }

    /// Stable machine-readable kind, used in response envelopes.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        if self.is_invalid_method() {
            return "invalid_method";
        }
        match self {
            Self::Validation(ValidationError::UnsupportedVersion { .. }) => "unsupported_version",
            Self::Integrity(_) => "integrity",
            Self::Lookup(_) => "lookup",
            Self::Validation(_) => "validation",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Result type alias for crate operations.
pub type MecResult<T> = Result<T, MecError>;
