//! Request and response envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;
use crate::error::{MecError, ValidationError};
use crate::intake::PatientProfile;
use crate::intent::Intent;
use crate::resolver::Resolution;

/// Current protocol version.
pub const PROTOCOL_VERSION: &str = "1.0";

fn default_version() -> String {
    PROTOCOL_VERSION.to_string()
}

/// A resolution request.
///
/// Every request carries:
/// - Protocol versioning for forward/backward compatibility
/// - Request tracking via unique IDs
/// - Timestamp for audit logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRequest {
    /// Protocol version (e.g., "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Unique identifier for this request.
    #[serde(default = "Uuid::new_v4")]
    pub request_id: Uuid,

    /// When this request was created.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Method code or label.
    pub method: String,

    /// Initiation or continuation.
    #[serde(default)]
    pub intent: Intent,

    /// Condition identifiers.
    #[serde(default)]
    pub conditions: Vec<String>,

    /// Raw patient inputs; derived identifiers are added to `conditions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<PatientProfile>,

    /// Include the per-condition breakdown in the response.
    #[serde(default)]
    pub detailed: bool,
}

impl EligibilityRequest {
    /// Creates a request for a method with no conditions.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            method: method.into(),
            intent: Intent::Initiation,
            conditions: Vec::new(),
            profile: None,
            detailed: false,
        }
    }

    /// Sets the intent.
    #[must_use]
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    /// Adds condition identifiers.
    #[must_use]
    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.extend(conditions.into_iter().map(Into::into));
        self
    }

    /// Attaches raw patient inputs.
    #[must_use]
    pub fn with_profile(mut self, profile: PatientProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Requests the per-condition breakdown.
    #[must_use]
    pub fn detailed(mut self) -> Self {
        self.detailed = true;
        self
    }

    /// Sets a custom request ID (useful for correlation).
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Machine-readable failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Method code outside the fixed set.
    InvalidMethod,
    /// Input failed validation.
    Validation,
    /// Request bytes were not a valid envelope, or exceeded a size limit.
    MalformedRequest,
    /// Envelope version is not supported.
    UnsupportedVersion,
    /// Unexpected failure.
    Internal,
}

impl From<&MecError> for ErrorKind {
    fn from(err: &MecError) -> Self {
        match err {
            _ if err.is_invalid_method() => Self::InvalidMethod,
            MecError::Validation(ValidationError::UnsupportedVersion { .. }) => {
                Self::UnsupportedVersion
            }
            MecError::Validation(ValidationError::TooManyConditions { .. }) => {
                Self::MalformedRequest
            }
            MecError::Validation(_) | MecError::Lookup(_) => Self::Validation,
            MecError::Integrity(_) | MecError::Internal { .. } => Self::Internal,
        }
    }
}

/// Error reported inside a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Failure class.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    /// Creates an error report.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&MecError> for ErrorInfo {
    fn from(err: &MecError) -> Self {
        let message = match err {
            MecError::Validation(v) => v.to_string(),
            MecError::Lookup(l) => l.to_string(),
            other => other.to_string(),
        };
        Self::new(ErrorKind::from(err), message)
    }
}

/// A resolution response. Exactly one of `category` and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResponse {
    /// Protocol version.
    pub version: String,

    /// Echo of the request ID.
    pub request_id: Uuid,

    /// When the response was produced.
    pub timestamp: DateTime<Utc>,

    /// Final category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Canonical definition of the final category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Note on the worst-case rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveat: Option<String>,

    /// Per-condition breakdown, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,

    /// Fingerprint of the table that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_fingerprint: Option<String>,

    /// Failure report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl EligibilityResponse {
    fn empty(request_id: Uuid) -> Self {
        Self {
            version: default_version(),
            request_id,
            timestamp: Utc::now(),
            category: None,
            definition: None,
            caveat: None,
            resolution: None,
            table_fingerprint: None,
            error: None,
        }
    }

    /// A successful response.
    #[must_use]
    pub fn success(request_id: Uuid, category: Category) -> Self {
        Self {
            category: Some(category),
            definition: Some(category.definition().to_string()),
            ..Self::empty(request_id)
        }
    }

    /// A failed response.
    #[must_use]
    pub fn failure(request_id: Uuid, error: ErrorInfo) -> Self {
        Self {
            error: Some(error),
            ..Self::empty(request_id)
        }
    }

    /// Returns true if the response carries a category.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.category.is_some()
    }
}
