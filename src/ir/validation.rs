//! Envelope validation.
//!
//! Deserialized requests are checked before any processing, so malformed
//! or adversarial JSON is rejected with a validation error rather than
//! reaching the resolver.

use crate::error::ValidationError;
use crate::ir::envelope::{EligibilityRequest, PROTOCOL_VERSION};

/// Maximum size of a request JSON payload.
pub const MAX_REQUEST_JSON_BYTES: usize = 64 * 1024;

/// Upper bound on the method field.
pub const MAX_METHOD_LEN: usize = 64;

/// Upper bound on raw condition entries, before deduplication.
pub const MAX_REQUEST_CONDITIONS: usize = 2048;

impl EligibilityRequest {
    /// Validates this request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the version is unsupported, the method
    /// is empty or too long, or too many condition entries are given.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != PROTOCOL_VERSION {
            return Err(ValidationError::UnsupportedVersion {
                version: self.version.clone(),
            });
        }

        let method = self.method.trim();
        if method.is_empty() {
            return Err(ValidationError::MissingField {
                field: "method".to_string(),
            });
        }
        if method.len() > MAX_METHOD_LEN {
            return Err(ValidationError::FieldTooLong {
                field: "method".to_string(),
                max_length: MAX_METHOD_LEN,
            });
        }

        if self.conditions.len() > MAX_REQUEST_CONDITIONS {
            return Err(ValidationError::TooManyConditions {
                count: self.conditions.len(),
                max: MAX_REQUEST_CONDITIONS,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_request() {
        assert!(EligibilityRequest::new("pop").validate().is_ok());
    }

    #[test]
    fn rejects_unknown_version() {
        let mut req = EligibilityRequest::new("pop");
        req.version = "2.0".to_string();
        assert!(matches!(
            req.validate(),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_blank_or_long_method() {
        assert!(matches!(
            EligibilityRequest::new("  ").validate(),
            Err(ValidationError::MissingField { .. })
        ));
        assert!(matches!(
            EligibilityRequest::new("x".repeat(MAX_METHOD_LEN + 1)).validate(),
            Err(ValidationError::FieldTooLong { .. })
        ));
    }

    #[test]
    fn rejects_too_many_entries() {
        let req = EligibilityRequest::new("pop")
            .with_conditions(std::iter::repeat("AF").take(MAX_REQUEST_CONDITIONS + 1));
        assert!(matches!(
            req.validate(),
            Err(ValidationError::TooManyConditions { .. })
        ));
    }
}
