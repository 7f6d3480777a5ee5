//! Envelope serialization helpers.
//!
//! Serde already provides JSON serialization. This module centralizes the
//! helpers used by the service and transport and keeps formatting stable.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::MecError;
use crate::ir::envelope::{EligibilityRequest, ErrorInfo, ErrorKind};
use crate::ir::validation::MAX_REQUEST_JSON_BYTES;

/// Serialize a value to pretty JSON.
///
/// # Errors
///
/// Returns `MecError::Internal` if serialization fails.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, MecError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| MecError::internal(format!("serialize JSON: {e}")))
}

/// Deserialize a value from JSON.
///
/// Callers should then invoke `validate()` on requests before executing.
///
/// # Errors
///
/// Returns `MecError::Internal` if deserialization fails.
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T, MecError> {
    serde_json::from_str::<T>(s).map_err(|e| MecError::internal(format!("deserialize JSON: {e}")))
}

/// Decode request bytes, enforcing the payload size limit.
///
/// # Errors
///
/// Returns an [`ErrorKind::MalformedRequest`] report for empty, oversized
/// or unparseable payloads.
pub fn decode_request(bytes: &[u8]) -> Result<EligibilityRequest, ErrorInfo> {
    if bytes.is_empty() {
        return Err(ErrorInfo::new(ErrorKind::MalformedRequest, "request body is required"));
    }
    if bytes.len() > MAX_REQUEST_JSON_BYTES {
        return Err(ErrorInfo::new(
            ErrorKind::MalformedRequest,
            format!("request exceeds maximum size of {MAX_REQUEST_JSON_BYTES} bytes"),
        ));
    }
    serde_json::from_slice(bytes)
        .map_err(|e| {
            ErrorInfo::new(ErrorKind::MalformedRequest, format!("invalid request JSON: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;

    #[test]
    fn pretty_json_decodes_back() {
        let req = EligibilityRequest::new("dmpa")
            .with_intent(Intent::Continuation)
            .with_conditions(["VTE_HISTORY"]);
        let json = to_json_pretty(&req).unwrap();
        assert!(json.contains('\n'));
        let decoded: EligibilityRequest = from_json(&json).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn decode_rejects_empty_and_oversized() {
        assert_eq!(decode_request(b"").unwrap_err().kind, ErrorKind::MalformedRequest);

        let big = vec![b' '; MAX_REQUEST_JSON_BYTES + 1];
        let err = decode_request(&big).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
        assert!(err.message.contains("maximum size"));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_request(b"{\"method\":").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
        let err = decode_request(b"{\"conditions\":[]}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
    }
}
