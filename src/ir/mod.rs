//! Intermediate Representation (IR) for eligibility requests.
//!
//! The IR provides a serializable, transportable format for requests and
//! responses. This enables:
//! - Network transport between clients and servers
//! - Request logging and replay
//! - Debugging and inspection

mod envelope;
mod serialization;
mod validation;

pub use envelope::{
    EligibilityRequest, EligibilityResponse, ErrorInfo, ErrorKind, PROTOCOL_VERSION,
};

pub use serialization::{decode_request, from_json, to_json_pretty};
pub use validation::{MAX_METHOD_LEN, MAX_REQUEST_CONDITIONS, MAX_REQUEST_JSON_BYTES};
