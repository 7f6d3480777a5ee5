//! gRPC transport layer.
//!
//! The canonical protocol surface is the JSON envelope in [`crate::ir`].
//! This transport carries `EligibilityRequest` as JSON bytes and returns
//! JSON-serialized responses. Application errors travel inside the
//! response envelope; only transport-level problems become a `Status`.

use std::sync::Arc;

use serde::Serialize;
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::ir::{EligibilityResponse, MAX_REQUEST_JSON_BYTES};
use crate::service::EligibilityService;

pub mod proto {
    #![allow(missing_docs, clippy::pedantic)]
    tonic::include_proto!("ukmec");
}

use proto::eligibility_server::{Eligibility, EligibilityServer};

/// Maximum size of a response JSON payload.
const MAX_RESPONSE_JSON_BYTES: usize = 1024 * 1024; // 1 MiB

/// gRPC service implementation.
#[derive(Debug, Clone)]
pub struct EligibilityGrpc {
    service: Arc<EligibilityService>,
}

impl EligibilityGrpc {
    /// Wraps a service.
    #[must_use]
    pub fn new(service: Arc<EligibilityService>) -> Self {
        Self { service }
    }

    /// Converts into a tonic server.
    #[must_use]
    pub fn into_server(self) -> EligibilityServer<Self> {
        EligibilityServer::new(self)
    }
}

fn invalid_argument(msg: impl Into<String>) -> Status {
    Status::invalid_argument(msg.into())
}

fn check_request_bytes(bytes: &[u8]) -> Result<(), Status> {
    if bytes.is_empty() {
        return Err(invalid_argument("request_json is required"));
    }
    if bytes.len() > MAX_REQUEST_JSON_BYTES {
        return Err(invalid_argument("request_json exceeds maximum size"));
    }
    Ok(())
}

fn encode_json<T: Serialize>(value: &T, max: usize) -> Result<Vec<u8>, Status> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| Status::internal(format!("failed to serialize response JSON: {e}")))?;
    if bytes.len() > max {
        return Err(Status::resource_exhausted("serialized JSON exceeds size limit"));
    }
    Ok(bytes)
}

#[tonic::async_trait]
impl Eligibility for EligibilityGrpc {
    async fn resolve(
        &self,
        request: Request<proto::ResolveRequest>,
    ) -> Result<Response<proto::ResolveResponse>, Status> {
        let req = request.into_inner();
        check_request_bytes(&req.request_json)?;

        let response_json = self.service.handle_json(&req.request_json);
        if response_json.len() > MAX_RESPONSE_JSON_BYTES {
            return Err(Status::resource_exhausted("serialized JSON exceeds size limit"));
        }
        debug!(bytes = response_json.len(), "Resolve RPC completed");
        Ok(Response::new(proto::ResolveResponse { response_json }))
    }

    async fn list_methods(
        &self,
        _request: Request<proto::ListRequest>,
    ) -> Result<Response<proto::ListResponse>, Status> {
        let items_json = encode_json(&self.service.list_methods(), MAX_RESPONSE_JSON_BYTES)?;
        Ok(Response::new(proto::ListResponse { items_json }))
    }

    async fn list_conditions(
        &self,
        _request: Request<proto::ListRequest>,
    ) -> Result<Response<proto::ListResponse>, Status> {
        let items_json = encode_json(&self.service.list_conditions(), MAX_RESPONSE_JSON_BYTES)?;
        Ok(Response::new(proto::ListResponse { items_json }))
    }
}

/// Decodes a `ResolveResponse` payload on the client side.
///
/// # Errors
///
/// Returns `Status::internal` if the payload is not a valid response envelope.
pub fn decode_response(bytes: &[u8]) -> Result<EligibilityResponse, Status> {
    serde_json::from_slice(bytes)
        .map_err(|e| Status::internal(format!("invalid response JSON: {e}")))
}
