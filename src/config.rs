//! Service configuration.
//!
//! Defaults, overridden by environment variables, overridden in turn by
//! command-line flags in the server binary.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ir::MAX_REQUEST_CONDITIONS;

/// Environment variable for the bind address.
pub const ENV_ADDR: &str = "UKMEC_ADDR";
/// Environment variable for an external reference data file.
pub const ENV_TABLE: &str = "UKMEC_TABLE";
/// Environment variable for the per-request condition entry cap.
pub const ENV_MAX_REQUEST_CONDITIONS: &str = "UKMEC_MAX_REQUEST_CONDITIONS";

/// Default gRPC port.
pub const DEFAULT_PORT: u16 = 50061;

/// Configuration for [`EligibilityService`](crate::EligibilityService) and the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the server binds to.
    pub addr: SocketAddr,
    /// Reference data file; the embedded table is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_path: Option<PathBuf>,
    /// Maximum raw condition entries in one request envelope.
    pub max_request_conditions: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            table_path: None,
            max_request_conditions: MAX_REQUEST_CONDITIONS,
        }
    }
}

impl ServiceConfig {
    /// Defaults with overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` if a variable is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// As [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(addr) = lookup(ENV_ADDR) {
            config.set_addr(&addr)?;
        }
        if let Some(path) = lookup(ENV_TABLE).filter(|p| !p.trim().is_empty()) {
            config.table_path = Some(PathBuf::from(path));
        }
        if let Some(max) = lookup(ENV_MAX_REQUEST_CONDITIONS) {
            config.set_max_request_conditions(&max)?;
        }
        Ok(config)
    }

    /// Parses and sets the bind address.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` for an unparseable address.
    pub fn set_addr(&mut self, value: &str) -> Result<(), ValidationError> {
        self.addr = value.trim().parse().map_err(|e| ValidationError::InvalidField {
            field: "addr".to_string(),
            reason: format!("'{value}': {e}"),
        })?;
        Ok(())
    }

    /// Parses and sets the request entry cap.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` unless the value is an
    /// integer in `1..=MAX_REQUEST_CONDITIONS`.
    pub fn set_max_request_conditions(&mut self, value: &str) -> Result<(), ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidField {
            field: "max_request_conditions".to_string(),
            reason,
        };
        let max: usize = value
            .trim()
            .parse()
            .map_err(|e| invalid(format!("'{value}': {e}")))?;
        if max == 0 || max > MAX_REQUEST_CONDITIONS {
            return Err(invalid(format!("{max} is outside [1, {MAX_REQUEST_CONDITIONS}]")));
        }
        self.max_request_conditions = max;
        Ok(())
    }
}
