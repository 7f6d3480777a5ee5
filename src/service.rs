//! Programmatic service surface.
//!
//! [`EligibilityService`] wraps a [`Resolver`] over the reference table and
//! exposes what a presentation layer needs: the method and condition
//! catalogues, resolution, and the canonical definition texts. The
//! envelope handlers never fail; errors become the response's `error`
//! field.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::category::Category;
use crate::condition::ConditionInfo;
use crate::config::ServiceConfig;
use crate::error::{MecResult, ValidationError};
use crate::intent::Intent;
use crate::ir::{self, EligibilityRequest, EligibilityResponse, ErrorInfo, PROTOCOL_VERSION};
use crate::method::{Method, MethodInfo};
use crate::resolver::{Resolution, Resolver, MAX_RULE_CAVEAT};
use crate::selection::Selection;
use crate::table::ReferenceTable;

/// Facade over the resolver and reference table.
#[derive(Debug, Clone)]
pub struct EligibilityService {
    resolver: Resolver<ReferenceTable>,
    max_request_conditions: usize,
}

impl EligibilityService {
    /// Creates a service over a loaded table with default limits.
    #[must_use]
    pub fn new(table: Arc<ReferenceTable>) -> Self {
        Self {
            resolver: Resolver::new(table),
            max_request_conditions: ir::MAX_REQUEST_CONDITIONS,
        }
    }

    /// Creates a service over a loaded table with configured limits.
    #[must_use]
    pub fn with_config(table: Arc<ReferenceTable>, config: &ServiceConfig) -> Self {
        Self {
            max_request_conditions: config.max_request_conditions.min(ir::MAX_REQUEST_CONDITIONS),
            ..Self::new(table)
        }
    }

    /// Loads the configured table (or the embedded one) and creates a service.
    ///
    /// # Errors
    ///
    /// Returns `MecError::Integrity` if the table cannot be loaded.
    pub fn from_config(config: &ServiceConfig) -> MecResult<Self> {
        let table = match &config.table_path {
            Some(path) => {
                info!(path = %path.display(), "Loading reference table from file");
                ReferenceTable::from_path(path)?
            }
            None => ReferenceTable::builtin()?,
        };
        Ok(Self::with_config(Arc::new(table), config))
    }

    /// The underlying table.
    #[must_use]
    pub fn table(&self) -> &ReferenceTable {
        self.resolver.table()
    }

    /// The underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &Resolver<ReferenceTable> {
        &self.resolver
    }

    /// All methods in display order.
    #[must_use]
    pub fn list_methods(&self) -> Vec<MethodInfo> {
        Method::ALL.into_iter().map(MethodInfo::from).collect()
    }

    /// All conditions in table order.
    #[must_use]
    pub fn list_conditions(&self) -> Vec<ConditionInfo> {
        self.table().conditions().cloned().collect()
    }

    /// Resolves a method code, intent and condition identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ukmec::{Category, EligibilityService, Intent, ReferenceTable};
    ///
    /// let service = EligibilityService::new(Arc::new(ReferenceTable::builtin().unwrap()));
    /// let category = service
    ///     .resolve("dmpa", Intent::Continuation, ["VTE_HISTORY", "CVD_MULTIPLE_RISK"])
    ///     .unwrap();
    /// assert_eq!(category, Category::Three);
    ///
    /// let err = service.resolve("ring", Intent::Initiation, ["AF"]).unwrap_err();
    /// assert!(err.is_invalid_method());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `MecError::Validation` for an unknown method code. Unknown
    /// or unusable identifiers are skipped, never errors.
    pub fn resolve<I, S>(&self, method: &str, intent: Intent, conditions: I) -> MecResult<Category>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selection = self.selection(method, intent, conditions)?;
        Ok(self.resolver.resolve(&selection))
    }

    /// Like [`resolve`](Self::resolve), with the per-condition breakdown.
    ///
    /// # Errors
    ///
    /// As [`resolve`](Self::resolve).
    pub fn resolve_detailed<I, S>(
        &self,
        method: &str,
        intent: Intent,
        conditions: I,
    ) -> MecResult<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selection = self.selection(method, intent, conditions)?;
        Ok(self.resolver.resolve_detailed(&selection))
    }

    fn selection<I, S>(&self, method: &str, intent: Intent, conditions: I) -> MecResult<Selection>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Selection::builder()
            .method_code(method)
            .intent(intent)
            .conditions(conditions)
            .build()?)
    }

    /// Canonical definition of a category.
    #[must_use]
    pub const fn category_definition(category: Category) -> &'static str {
        category.definition()
    }

    /// Canonical definition of an intent.
    #[must_use]
    pub const fn intent_definition(intent: Intent) -> &'static str {
        intent.definition()
    }

    /// Handles a request envelope. Never fails.
    #[must_use]
    pub fn handle(&self, request: EligibilityRequest) -> EligibilityResponse {
        let request_id = request.request_id;
        match self.try_handle(&request) {
            Ok(response) => {
                debug!(
                    %request_id,
                    method = %request.method,
                    category = ?response.category,
                    "Handled eligibility request"
                );
                response
            }
            Err(err) => {
                warn!(%request_id, kind = err.kind(), error = %err, "Rejected eligibility request");
                EligibilityResponse::failure(request_id, ErrorInfo::from(&err))
            }
        }
    }

    fn try_handle(&self, request: &EligibilityRequest) -> MecResult<EligibilityResponse> {
        request.validate()?;
        if request.conditions.len() > self.max_request_conditions {
            return Err(ValidationError::TooManyConditions {
                count: request.conditions.len(),
                max: self.max_request_conditions,
            }
            .into());
        }

        let mut conditions = match &request.profile {
            Some(profile) => profile.derive_conditions()?,
            None => Vec::new(),
        };
        conditions.extend(request.conditions.iter().cloned());

        let selection = self.selection(&request.method, request.intent, conditions)?;

        let (category, resolution) = if request.detailed {
            let resolution = self.resolver.resolve_detailed(&selection);
            (resolution.category, Some(resolution))
        } else {
            (self.resolver.resolve(&selection), None)
        };

        Ok(EligibilityResponse {
            caveat: Some(MAX_RULE_CAVEAT.to_string()),
            resolution,
            table_fingerprint: Some(self.table().fingerprint().to_hex()),
            ..EligibilityResponse::success(request.request_id, category)
        })
    }

    /// Handles a JSON-encoded request envelope and returns a JSON response.
    ///
    /// Never fails; undecodable input yields a `malformed_request` error
    /// with a nil request ID.
    #[must_use]
    pub fn handle_json(&self, bytes: &[u8]) -> Vec<u8> {
        let response = match ir::decode_request(bytes) {
            Ok(request) => self.handle(request),
            Err(info) => {
                warn!(error = %info.message, "Undecodable eligibility request");
                EligibilityResponse::failure(Uuid::nil(), info)
            }
        };
        encode_response(&response)
    }
}

fn encode_response(response: &EligibilityResponse) -> Vec<u8> {
    serde_json::to_vec(response).unwrap_or_else(|e| {
        error!(error = %e, "Failed to encode eligibility response");
        serde_json::json!({
            "version": PROTOCOL_VERSION,
            "request_id": response.request_id,
            "error": { "kind": "internal", "message": format!("failed to encode response: {e}") },
        })
        .to_string()
        .into_bytes()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ErrorKind;

    fn service() -> EligibilityService {
        EligibilityService::new(Arc::new(ReferenceTable::builtin().unwrap()))
    }

    #[test]
    fn catalogues() {
        let svc = service();
        let methods = svc.list_methods();
        assert_eq!(methods.len(), 7);
        assert_eq!(methods[0].method, Method::CuIud);
        assert_eq!(methods[6].label, "Female Sterilization");

        let conditions = svc.list_conditions();
        assert_eq!(conditions.len(), svc.table().len());
        assert_eq!(conditions[0].id.as_str(), "AGE_MENARCHE_TO_LT_20");
    }

    #[test]
    fn definitions() {
        assert!(EligibilityService::category_definition(Category::Four).starts_with("UKMEC 4"));
        assert!(
            EligibilityService::intent_definition(Intent::Continuation).starts_with("Continuation")
        );
    }

    #[test]
    fn invalid_method_is_distinct_from_no_conditions() {
        let svc = service();
        assert_eq!(
            svc.resolve("pop", Intent::Initiation, Vec::<String>::new()).unwrap(),
            Category::One
        );
        let err = svc.resolve("patch", Intent::Initiation, Vec::<String>::new()).unwrap_err();
        assert_eq!(err.kind(), "invalid_method");
    }

    #[test]
    fn handle_reports_errors_as_field() {
        let svc = service();
        let response = svc.handle(EligibilityRequest::new("patch").with_conditions(["AF"]));
        assert!(!response.is_success());
        assert_eq!(response.error.unwrap().kind, ErrorKind::InvalidMethod);
    }

    #[test]
    fn handle_success_carries_definition_and_caveat() {
        let svc = service();
        let response = svc.handle(EligibilityRequest::new("cu_iud").with_conditions(["PP_SEPSIS"]));
        assert!(response.is_success());
        assert_eq!(response.category, Some(Category::Four));
        assert_eq!(response.definition.as_deref(), Some(Category::Four.definition()));
        assert_eq!(response.caveat.as_deref(), Some(MAX_RULE_CAVEAT));
        assert!(response.resolution.is_none());
    }

    #[test]
    fn unusable_identifiers_are_skipped() {
        let svc = service();
        let long = "X".repeat(129);
        for extra in ["", "   ", long.as_str()] {
            assert_eq!(
                svc.resolve("cu_iud", Intent::Initiation, ["PP_SEPSIS", extra]).unwrap(),
                Category::Four
            );
        }

        let mut stale: Vec<String> = (0..512).map(|i| format!("STALE_{i}")).collect();
        stale.push("PP_SEPSIS".to_string());
        assert_eq!(svc.resolve("cu_iud", Intent::Initiation, stale).unwrap(), Category::Four);
    }

    #[test]
    fn configured_request_entry_cap() {
        let table = Arc::new(ReferenceTable::builtin().unwrap());
        let config = ServiceConfig {
            max_request_conditions: 1,
            ..ServiceConfig::default()
        };
        let svc = EligibilityService::with_config(table, &config);

        let response = svc.handle(EligibilityRequest::new("pop").with_conditions(["AF", "RA"]));
        assert_eq!(response.error.unwrap().kind, ErrorKind::MalformedRequest);

        // Programmatic resolution is not bounded by the envelope cap.
        assert!(svc.resolve("pop", Intent::Initiation, ["AF", "RA"]).is_ok());
    }
}
