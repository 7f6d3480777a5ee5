//! Resolver input.
//!
//! A [`Selection`] is a method, an intent and a set of condition
//! identifiers. Order is irrelevant and duplicates collapse. Identifiers
//! are not checked against any table here: unknown ones are tolerated and
//! skipped by the resolver. Entries that cannot name any condition (blank,
//! or longer than [`MAX_CONDITION_ID_LEN`]) are dropped the same way, so
//! the method is the only input that can fail a build.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::condition::MAX_CONDITION_ID_LEN;
use crate::error::ValidationError;
use crate::intent::Intent;
use crate::method::Method;

/// A validated query for the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    method: Method,
    intent: Intent,
    conditions: BTreeSet<String>,
}

impl Selection {
    /// Starts a fluent builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use ukmec::{Intent, Method, Selection};
    ///
    /// let selection = Selection::builder()
    ///     .method(Method::Chc)
    ///     .condition("SMOKE_AGE_GE_35_GE15")
    ///     .condition(" SMOKE_AGE_GE_35_GE15 ")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(selection.intent(), Intent::Initiation);
    /// assert_eq!(selection.len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> SelectionBuilder {
        SelectionBuilder::default()
    }

    /// The method being assessed.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Which half of each pair applies.
    #[must_use]
    pub const fn intent(&self) -> Intent {
        self.intent
    }

    /// Selected identifiers, in sorted order.
    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(String::as_str)
    }

    /// Returns true if the identifier is selected.
    #[must_use]
    pub fn contains(&self, condition: &str) -> bool {
        self.conditions.contains(condition)
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns true if no conditions are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Same conditions, different method.
    #[must_use]
    pub fn with_method(&self, method: Method) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }

    /// Same conditions, different intent.
    #[must_use]
    pub fn with_intent(&self, intent: Intent) -> Self {
        Self {
            intent,
            ..self.clone()
        }
    }
}

/// Builder for [`Selection`].
#[derive(Debug, Clone)]
pub struct SelectionBuilder {
    method: Option<Method>,
    method_code: Option<String>,
    intent: Intent,
    conditions: Vec<String>,
}

impl Default for SelectionBuilder {
    fn default() -> Self {
        Self {
            method: None,
            method_code: None,
            intent: Intent::Initiation,
            conditions: Vec::new(),
        }
    }
}

impl SelectionBuilder {
    /// Set the method (required).
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self.method_code = None;
        self
    }

    /// Set the method from a code or label, parsed at build time.
    #[must_use]
    pub fn method_code(mut self, code: impl Into<String>) -> Self {
        self.method = None;
        self.method_code = Some(code.into());
        self
    }

    /// Set the intent (default: initiation).
    #[must_use]
    pub fn intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    /// Add one condition identifier.
    #[must_use]
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add several condition identifiers.
    #[must_use]
    pub fn conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.extend(conditions.into_iter().map(Into::into));
        self
    }

    /// Build the selection.
    ///
    /// Identifiers are trimmed. Blank or overlong entries are skipped like
    /// any other identifier the table does not know.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if no method is set, or the method code
    /// is unknown.
    pub fn build(self) -> Result<Selection, ValidationError> {
        let method = match (self.method, self.method_code) {
            (Some(method), _) => method,
            (None, Some(code)) => code.parse()?,
            (None, None) => {
                return Err(ValidationError::MissingField {
                    field: "method".to_string(),
                })
            }
        };

        let conditions = self
            .conditions
            .iter()
            .map(|raw| raw.trim())
            .filter(|id| !id.is_empty() && id.len() <= MAX_CONDITION_ID_LEN)
            .map(str::to_string)
            .collect();

        Ok(Selection {
            method,
            intent: self.intent,
            conditions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_required() {
        let err = Selection::builder().condition("AF").build().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "method".to_string()
            }
        );
    }

    #[test]
    fn test_method_code_parsed_at_build() {
        let selection = Selection::builder().method_code("Cu-IUD").build().unwrap();
        assert_eq!(selection.method(), Method::CuIud);

        let err = Selection::builder().method_code("ring").build().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownMethod { .. }));
    }

    #[test]
    fn test_trims_and_deduplicates() {
        let selection = Selection::builder()
            .method(Method::Pop)
            .conditions(["AF", " AF", "AF  ", "EPILEPSY"])
            .build()
            .unwrap();
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("AF"));
        assert_eq!(selection.conditions().collect::<Vec<_>>(), ["AF", "EPILEPSY"]);
    }

    #[test]
    fn test_skips_blank_and_overlong_identifiers() {
        let selection = Selection::builder()
            .method(Method::Pop)
            .conditions(["AF", "   ", "", "A".repeat(MAX_CONDITION_ID_LEN + 1).as_str()])
            .build()
            .unwrap();
        assert_eq!(selection.conditions().collect::<Vec<_>>(), ["AF"]);

        let longest = "A".repeat(MAX_CONDITION_ID_LEN);
        let selection = Selection::builder()
            .method(Method::Pop)
            .condition(longest.clone())
            .build()
            .unwrap();
        assert!(selection.contains(&longest));
    }

    #[test]
    fn test_no_distinct_identifier_cap() {
        let ids: Vec<String> = (0..2_000).map(|i| format!("STALE_{i}")).collect();
        let selection = Selection::builder()
            .method(Method::Dmpa)
            .conditions(ids)
            .build()
            .unwrap();
        assert_eq!(selection.len(), 2_000);
    }

    #[test]
    fn test_with_method_keeps_conditions() {
        let selection = Selection::builder()
            .method(Method::Chc)
            .intent(Intent::Continuation)
            .condition("AF")
            .build()
            .unwrap();
        let other = selection.with_method(Method::Implant);
        assert_eq!(other.method(), Method::Implant);
        assert_eq!(other.intent(), Intent::Continuation);
        assert!(other.contains("AF"));
    }
}
