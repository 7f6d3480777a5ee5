//! Raw shape of the reference data file.
//!
//! These types mirror the JSON document one-to-one and perform no
//! validation of their own; the loader checks integrity when turning them
//! into a [`ReferenceTable`](super::ReferenceTable). They are public so
//! callers and tests can assemble small synthetic tables in code.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::condition::ConditionGroup;
use crate::method::Method;

/// A whole reference data document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSource {
    /// Revision metadata.
    pub revision: RevisionSource,
    /// Condition rows, in display order.
    pub conditions: Vec<ConditionSource>,
}

impl TableSource {
    /// Creates an empty document with the given revision name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            revision: RevisionSource {
                name: name.into(),
                published: None,
                source: None,
            },
            conditions: Vec::new(),
        }
    }

    /// Appends a condition row.
    #[must_use]
    pub fn with_condition(mut self, condition: ConditionSource) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Revision metadata as written in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevisionSource {
    /// Human-readable revision name.
    pub name: String,
    /// Publication date of the source table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
    /// Citation of the source table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One condition row.
///
/// `ratings` maps a method code to `[initiation, continuation]`, where each
/// element is a category number or `null`. A `null` in place of the whole
/// pair is shorthand for `[null, null]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSource {
    /// Condition identifier.
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// Table section.
    pub group: ConditionGroup,
    /// Note for rows that need clinical review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    /// Per-method ratings keyed by method code.
    pub ratings: BTreeMap<String, Option<Vec<Option<i64>>>>,
}

impl ConditionSource {
    /// Creates a row with no ratings.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, group: ConditionGroup) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group,
            review: None,
            ratings: BTreeMap::new(),
        }
    }

    /// Sets the rating pair for one method.
    #[must_use]
    pub fn rating(
        mut self,
        method: Method,
        initiation: Option<i64>,
        continuation: Option<i64>,
    ) -> Self {
        self.ratings
            .insert(method.code().to_string(), Some(vec![initiation, continuation]));
        self
    }

    /// Sets the same category for both intents of every method.
    #[must_use]
    pub fn uniform(mut self, category: i64) -> Self {
        for method in Method::ALL {
            self = self.rating(method, Some(category), Some(category));
        }
        self
    }

    /// Marks a method as not applicable for both intents.
    #[must_use]
    pub fn not_applicable(mut self, method: Method) -> Self {
        self.ratings.insert(method.code().to_string(), None);
        self
    }

    /// Removes a method column entirely (for integrity tests).
    #[must_use]
    pub fn without(mut self, method: Method) -> Self {
        self.ratings.remove(method.code());
        self
    }

    /// Attaches a review note.
    #[must_use]
    pub fn review(mut self, note: impl Into<String>) -> Self {
        self.review = Some(note.into());
        self
    }
}
