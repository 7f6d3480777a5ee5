//! Worst-case category resolution.
//!
//! For each selected identifier the resolver looks up the pair for the
//! selected method, takes the half for the selected intent, and keeps the
//! maximum. The floor is category 1. Unknown identifiers, fully
//! inapplicable pairs and a not-applicable half are skipped, never errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{Category, Rating};
use crate::intent::Intent;
use crate::method::Method;
use crate::selection::Selection;
use crate::table::{EligibilityTable, ReferenceTable};

/// Caveat to show alongside every resolved category.
pub const MAX_RULE_CAVEAT: &str = "The final category is the highest category among the selected \
     conditions. Overlapping category 2 or 3 conditions for the same risk factor may warrant \
     escalation beyond this maximum. Always compare with the official guidance and use clinical \
     judgement.";

/// One condition that contributed a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Condition identifier.
    pub condition: String,
    /// Category for the selected method and intent.
    pub category: Category,
}

/// Detailed account of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Method assessed.
    pub method: Method,
    /// Intent assessed.
    pub intent: Intent,
    /// Final category.
    pub category: Category,
    /// Conditions that carried a category, in selection order.
    pub contributions: Vec<Contribution>,
    /// Known conditions with no guidance for this method and intent.
    pub not_applicable: Vec<String>,
    /// Identifiers not present in the table.
    pub unknown: Vec<String>,
    /// Contributions equal to the final category. Empty when nothing
    /// contributed.
    pub drivers: Vec<String>,
}

impl Resolution {
    /// Returns true if no selected condition restricts the method.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.category == Category::LEAST_RESTRICTIVE
    }
}

/// Resolves selections against an eligibility table.
///
/// Cheap to clone; the table is shared.
#[derive(Debug)]
pub struct Resolver<T: EligibilityTable = ReferenceTable> {
    table: Arc<T>,
}

impl<T: EligibilityTable> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<T: EligibilityTable> Resolver<T> {
    /// Creates a resolver over a shared table.
    #[must_use]
    pub fn new(table: Arc<T>) -> Self {
        Self { table }
    }

    /// The underlying table.
    #[must_use]
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Core reduction over raw identifiers.
    ///
    /// Performs no heap allocation.
    pub fn category<'a, I>(&self, method: Method, intent: Intent, conditions: I) -> Category
    where
        I: IntoIterator<Item = &'a str>,
    {
        conditions
            .into_iter()
            .filter_map(|id| self.table.pair(id, method))
            .filter_map(|pair| pair.for_intent(intent).category())
            .fold(Category::LEAST_RESTRICTIVE, Ord::max)
    }

    /// Resolves a selection to its worst-case category.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ukmec::{Category, Method, ReferenceTable, Resolver, Selection};
    ///
    /// let resolver = Resolver::new(Arc::new(ReferenceTable::builtin().unwrap()));
    /// let selection = Selection::builder()
    ///     .method(Method::CuIud)
    ///     .condition("PP_SEPSIS")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(resolver.resolve(&selection), Category::Four);
    /// ```
    #[must_use]
    pub fn resolve(&self, selection: &Selection) -> Category {
        self.category(selection.method(), selection.intent(), selection.conditions())
    }

    /// Resolves a selection and reports how each identifier was treated.
    #[must_use]
    pub fn resolve_detailed(&self, selection: &Selection) -> Resolution {
        let method = selection.method();
        let intent = selection.intent();

        let mut contributions = Vec::new();
        let mut not_applicable = Vec::new();
        let mut unknown = Vec::new();

        for id in selection.conditions() {
            match self.table.pair(id, method).map(|pair| pair.for_intent(intent)) {
                None => unknown.push(id.to_string()),
                Some(Rating::NotApplicable) => not_applicable.push(id.to_string()),
                Some(Rating::Category(category)) => contributions.push(Contribution {
                    condition: id.to_string(),
                    category,
                }),
            }
        }

        let category = contributions
            .iter()
            .map(|c| c.category)
            .fold(Category::LEAST_RESTRICTIVE, Ord::max);

        let drivers = contributions
            .iter()
            .filter(|c| c.category == category)
            .map(|c| c.condition.clone())
            .collect();

        debug!(
            %method,
            %intent,
            %category,
            contributing = contributions.len(),
            not_applicable = not_applicable.len(),
            unknown = unknown.len(),
            "Resolved selection"
        );

        Resolution {
            method,
            intent,
            category,
            contributions,
            not_applicable,
            unknown,
            drivers,
        }
    }

    /// Resolves the same conditions for every method, in display order.
    #[must_use]
    pub fn resolve_all_methods(&self, selection: &Selection) -> Vec<(Method, Category)> {
        Method::ALL
            .into_iter()
            .map(|method| {
                let category = self.category(method, selection.intent(), selection.conditions());
                (method, category)
            })
            .collect()
    }
}
