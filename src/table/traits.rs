//! Abstract table trait consumed by the resolver.
//!
//! The resolver only needs "give me the pair for this condition and
//! method". Keeping that behind a trait lets tests inject small synthetic
//! tables without going through the data file.

use std::sync::Arc;

use crate::category::CategoryPair;
use crate::error::LookupError;
use crate::method::Method;

/// Read-only condition → method → pair mapping.
///
/// Implementations must be immutable after construction and safe to share
/// across threads.
pub trait EligibilityTable: Send + Sync {
    /// Returns the pair for a condition, or `None` if the identifier is unknown.
    ///
    /// Must not allocate; the resolver calls this once per selected condition.
    fn pair(&self, condition: &str, method: Method) -> Option<CategoryPair>;

    /// Like [`pair`](Self::pair), but an unknown identifier is an error.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownCondition`] if the identifier is not present.
    fn lookup(&self, condition: &str, method: Method) -> Result<CategoryPair, LookupError> {
        self.pair(condition, method)
            .ok_or_else(|| LookupError::UnknownCondition {
                condition: condition.to_string(),
            })
    }
}

impl<T: EligibilityTable + ?Sized> EligibilityTable for Arc<T> {
    fn pair(&self, condition: &str, method: Method) -> Option<CategoryPair> {
        (**self).pair(condition, method)
    }
}

impl<T: EligibilityTable + ?Sized> EligibilityTable for &T {
    fn pair(&self, condition: &str, method: Method) -> Option<CategoryPair> {
        (**self).pair(condition, method)
    }
}
