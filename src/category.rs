//! UKMEC categories and the "not applicable" sentinel.
//!
//! A [`Category`] is ordinal (1 < 2 < 3 < 4, higher is more restrictive).
//! A [`Rating`] is what the reference table stores for one half of a pair:
//! either a category or [`Rating::NotApplicable`]. `Rating` deliberately
//! has no ordering; only categories can be compared.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::intent::Intent;

/// Ordinal UKMEC eligibility category.
///
/// # Examples
///
/// ```
/// use ukmec::Category;
///
/// assert!(Category::Four > Category::Two);
/// assert_eq!(Category::try_from(3u8).unwrap(), Category::Three);
/// assert!(Category::try_from(0u8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Category {
    /// No restriction for the use of the method.
    One = 1,
    /// Advantages generally outweigh the theoretical or proven risks.
    Two = 2,
    /// Risks usually outweigh the advantages; expert judgement required.
    Three = 3,
    /// Unacceptable health risk.
    Four = 4,
}

impl Category {
    /// The baseline category when nothing restricts the method.
    pub const LEAST_RESTRICTIVE: Self = Self::One;

    /// All categories in ascending order.
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// Numeric value (1..=4).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Canonical UKMEC definition text.
    #[must_use]
    pub const fn definition(self) -> &'static str {
        match self {
            Self::One => {
                "UKMEC 1: A condition for which there is no restriction for the use of the method."
            }
            Self::Two => {
                "UKMEC 2: A condition where the advantages of using the method generally \
                 outweigh the theoretical or proven risks."
            }
            Self::Three => {
                "UKMEC 3: A condition where the theoretical or proven risks usually outweigh \
                 the advantages of using the method. Use of the method requires expert clinical \
                 judgement and/or referral to a specialist, since the method is not usually \
                 recommended unless other more appropriate methods are not available or not \
                 acceptable."
            }
            Self::Four => {
                "UKMEC 4: A condition which represents an unacceptable health risk if the \
                 method is used."
            }
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::LEAST_RESTRICTIVE
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UKMEC {}", self.value())
    }
}

impl From<Category> for u8 {
    fn from(category: Category) -> Self {
        category.value()
    }
}

impl TryFrom<i64> for Category {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            _ => Err(ValidationError::CategoryOutOfRange { value }),
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

/// One half of a table entry: a category, or no guidance at all.
///
/// Serialized as the category number, or `null` for not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<Category>", into = "Option<Category>")]
pub enum Rating {
    /// The table gives this category.
    Category(Category),
    /// The table has no guidance for this method/intent combination.
    NotApplicable,
}

impl Rating {
    /// Returns the category, if any.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            Self::Category(c) => Some(c),
            Self::NotApplicable => None,
        }
    }

    /// Returns true if this rating carries a category.
    #[must_use]
    pub const fn is_applicable(self) -> bool {
        matches!(self, Self::Category(_))
    }
}

impl From<Category> for Rating {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

impl From<Option<Category>> for Rating {
    fn from(value: Option<Category>) -> Self {
        value.map_or(Self::NotApplicable, Self::Category)
    }
}

impl From<Rating> for Option<Category> {
    fn from(rating: Rating) -> Self {
        rating.category()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(c) => write!(f, "{}", c.value()),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// The (initiation, continuation) pair stored for one condition and method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryPair {
    /// Rating when starting the method with the condition present.
    pub initiation: Rating,
    /// Rating when the condition develops while using the method.
    pub continuation: Rating,
}

impl CategoryPair {
    /// A pair with no guidance for either intent.
    pub const NOT_APPLICABLE: Self = Self {
        initiation: Rating::NotApplicable,
        continuation: Rating::NotApplicable,
    };

    /// Creates a pair.
    #[must_use]
    pub const fn new(initiation: Rating, continuation: Rating) -> Self {
        Self {
            initiation,
            continuation,
        }
    }

    /// Creates a pair with the same category for both intents.
    #[must_use]
    pub const fn uniform(category: Category) -> Self {
        Self::new(Rating::Category(category), Rating::Category(category))
    }

    /// Returns the rating for an intent.
    #[must_use]
    pub const fn for_intent(self, intent: Intent) -> Rating {
        match intent {
            Intent::Initiation => self.initiation,
            Intent::Continuation => self.continuation,
        }
    }

    /// Returns true if neither half carries a category.
    #[must_use]
    pub const fn is_inapplicable(self) -> bool {
        !self.initiation.is_applicable() && !self.continuation.is_applicable()
    }

    /// Returns true if exactly one half is not applicable.
    #[must_use]
    pub const fn is_partially_applicable(self) -> bool {
        self.initiation.is_applicable() != self.continuation.is_applicable()
    }
}

impl fmt::Display for CategoryPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.initiation, self.continuation)
    }
}
