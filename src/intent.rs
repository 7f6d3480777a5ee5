//! Initiation vs. continuation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which half of a category pair applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Starting the method while the condition already exists.
    #[default]
    Initiation,
    /// The condition develops while the method is already in use.
    Continuation,
}

impl Intent {
    /// Both intents, initiation first.
    pub const ALL: [Self; 2] = [Self::Initiation, Self::Continuation];

    /// Canonical definition text.
    #[must_use]
    pub const fn definition(self) -> &'static str {
        match self {
            Self::Initiation => {
                "Initiation (I) = Starting the method by a woman who has a specific medical condition."
            }
            Self::Continuation => {
                "Continuation (C) = Continuing the method already in use when a woman develops \
                 a new medical condition."
            }
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiation => write!(f, "initiation"),
            Self::Continuation => write!(f, "continuation"),
        }
    }
}

impl FromStr for Intent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initiation" | "i" => Ok(Self::Initiation),
            "continuation" | "c" => Ok(Self::Continuation),
            _ => Err(ValidationError::UnknownIntent {
                value: s.to_string(),
            }),
        }
    }
}
