//! Contraceptive methods covered by the reference table.
//!
//! The set is closed: every record in the table carries exactly one
//! category pair per [`Method`], and nothing else may appear as a column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A contraceptive method.
///
/// # Examples
///
/// ```
/// use ukmec::Method;
///
/// let m: Method = "Cu-IUD".parse().unwrap();
/// assert_eq!(m, Method::CuIud);
/// assert_eq!(m.code(), "cu_iud");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Copper intrauterine device.
    CuIud,
    /// Levonorgestrel intrauterine system.
    LngIus,
    /// Progestogen-only implant.
    Implant,
    /// Progestogen-only injectable (depot medroxyprogesterone acetate).
    Dmpa,
    /// Progestogen-only pill.
    Pop,
    /// Combined hormonal contraception.
    Chc,
    /// Female sterilisation.
    FemaleSterilisation,
}

impl Method {
    /// Number of methods in the fixed set.
    pub const COUNT: usize = 7;

    /// All methods, in display order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::CuIud,
        Self::LngIus,
        Self::Implant,
        Self::Dmpa,
        Self::Pop,
        Self::Chc,
        Self::FemaleSterilisation,
    ];

    /// Stable snake_case code used in data files and request envelopes.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CuIud => "cu_iud",
            Self::LngIus => "lng_ius",
            Self::Implant => "implant",
            Self::Dmpa => "dmpa",
            Self::Pop => "pop",
            Self::Chc => "chc",
            Self::FemaleSterilisation => "female_sterilisation",
        }
    }

    /// Short label as printed in the UKMEC summary table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CuIud => "Cu-IUD",
            Self::LngIus => "LNG-IUS",
            Self::Implant => "IMP",
            Self::Dmpa => "DMPA",
            Self::Pop => "POP",
            Self::Chc => "CHC",
            Self::FemaleSterilisation => "Female Sterilization",
        }
    }

    /// Long-form description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CuIud => "Copper intrauterine device",
            Self::LngIus => "Levonorgestrel intrauterine system",
            Self::Implant => "Progestogen-only implant",
            Self::Dmpa => "Progestogen-only injectable (DMPA)",
            Self::Pop => "Progestogen-only pill",
            Self::Chc => "Combined hormonal contraception",
            Self::FemaleSterilisation => "Female sterilisation",
        }
    }

    /// Position of this method in [`Method::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parses a method code or table label (case-insensitive).
    #[must_use]
    pub fn from_code(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|m| {
            m.code().eq_ignore_ascii_case(value) || m.label().eq_ignore_ascii_case(value)
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Method {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| ValidationError::UnknownMethod {
            value: s.to_string(),
        })
    }
}

/// Presentation metadata for a method selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// The method.
    pub method: Method,
    /// Short table label.
    pub label: String,
    /// Long-form description.
    pub description: String,
}

impl From<Method> for MethodInfo {
    fn from(method: Method) -> Self {
        Self {
            method,
            label: method.label().to_string(),
            description: method.description().to_string(),
        }
    }
}
