//! Mapping raw patient inputs to condition identifiers.
//!
//! The intake is independent of the reference table and the resolver: it
//! only knows which identifiers a given age, postpartum timing, smoking
//! history or BMI corresponds to. Conditions without a derivation rule are
//! passed through from [`PatientProfile::selected`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::intent::Intent;
use crate::method::Method;
use crate::selection::Selection;

/// Accepted age range in years.
pub const AGE_RANGE: (u8, u8) = (10, 60);
/// Accepted weeks-postpartum range.
pub const WEEKS_POSTPARTUM_RANGE: (f64, f64) = (0.0, 52.0);
/// Accepted hours since delivery for intrauterine insertion.
pub const HOURS_SINCE_DELIVERY_RANGE: (f64, f64) = (0.0, 52.0 * 7.0 * 24.0);
/// Accepted cigarettes per day for a current smoker. Someone smoking none
/// has stopped, see [`Smoking::Stopped`].
pub const CIGARETTES_PER_DAY_RANGE: (u32, u32) = (1, 60);
/// Accepted body mass index range.
pub const BMI_RANGE: (f64, f64) = (10.0, 70.0);

const FOUR_WEEKS_HOURS: f64 = 4.0 * 7.0 * 24.0;

/// Postpartum state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Postpartum {
    /// Currently breastfeeding.
    pub breastfeeding: bool,
    /// Weeks since delivery.
    pub weeks: f64,
    /// Other risk factors for venous thromboembolism.
    pub other_vte_risk: bool,
    /// Puerperal sepsis.
    pub sepsis: bool,
    /// Hours since delivery, when assessing intrauterine insertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_since_delivery: Option<f64>,
}

/// Trimester of an abortion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trimester {
    /// First trimester.
    First,
    /// Second trimester.
    Second,
}

/// Post-abortion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAbortion {
    /// Trimester of the abortion.
    pub trimester: Trimester,
    /// Post-abortion sepsis.
    pub sepsis: bool,
}

/// Smoking history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Smoking {
    /// Currently smoking.
    Current {
        /// Cigarettes per day.
        cigarettes_per_day: u32,
    },
    /// Stopped smoking.
    Stopped {
        /// Stopped less than a year ago.
        within_last_year: bool,
    },
}

/// Raw patient inputs.
///
/// # Examples
///
/// ```
/// use ukmec::intake::{PatientProfile, Smoking};
///
/// let profile = PatientProfile::new(40)
///     .with_smoking(Smoking::Current { cigarettes_per_day: 20 })
///     .with_bmi(36.0);
///
/// let ids = profile.derive_conditions().unwrap();
/// assert!(ids.contains(&"SMOKE_AGE_GE_35_GE15".to_string()));
/// assert!(ids.contains(&"OBESITY_BMI_GE_35".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Age in years.
    pub age: u8,
    /// Never given birth.
    #[serde(default)]
    pub nulliparous: bool,
    /// Postpartum state, if postpartum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postpartum: Option<Postpartum>,
    /// Post-abortion state, if applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abortion: Option<PostAbortion>,
    /// Past ectopic pregnancy.
    #[serde(default)]
    pub past_ectopic: bool,
    /// History of pelvic surgery.
    #[serde(default)]
    pub pelvic_surgery: bool,
    /// Smoking history, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking: Option<Smoking>,
    /// Body mass index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    /// Condition identifiers selected directly.
    #[serde(default)]
    pub selected: Vec<String>,
}

impl PatientProfile {
    /// Creates a profile with only the age set.
    #[must_use]
    pub fn new(age: u8) -> Self {
        Self {
            age,
            nulliparous: false,
            postpartum: None,
            abortion: None,
            past_ectopic: false,
            pelvic_surgery: false,
            smoking: None,
            bmi: None,
            selected: Vec::new(),
        }
    }

    /// Marks the patient as nulliparous.
    #[must_use]
    pub fn nulliparous(mut self) -> Self {
        self.nulliparous = true;
        self
    }

    /// Sets the postpartum state.
    #[must_use]
    pub fn with_postpartum(mut self, postpartum: Postpartum) -> Self {
        self.postpartum = Some(postpartum);
        self
    }

    /// Sets the post-abortion state.
    #[must_use]
    pub fn with_abortion(mut self, trimester: Trimester, sepsis: bool) -> Self {
        self.abortion = Some(PostAbortion { trimester, sepsis });
        self
    }

    /// Sets the smoking history.
    #[must_use]
    pub fn with_smoking(mut self, smoking: Smoking) -> Self {
        self.smoking = Some(smoking);
        self
    }

    /// Sets the BMI.
    #[must_use]
    pub fn with_bmi(mut self, bmi: f64) -> Self {
        self.bmi = Some(bmi);
        self
    }

    /// Adds a directly selected condition.
    #[must_use]
    pub fn select(mut self, condition: impl Into<String>) -> Self {
        self.selected.push(condition.into());
        self
    }

    /// Maps the profile to condition identifiers.
    ///
    /// Derived identifiers come first, in a fixed order, followed by the
    /// directly selected ones as given.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] if a numeric input is
    /// outside its accepted range or not finite.
    pub fn derive_conditions(&self) -> Result<Vec<String>, ValidationError> {
        check_range("age", f64::from(self.age), f64::from(AGE_RANGE.0), f64::from(AGE_RANGE.1))?;

        let mut out: Vec<&'static str> = Vec::new();

        out.push(if self.age < 20 {
            "AGE_MENARCHE_TO_LT_20"
        } else {
            "AGE_GE_20"
        });
        out.push(if self.nulliparous {
            "PARITY_NULLIPAROUS"
        } else {
            "PARITY_PAROUS"
        });

        if let Some(pp) = &self.postpartum {
            derive_postpartum(pp, &mut out)?;
        }

        if let Some(abortion) = &self.abortion {
            out.push(match abortion.trimester {
                Trimester::First => "ABORT_1ST_TRIM",
                Trimester::Second => "ABORT_2ND_TRIM",
            });
            if abortion.sepsis {
                out.push("ABORT_SEPSIS");
            }
        }

        if self.past_ectopic {
            out.push("PAST_ECTOPIC");
        }
        if self.pelvic_surgery {
            out.push("HX_PELVIC_SURG");
        }

        if let Some(smoking) = self.smoking {
            out.push(smoking_condition(self.age, smoking)?);
        }

        if let Some(bmi) = self.bmi {
            check_range("bmi", bmi, BMI_RANGE.0, BMI_RANGE.1)?;
            if bmi >= 35.0 {
                out.push("OBESITY_BMI_GE_35");
            } else if bmi >= 30.0 {
                out.push("OBESITY_BMI_30_34");
            }
        }

        let mut conditions: Vec<String> = out.into_iter().map(str::to_string).collect();
        conditions.extend(self.selected.iter().cloned());
        Ok(conditions)
    }

    /// Derives the conditions and builds a selection.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if derivation or selection validation fails.
    pub fn selection(&self, method: Method, intent: Intent) -> Result<Selection, ValidationError> {
        Selection::builder()
            .method(method)
            .intent(intent)
            .conditions(self.derive_conditions()?)
            .build()
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

fn derive_postpartum(pp: &Postpartum, out: &mut Vec<&'static str>) -> Result<(), ValidationError> {
    check_range(
        "postpartum.weeks",
        pp.weeks,
        WEEKS_POSTPARTUM_RANGE.0,
        WEEKS_POSTPARTUM_RANGE.1,
    )?;

    let weeks = pp.weeks;
    if pp.breastfeeding {
        out.push(if weeks < 6.0 {
            "BREASTFEEDING_0_TO_6_WEEKS"
        } else if weeks < 24.0 {
            "BREASTFEEDING_6_WEEKS_TO_6_MONTHS"
        } else {
            "BREASTFEEDING_GE_6_MONTHS"
        });
    } else {
        out.push(match (weeks < 3.0, weeks < 6.0, pp.other_vte_risk) {
            (true, _, true) => "PP_0_TO_3_WEEKS_VTE",
            (true, _, false) => "PP_0_TO_3_WEEKS_NO_VTE",
            (false, true, true) => "PP_3_TO_6_WEEKS_VTE",
            (false, true, false) => "PP_3_TO_6_WEEKS_NO_VTE",
            (false, false, _) => "PP_GE_6_WEEKS",
        });
    }

    if pp.sepsis {
        out.push("PP_SEPSIS");
    }

    if let Some(hours) = pp.hours_since_delivery {
        check_range(
            "postpartum.hours_since_delivery",
            hours,
            HOURS_SINCE_DELIVERY_RANGE.0,
            HOURS_SINCE_DELIVERY_RANGE.1,
        )?;
        if hours < 48.0 {
            out.push("PP_0_TO_48H_IUC");
        } else if hours < FOUR_WEEKS_HOURS {
            out.push("PP_48H_TO_4W_IUC");
        }
    }

    Ok(())
}

fn smoking_condition(age: u8, smoking: Smoking) -> Result<&'static str, ValidationError> {
    if let Smoking::Current { cigarettes_per_day } = smoking {
        check_range(
            "smoking.cigarettes_per_day",
            f64::from(cigarettes_per_day),
            f64::from(CIGARETTES_PER_DAY_RANGE.0),
            f64::from(CIGARETTES_PER_DAY_RANGE.1),
        )?;
    }

    if age < 35 {
        return Ok("SMOKE_AGE_LT_35");
    }

    Ok(match smoking {
        Smoking::Stopped { within_last_year: true } => "SMOKE_AGE_GE_35_STOP_LT1",
        Smoking::Stopped { within_last_year: false } => "SMOKE_AGE_GE_35_STOP_GE1",
        Smoking::Current { cigarettes_per_day } if cigarettes_per_day < 15 => {
            "SMOKE_AGE_GE_35_LT15"
        }
        Smoking::Current { .. } => "SMOKE_AGE_GE_35_GE15",
    })
}
