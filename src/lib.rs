//! # ukmec - UKMEC contraceptive eligibility lookup
//!
//! Given a contraceptive method, an intent (starting or continuing use)
//! and the set of conditions that apply to a patient, return the most
//! restrictive UK Medical Eligibility Criteria category from the UKMEC
//! 2016 summary table.
//!
//! ## Core Concepts
//!
//! - **Method**: one of seven contraceptive methods, in a fixed order
//! - **Category**: ordinal risk level 1..=4, higher is more restrictive
//! - **Rating**: a category, or "not applicable" where the table gives no guidance
//! - **ReferenceTable**: immutable condition → method → (initiation, continuation) mapping
//! - **Resolver**: reduces a selection to its worst-case category, floor 1
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use ukmec::{Category, Intent, Method, ReferenceTable, Resolver, Selection};
//!
//! let table = Arc::new(ReferenceTable::builtin()?);
//! let resolver = Resolver::new(table);
//!
//! let selection = Selection::builder()
//!     .method(Method::Dmpa)
//!     .intent(Intent::Continuation)
//!     .conditions(["VTE_HISTORY", "CVD_MULTIPLE_RISK", "NOT_IN_TABLE"])
//!     .build()?;
//!
//! assert_eq!(resolver.resolve(&selection), Category::Three);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Vocabulary
pub mod category;
pub mod condition;
pub mod error;
pub mod intent;
pub mod method;

// Reference data and resolution
pub mod resolver;
pub mod selection;
pub mod table;

// Inputs and service surface
pub mod config;
pub mod intake;
pub mod ir;
pub mod service;

#[cfg(feature = "transport-grpc")]
pub mod transport;

// Re-export primary types at crate root for convenience
pub use category::{Category, CategoryPair, Rating};
pub use condition::{
    ConditionGroup, ConditionId, ConditionInfo, ConditionRecord, MAX_CONDITION_ID_LEN,
};
pub use error::{IntegrityError, LookupError, MecError, MecResult, ValidationError};
pub use intent::Intent;
pub use method::{Method, MethodInfo};

pub use resolver::{Contribution, Resolution, Resolver, MAX_RULE_CAVEAT};
pub use selection::{Selection, SelectionBuilder};
pub use table::{EligibilityTable, Fingerprint, ReferenceTable, TableRevision};

pub use config::ServiceConfig;
pub use intake::PatientProfile;
pub use ir::{EligibilityRequest, EligibilityResponse, ErrorInfo, ErrorKind};
pub use service::EligibilityService;
