//! # pactum-core
//!
//! A declared-contract action framework: each action type declares the
//! parameters it requires, the values it promises to return, and the named
//! failure conditions it may signal, then implements a single `execute`
//! routine. The framework enforces the contract at both ends — the
//! parameter bag is checked before execution (presence strictly before
//! shapes), and the promised values are verified after it — and hands the
//! caller a locked, read-only result.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::LazyLock;
//! use pactum_core::prelude::*;
//!
//! struct DoubleNumber;
//!
//! impl Action for DoubleNumber {
//!     fn declarations() -> &'static Declarations {
//!         static DECLS: LazyLock<Declarations> = LazyLock::new(|| {
//!             Declarations::builder("DoubleNumber")
//!                 .requires("number", [Shape::number()])
//!                 .returns("number_doubled", [Shape::number()])
//!                 .build()
//!         });
//!         &DECLS
//!     }
//!
//!     fn execute(&self, params: &Params, result: &mut ActionResult)
//!         -> Result<(), ActionError>
//!     {
//!         let number = params.number_of("number").unwrap_or_default();
//!         result.set("number_doubled", number * 2.0)
//!     }
//! }
//!
//! let mut instance = DoubleNumber.instance(pactum_core::params! { "number" => 8 })?;
//! let result = instance.run()?;
//! assert!(result.locked());
//! assert_eq!(result.number_of("number_doubled"), Some(16.0));
//! # Ok::<(), pactum_core::ActionError>(())
//! ```
//!
//! ## Failure model
//!
//! Structural problems — missing params, shape mismatches, an
//! unimplemented `execute`, unmet promises, post-lock writes — are
//! programmer errors and always surface as [`ActionError`]s. Semantic rule
//! violations on record-shaped params are reported through
//! [`Instance::valid`] / [`Instance::errors`] and escalate to
//! [`ActionError::InvalidParam`] only via the checked entry points.
//! Declared business failures flag the result by default and escalate to
//! [`ActionError::RuntimeFailure`] only in raise-on-failure mode
//! ([`Instance::run_checked`]).
//!
//! Execution is synchronous, in-process, single-call: no queueing, no
//! retries, no scheduling. The result lock is an advisory guard against
//! late mutation, not a concurrency primitive.

mod action;
mod declarations;
mod error;
mod instance;
mod params;
mod result;
mod validate;

pub use action::{Action, ActionExt};
pub use declarations::{Declarations, DeclarationsBuilder, RequiredParam};
pub use error::{ActionError, MissingValue, ShapeMismatch};
pub use instance::Instance;
pub use params::Params;
pub use result::{ActionResult, Failure};

// The companion crates' surface, re-exported so action definitions need a
// single dependency.
pub use pactum_rules::{Rule, RuleSet, Violation};
pub use pactum_shape::Shape;

// Used by the `params!` macro expansion.
#[doc(hidden)]
pub use serde_json as __serde_json;

/// Common imports for defining and running actions.
pub mod prelude {
    pub use crate::{
        Action, ActionError, ActionExt, ActionResult, Declarations, Instance, Params, Rule,
        RuleSet, Shape, Violation,
    };
}
