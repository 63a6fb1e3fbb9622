//! # pactum-rules
//!
//! Field-level semantic validation over JSON records.
//!
//! A [`RuleSet`] pairs field names with declarative [`Rule`]s (presence,
//! format, length, numericality). Checking a record evaluates every rule of
//! every field and collects all [`Violation`]s — it never short-circuits and
//! never panics.
//!
//! ```rust
//! use pactum_rules::{Rule, RuleSet};
//! use regex::Regex;
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field("email", [
//!         Rule::presence(),
//!         Rule::format(Regex::new(r"[a-z]+@[a-z]+\.[a-z]+").unwrap()),
//!     ]);
//!
//! let record = json!({ "email": "" });
//! let violations = rules.check(record.as_object().unwrap());
//! assert_eq!(violations[0].full_message(), "`email` can't be blank");
//! assert_eq!(violations[1].full_message(), "`email` is invalid");
//! ```
//!
//! Rules are data plus an evaluation routine; they carry no I/O and no
//! persistence. Callers that need structural (type/shape) checking should
//! pair this crate with `pactum-shape` — the two concerns are deliberately
//! separate, as they are in the action contract pipeline.

mod rule;
mod set;
mod violation;

pub use rule::Rule;
pub use set::{FieldRules, RuleSet};
pub use violation::Violation;
