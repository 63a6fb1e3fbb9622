//! # pactum-shape
//!
//! The shape-descriptor language used by pactum action contracts.
//!
//! A [`Shape`] is a closed description of what values are acceptable for a
//! declared parameter or return value: a concrete type tag, a disjunction of
//! alternatives, a named predicate, a homogeneous sequence, or a keyed
//! record with per-key shapes.
//!
//! ```rust
//! use pactum_shape::Shape;
//! use serde_json::json;
//!
//! let phone = Shape::any_of([Shape::integer(), Shape::string()]);
//! assert!(phone.matches(&json!("15551239876")));
//! assert!(phone.matches(&json!(15_551_239_876_i64)));
//! assert!(!phone.matches(&json!(true)));
//! ```
//!
//! Shapes are immutable after construction and are compared to candidate
//! values through a single recursive [`Shape::matches`] function, which is
//! total: a value of the wrong outer kind fails to match, it never errors.

mod descriptor;
mod matching;

pub use descriptor::{Kind, Predicate, Shape, describe_alternatives};
