//! The parameter validation pipeline.
//!
//! Three passes, invoked by the instance lifecycle:
//!
//! 1. presence — every declared name must be in the bag; runs strictly
//!    before shape checking so a missing param is never masked by a type
//!    complaint about another;
//! 2. shapes — every declared param must match at least one of its
//!    declared alternatives; all mismatches are collected into one error;
//! 3. rules — field-level semantic validation of record-shaped params;
//!    never raises, only produces the instance's error set.

use pactum_rules::Violation;
use pactum_shape::describe_alternatives;
use serde_json::Map;

use crate::declarations::Declarations;
use crate::error::{ActionError, MissingValue, ShapeMismatch, render_value};
use crate::params::Params;
use crate::result::ActionResult;

/// Every declared-required name must be present in the bag.
///
/// Fails with one [`ActionError::MissingParam`] naming ALL missing
/// parameters, in declaration order.
pub(crate) fn check_presence(params: &Params, decls: &Declarations) -> Result<(), ActionError> {
    let missing: Vec<String> = decls
        .required()
        .keys()
        .filter(|name| !params.contains(name))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ActionError::MissingParam {
            action: decls.name().to_owned(),
            missing,
        })
    }
}

/// Every declared param's value must match at least one declared
/// alternative (OR semantics).
///
/// Collects ALL mismatches into one [`ActionError::TypeMismatch`]. Assumes
/// [`check_presence`] already ran; absent entries are skipped here.
pub(crate) fn check_shapes(params: &Params, decls: &Declarations) -> Result<(), ActionError> {
    let mut mismatches = Vec::new();
    for (name, required) in decls.required() {
        let Some(value) = params.get(name) else {
            continue;
        };
        if !required.shapes().iter().any(|shape| shape.matches(value)) {
            mismatches.push(ShapeMismatch {
                field: name.clone(),
                expected: describe_alternatives(required.shapes()),
                actual: render_value(value),
            });
        }
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(ActionError::TypeMismatch {
            action: decls.name().to_owned(),
            mismatches,
        })
    }
}

/// Run the field-level rules of every validated record param.
///
/// Returns the violation set that becomes the instance's error set. When
/// several validated params fail, the LAST failing param's violations
/// replace the earlier ones (overwrite semantics). Values that are not
/// objects are checked as empty records, so their presence rules fail.
/// Idempotent; recomputes from scratch on every call.
pub(crate) fn check_rules(params: &Params, decls: &Declarations) -> Vec<Violation> {
    let empty = Map::new();
    let mut errors = Vec::new();
    for (name, required) in decls.required() {
        let Some(rules) = required.rules() else {
            continue;
        };
        let record = params
            .get(name)
            .and_then(serde_json::Value::as_object)
            .unwrap_or(&empty);
        let violations = rules.check(record);
        if !violations.is_empty() {
            errors = violations;
        }
    }
    errors
}

/// After a successful execution, every promised value must be present on
/// the result.
///
/// Fails with one [`ActionError::MissingResultValue`] naming ALL unset
/// values with their expected shapes. Callers skip this check entirely
/// when the result carries a failure marker.
pub(crate) fn check_promises(result: &ActionResult, decls: &Declarations) -> Result<(), ActionError> {
    let missing: Vec<MissingValue> = decls
        .promised()
        .iter()
        .filter(|(name, _)| result.get(name).is_none())
        .map(|(name, shapes)| MissingValue {
            name: name.clone(),
            expected: describe_alternatives(shapes),
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ActionError::MissingResultValue {
            action: decls.name().to_owned(),
            missing,
        })
    }
}
