use indexmap::IndexMap;
use pactum_shape::describe_alternatives;
use serde_json::Value;

use crate::declarations::Declarations;
use crate::error::{ActionError, ShapeMismatch, render_value};

/// A triggered failure: the declared kind and an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    kind: String,
    message: Option<String>,
}

impl Failure {
    /// The declared failure kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The message given when the failure was triggered, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// The output contract of one action invocation.
///
/// Created unlocked alongside the instance, mutated through its guarded
/// writers during `execute`, locked by the lifecycle immediately after
/// execution returns, and treated as a frozen value from then on.
///
/// The lock is an advisory correctness guard against accidental late
/// mutation, not an ownership boundary: code holding `&mut` access before
/// the lock may write, discouraged as that is outside `execute`.
#[derive(Debug, Clone)]
pub struct ActionResult {
    declarations: Declarations,
    values: IndexMap<String, Value>,
    failure: Option<Failure>,
    locked: bool,
    raise_on_failure: bool,
}

impl ActionResult {
    /// An unlocked result for the given contract: no values set, no
    /// failure marker.
    pub(crate) fn new(declarations: &Declarations) -> Self {
        Self {
            declarations: declarations.clone(),
            values: IndexMap::new(),
            failure: None,
            locked: false,
            raise_on_failure: false,
        }
    }

    pub(crate) fn set_raise_on_failure(&mut self, raise_on_failure: bool) {
        self.raise_on_failure = raise_on_failure;
    }

    /// Assign a promised return value.
    ///
    /// Fails with [`ActionError::UndeclaredValue`] for names the action
    /// never declared, [`ActionError::MutatingLockedResult`] once the
    /// result is locked, and [`ActionError::TypeMismatch`] when the value
    /// matches none of the declared shape alternatives. Re-assignment
    /// before the lock is permitted.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ActionError> {
        let value = value.into();
        let action = self.declarations.name();

        let Some(shapes) = self.declarations.promised().get(name) else {
            return Err(ActionError::UndeclaredValue {
                action: action.to_owned(),
                name: name.to_owned(),
            });
        };

        if self.locked {
            return Err(ActionError::MutatingLockedResult {
                action: action.to_owned(),
            });
        }

        if !shapes.iter().any(|shape| shape.matches(&value)) {
            return Err(ActionError::TypeMismatch {
                action: action.to_owned(),
                mismatches: vec![ShapeMismatch {
                    field: format!("result.{name}"),
                    expected: describe_alternatives(shapes),
                    actual: render_value(&value),
                }],
            });
        }

        self.values.insert(name.to_owned(), value);
        Ok(())
    }

    /// Read a stored return value. Reads never fail, locked or not.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The value as an `f64`, when set and numeric.
    #[must_use]
    pub fn number_of(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// The value as an `i64`, when set and an integer.
    #[must_use]
    pub fn integer_of(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// The value as a string slice, when set and a string.
    #[must_use]
    pub fn str_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The value as a boolean, when set and a boolean.
    #[must_use]
    pub fn bool_of(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// The currently-stored return values, in assignment order.
    #[must_use]
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// One-way transition to the locked state. Idempotent: locking an
    /// already-locked result is a no-op, not an error.
    pub fn lock(&mut self) {
        if !self.locked {
            tracing::trace!(action = self.declarations.name(), "result locked");
            self.locked = true;
        }
    }

    /// Whether the result has been locked.
    #[must_use]
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Trigger a declared failure kind with no message.
    ///
    /// See [`fail_with`](Self::fail_with).
    pub fn fail(&mut self, kind: &str) -> Result<(), ActionError> {
        self.fail_inner(kind, None)
    }

    /// Trigger a declared failure kind with a message.
    ///
    /// Sets the single failure marker — a second trigger overwrites the
    /// first (last write wins). Fails with
    /// [`ActionError::UndeclaredFailure`] for kinds the action never
    /// declared. In raise-on-failure mode the marker is set and then
    /// [`ActionError::RuntimeFailure`] is returned, for the caller's
    /// `execute` to propagate with `?`.
    pub fn fail_with(&mut self, kind: &str, message: impl Into<String>) -> Result<(), ActionError> {
        self.fail_inner(kind, Some(message.into()))
    }

    fn fail_inner(&mut self, kind: &str, message: Option<String>) -> Result<(), ActionError> {
        let action = self.declarations.name();
        if !self.declarations.declares_failure(kind) {
            return Err(ActionError::UndeclaredFailure {
                action: action.to_owned(),
                kind: kind.to_owned(),
            });
        }

        tracing::debug!(action, kind, "action flagged a declared failure");
        self.failure = Some(Failure {
            kind: kind.to_owned(),
            message,
        });

        if self.raise_on_failure {
            return Err(ActionError::RuntimeFailure {
                action: action.to_owned(),
                kind: kind.to_owned(),
            });
        }
        Ok(())
    }

    /// Whether the given declared failure kind is currently set.
    #[must_use]
    pub fn failed_with(&self, kind: &str) -> bool {
        self.failure.as_ref().is_some_and(|f| f.kind == kind)
    }

    /// The current failure marker, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// The message of the current failure marker, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.failure.as_ref().and_then(Failure::message)
    }

    /// `true` iff no failure marker is set.
    #[must_use]
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use pactum_shape::Shape;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn decls() -> Declarations {
        Declarations::builder("ProcessOrder")
            .returns("total_cost", [Shape::number()])
            .returns("phone", [Shape::string()])
            .fails_with("bad_response_from_api")
            .fails_with("rate_limited")
            .build()
    }

    #[test]
    fn starts_unlocked_and_empty() {
        let result = ActionResult::new(&decls());
        assert!(!result.locked());
        assert!(result.success());
        assert!(result.values().is_empty());
        assert!(result.failure().is_none());
    }

    #[test]
    fn writer_stores_matching_values() {
        let mut result = ActionResult::new(&decls());
        result.set("total_cost", 48.0).unwrap();
        assert_eq!(result.number_of("total_cost"), Some(48.0));
    }

    #[test]
    fn writer_permits_reassignment_before_lock() {
        let mut result = ActionResult::new(&decls());
        result.set("total_cost", 1.0).unwrap();
        result.set("total_cost", 2.0).unwrap();
        assert_eq!(result.number_of("total_cost"), Some(2.0));
    }

    #[test]
    fn writer_rejects_undeclared_names() {
        let mut result = ActionResult::new(&decls());
        let err = result.set("surprise", 1).unwrap_err();
        assert_eq!(
            err,
            ActionError::UndeclaredValue {
                action: "ProcessOrder".into(),
                name: "surprise".into(),
            }
        );
    }

    #[test]
    fn writer_rejects_shape_mismatches() {
        let mut result = ActionResult::new(&decls());
        let err = result.set("phone", 15_551_239_876_i64).unwrap_err();
        match err {
            ActionError::TypeMismatch { mismatches, .. } => {
                assert_eq!(mismatches[0].field, "result.phone");
                assert_eq!(mismatches[0].expected, "a string");
                assert_eq!(mismatches[0].actual, "15551239876");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn writer_fails_after_lock_but_reads_do_not() {
        let mut result = ActionResult::new(&decls());
        result.set("total_cost", 48.0).unwrap();
        result.lock();

        let err = result.set("total_cost", 99.0).unwrap_err();
        assert!(matches!(err, ActionError::MutatingLockedResult { .. }));
        assert!(err.to_string().contains("`ProcessOrder::execute`"));

        assert_eq!(result.number_of("total_cost"), Some(48.0));
        assert_eq!(result.get("phone"), None);
    }

    #[test]
    fn lock_is_idempotent() {
        let mut result = ActionResult::new(&decls());
        result.lock();
        result.lock();
        assert!(result.locked());
    }

    #[test]
    fn failure_flips_success_and_the_predicate() {
        let mut result = ActionResult::new(&decls());
        assert!(result.success());
        assert!(!result.failed_with("bad_response_from_api"));

        result.fail("bad_response_from_api").unwrap();

        assert!(!result.success());
        assert!(result.failed_with("bad_response_from_api"));
        assert!(!result.failed_with("rate_limited"));
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn failure_message_is_retained() {
        let mut result = ActionResult::new(&decls());
        result
            .fail_with("bad_response_from_api", "servers are down")
            .unwrap();
        assert_eq!(result.error_message(), Some("servers are down"));
        assert_eq!(
            result.failure().unwrap().kind(),
            "bad_response_from_api"
        );
    }

    #[test]
    fn second_failure_overwrites_the_first() {
        let mut result = ActionResult::new(&decls());
        result.fail_with("bad_response_from_api", "down").unwrap();
        result.fail("rate_limited").unwrap();

        assert!(result.failed_with("rate_limited"));
        assert!(!result.failed_with("bad_response_from_api"));
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn undeclared_failure_kind_is_rejected() {
        let mut result = ActionResult::new(&decls());
        let err = result.fail("network_down").unwrap_err();
        assert_eq!(
            err,
            ActionError::UndeclaredFailure {
                action: "ProcessOrder".into(),
                kind: "network_down".into(),
            }
        );
        assert!(result.success(), "rejected kinds must not set the marker");
    }

    #[test]
    fn raise_on_failure_returns_runtime_failure_and_sets_the_marker() {
        let mut result = ActionResult::new(&decls());
        result.set_raise_on_failure(true);

        let err = result.fail("bad_response_from_api").unwrap_err();
        assert_eq!(
            err,
            ActionError::RuntimeFailure {
                action: "ProcessOrder".into(),
                kind: "bad_response_from_api".into(),
            }
        );
        assert!(result.failed_with("bad_response_from_api"));
        assert!(!result.success());
    }

    #[test]
    fn failure_setter_ignores_the_lock() {
        // only promised-value writers are lock-guarded; the failure marker
        // remains settable
        let mut result = ActionResult::new(&decls());
        result.lock();
        result.fail("rate_limited").unwrap();
        assert!(result.failed_with("rate_limited"));
    }

    #[test]
    fn set_accepts_json_values_directly() {
        let mut result = ActionResult::new(&decls());
        result.set("phone", json!("15551239876")).unwrap();
        assert_eq!(result.str_of("phone"), Some("15551239876"));
    }
}
