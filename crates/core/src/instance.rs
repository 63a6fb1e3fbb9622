use pactum_rules::Violation;
use serde_json::Value;

use crate::action::Action;
use crate::error::ActionError;
use crate::params::Params;
use crate::result::ActionResult;
use crate::validate;

/// One invocation of an action: the immutable parameter bag, the
/// accumulated semantic-validation errors, and the single result contract.
///
/// State machine: constructed (presence and shape checks already passed) →
/// optionally validated via [`valid`](Self::valid) → executed via
/// [`run`](Self::run) / [`run_checked`](Self::run_checked) → result locked.
#[derive(Debug)]
pub struct Instance<A: Action> {
    action: A,
    params: Params,
    errors: Vec<Violation>,
    result: ActionResult,
}

impl<A: Action> Instance<A> {
    /// Construct an instance, immediately checking the bag against the
    /// contract.
    ///
    /// Presence runs strictly before shapes: a bag that is both missing a
    /// param and carrying a wrong-typed one reports
    /// [`ActionError::MissingParam`]. A malformed bag means the instance
    /// never exists.
    pub fn new(action: A, params: Params) -> Result<Self, ActionError> {
        let declarations = A::declarations();
        validate::check_presence(&params, declarations)?;
        validate::check_shapes(&params, declarations)?;
        tracing::trace!(action = declarations.name(), "action instance constructed");

        Ok(Self {
            action,
            params,
            errors: Vec::new(),
            result: ActionResult::new(declarations),
        })
    }

    /// The parameter bag, read-only.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Read one declared parameter's value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Run the semantic rules and report whether the instance is valid.
    ///
    /// Side-effecting: recomputes the error set on every call (when
    /// several validated params fail, the last one's violations replace
    /// the earlier ones). Safe to call repeatedly, before or after
    /// execution.
    pub fn valid(&mut self) -> bool {
        self.errors = validate::check_rules(&self.params, A::declarations());
        self.errors.is_empty()
    }

    /// The current semantic error set. Empty until [`valid`](Self::valid)
    /// has run at least once.
    #[must_use]
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    /// The result contract, inspectable before execution.
    #[must_use]
    pub fn result(&self) -> &ActionResult {
        &self.result
    }

    /// Mutable access to the result contract.
    ///
    /// Pre-lock writes from outside `execute` remain an accepted if
    /// discouraged capability; the lock guard is advisory.
    #[must_use]
    pub fn result_mut(&mut self) -> &mut ActionResult {
        &mut self.result
    }

    /// Execute the action with declared failures flagged on the result
    /// (non-raising).
    ///
    /// Invokes `execute`, locks the result, and — only when no declared
    /// failure was triggered — verifies every promised value was set.
    /// Returns the locked result.
    pub fn run(&mut self) -> Result<&ActionResult, ActionError> {
        self.run_mode(false)
    }

    /// Validate, then execute with declared failures escalated to
    /// [`ActionError::RuntimeFailure`].
    ///
    /// When [`valid`](Self::valid) is false, fails with
    /// [`ActionError::InvalidParam`] carrying every accumulated message.
    pub fn run_checked(&mut self) -> Result<&ActionResult, ActionError> {
        if self.valid() {
            self.run_mode(true)
        } else {
            Err(ActionError::InvalidParam {
                action: A::declarations().name().to_owned(),
                messages: self.errors.iter().map(Violation::full_message).collect(),
            })
        }
    }

    fn run_mode(&mut self, raise_on_failure: bool) -> Result<&ActionResult, ActionError> {
        let declarations = A::declarations();
        self.result.set_raise_on_failure(raise_on_failure);

        tracing::debug!(action = declarations.name(), raise_on_failure, "running action");
        self.action.execute(&self.params, &mut self.result)?;

        self.result.lock();
        if self.result.success() {
            validate::check_promises(&self.result, declarations)?;
        }
        tracing::debug!(
            action = declarations.name(),
            success = self.result.success(),
            "action finished"
        );
        Ok(&self.result)
    }

    /// Consume the instance, handing the result to the caller.
    #[must_use]
    pub fn into_result(self) -> ActionResult {
        self.result
    }
}
