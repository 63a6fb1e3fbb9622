use crate::declarations::Declarations;
use crate::error::ActionError;
use crate::instance::Instance;
use crate::params::Params;
use crate::result::ActionResult;

/// A declared unit of business logic.
///
/// Implementors supply the contract ([`declarations`](Self::declarations),
/// usually a `static LazyLock` built once at type-definition time) and the
/// execution routine. Omitting [`execute`](Self::execute) is detected at
/// run time, not at declaration time: the default body surfaces
/// [`ActionError::ExecuteNotImplemented`].
///
/// ```rust
/// use std::sync::LazyLock;
/// use pactum_core::prelude::*;
///
/// struct DoubleNumber;
///
/// impl Action for DoubleNumber {
///     fn declarations() -> &'static Declarations {
///         static DECLS: LazyLock<Declarations> = LazyLock::new(|| {
///             Declarations::builder("DoubleNumber")
///                 .requires("number", [Shape::number()])
///                 .returns("number_doubled", [Shape::number()])
///                 .build()
///         });
///         &DECLS
///     }
///
///     fn execute(&self, params: &Params, result: &mut ActionResult)
///         -> Result<(), ActionError>
///     {
///         let number = params.number_of("number").unwrap_or_default();
///         result.set("number_doubled", number * 2.0)
///     }
/// }
///
/// let result = DoubleNumber.run_checked(pactum_core::params! { "number" => 8 })?;
/// assert_eq!(result.number_of("number_doubled"), Some(16.0));
/// # Ok::<(), pactum_core::ActionError>(())
/// ```
pub trait Action: Sized {
    /// The action's contract: required params, promised values, failure
    /// kinds. Fixed once declared; inherited contracts are expressed with
    /// [`DeclarationsBuilder::extends`](crate::DeclarationsBuilder::extends).
    fn declarations() -> &'static Declarations;

    /// The execution routine: read declared parameters, write the result
    /// through its guarded accessors, flag declared failures.
    ///
    /// The default body reports the action as unimplemented.
    fn execute(&self, params: &Params, result: &mut ActionResult) -> Result<(), ActionError> {
        let _ = (params, result);
        Err(ActionError::ExecuteNotImplemented {
            action: Self::declarations().name().to_owned(),
        })
    }
}

/// Convenience entry points, blanket-implemented for every [`Action`].
pub trait ActionExt: Action {
    /// Construct an [`Instance`] for this action with the given bag.
    ///
    /// Structural problems (missing or wrong-typed params) error here.
    fn instance(self, params: Params) -> Result<Instance<Self>, ActionError> {
        Instance::new(self, params)
    }

    /// Construct, validate, and run in one call.
    ///
    /// Structural problems raise from construction; semantic rule
    /// violations raise as [`ActionError::InvalidParam`]; declared
    /// failures escalate to [`ActionError::RuntimeFailure`]. On success
    /// the caller owns the locked result.
    fn run_checked(self, params: Params) -> Result<ActionResult, ActionError> {
        let mut instance = Instance::new(self, params)?;
        instance.run_checked()?;
        Ok(instance.into_result())
    }
}

impl<A: Action> ActionExt for A {}
