use serde_json::Value;

/// Expected-vs-actual detail for one field that failed shape matching.
///
/// Both sides are pre-rendered strings so the error stays comparable and
/// cheap to clone; the shape description comes from
/// [`pactum_shape::describe_alternatives`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// The offending field (`number_of_widgets`, or `result.total_cost` for
    /// result writes).
    pub field: String,
    /// Human description of the declared shape alternatives.
    pub expected: String,
    /// Rendered actual value.
    pub actual: String,
}

/// A promised return value the execution routine failed to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValue {
    /// The promised value's name.
    pub name: String,
    /// Human description of its declared shape.
    pub expected: String,
}

/// Error type for the action contract engine.
///
/// Structural errors (missing params, type mismatches, unimplemented
/// `execute`, unmet promises, post-lock writes) indicate programmer error
/// and are always surfaced. Semantic rule violations reach this enum only
/// through the checked entry points, as [`ActionError::InvalidParam`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    /// One or more declared-required parameters were absent from the bag.
    #[error("required param(s) {} were not provided to the `{action}` action", join_names(.missing))]
    MissingParam {
        action: String,
        missing: Vec<String>,
    },

    /// One or more supplied or assigned values failed shape matching.
    #[error("one or more values for the `{action}` action are of the wrong type: {}", join_mismatches(.mismatches))]
    TypeMismatch {
        action: String,
        mismatches: Vec<ShapeMismatch>,
    },

    /// Semantic validation failed when a checked entry point was used.
    #[error("invalid params for the `{action}` action: {}", .messages.join(", "))]
    InvalidParam {
        action: String,
        messages: Vec<String>,
    },

    /// The action type never supplied an execution routine.
    #[error("the `{action}` action does not implement `execute`")]
    ExecuteNotImplemented { action: String },

    /// Execution succeeded but left one or more promised values unset.
    #[error("the `{action}` action failed to set all promised values on its result; missing: {}", join_missing(.missing))]
    MissingResultValue {
        action: String,
        missing: Vec<MissingValue>,
    },

    /// A write was attempted on a result after it was locked.
    #[error(
        "a value was assigned to the result of the `{action}` action after it was locked; \
         values may only be assigned within `{action}::execute`"
    )]
    MutatingLockedResult { action: String },

    /// A declared failure kind was triggered in raise-on-failure mode.
    #[error("the `{action}` action failed with `{kind}`")]
    RuntimeFailure { action: String, kind: String },

    /// A write named a return value the action never declared.
    #[error("the `{action}` action result has no declared value `{name}`")]
    UndeclaredValue { action: String, name: String },

    /// A failure setter named a kind the action never declared.
    #[error("the `{action}` action declares no failure kind `{kind}`")]
    UndeclaredFailure { action: String, kind: String },
}

impl ActionError {
    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::MissingParam { .. } => "params",
            Self::TypeMismatch { .. } => "type",
            Self::InvalidParam { .. } => "validation",
            Self::ExecuteNotImplemented { .. } => "implementation",
            Self::MissingResultValue { .. } => "contract",
            Self::MutatingLockedResult { .. } => "lifecycle",
            Self::RuntimeFailure { .. } => "failure",
            Self::UndeclaredValue { .. } | Self::UndeclaredFailure { .. } => "declaration",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingParam { .. } => "ACTION_MISSING_PARAM",
            Self::TypeMismatch { .. } => "ACTION_TYPE_MISMATCH",
            Self::InvalidParam { .. } => "ACTION_INVALID_PARAM",
            Self::ExecuteNotImplemented { .. } => "ACTION_EXECUTE_NOT_IMPLEMENTED",
            Self::MissingResultValue { .. } => "ACTION_MISSING_RESULT_VALUE",
            Self::MutatingLockedResult { .. } => "ACTION_MUTATING_LOCKED_RESULT",
            Self::RuntimeFailure { .. } => "ACTION_RUNTIME_FAILURE",
            Self::UndeclaredValue { .. } => "ACTION_UNDECLARED_VALUE",
            Self::UndeclaredFailure { .. } => "ACTION_UNDECLARED_FAILURE",
        }
    }

    /// Whether the operation might succeed if retried with the same input.
    ///
    /// Contract errors are deterministic; every variant returns `false`.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// The name of the action the error concerns.
    #[must_use]
    pub fn action(&self) -> &str {
        match self {
            Self::MissingParam { action, .. }
            | Self::TypeMismatch { action, .. }
            | Self::InvalidParam { action, .. }
            | Self::ExecuteNotImplemented { action }
            | Self::MissingResultValue { action, .. }
            | Self::MutatingLockedResult { action }
            | Self::RuntimeFailure { action, .. }
            | Self::UndeclaredValue { action, .. }
            | Self::UndeclaredFailure { action, .. } => action,
        }
    }
}

fn join_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_mismatches(mismatches: &[ShapeMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| {
            format!(
                "`{}` is expected to be shaped like {}, but was `{}`",
                m.field, m.expected, m.actual
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_missing(missing: &[MissingValue]) -> String {
    missing
        .iter()
        .map(|m| format!("`{}` (should be shaped like {})", m.name, m.expected))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a candidate value for an error message: strings stay quoted,
/// everything else uses its compact JSON form, truncated past 80 chars.
#[must_use]
pub(crate) fn render_value(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() > 80 {
        let prefix: String = rendered.chars().take(77).collect();
        format!("{prefix}...")
    } else {
        rendered
    }
}
