use regex::Regex;
use serde_json::Value;

/// A declarative validation rule for one record field.
///
/// Rules are evaluated against the field's current value (or its absence)
/// and produce a human-readable message on failure. Every rule accepts an
/// optional message override via [`Rule::with_message`].
#[derive(Debug, Clone)]
pub enum Rule {
    /// The field must be present and non-blank.
    ///
    /// Absent fields, `null`, and strings that are empty after trimming
    /// all fail. Message: "can't be blank".
    Presence { message: Option<String> },

    /// The field must be a string matching the pattern.
    ///
    /// Absent, blank, and non-string values fail. Message: "is invalid".
    Format {
        pattern: Regex,
        message: Option<String>,
    },

    /// The field's string length must fall within the bounds.
    ///
    /// Absent fields count as length 0 (min bounds fail, max bounds pass);
    /// non-string present values fail outright.
    Length {
        min: Option<usize>,
        max: Option<usize>,
        message: Option<String>,
    },

    /// The field must be numeric and within the bounds.
    ///
    /// JSON numbers and numeric strings qualify; bounds are strict.
    Numericality {
        greater_than: Option<f64>,
        less_than: Option<f64>,
        message: Option<String>,
    },
}

impl Rule {
    /// Require the field to be present and non-blank.
    #[must_use]
    pub fn presence() -> Self {
        Self::Presence { message: None }
    }

    /// Require the field to match a pattern.
    #[must_use]
    pub fn format(pattern: Regex) -> Self {
        Self::Format {
            pattern,
            message: None,
        }
    }

    /// Require a minimum string length.
    #[must_use]
    pub fn min_length(min: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: None,
            message: None,
        }
    }

    /// Require a maximum string length.
    #[must_use]
    pub fn max_length(max: usize) -> Self {
        Self::Length {
            min: None,
            max: Some(max),
            message: None,
        }
    }

    /// Require a numeric value strictly greater than `bound`.
    #[must_use]
    pub fn greater_than(bound: f64) -> Self {
        Self::Numericality {
            greater_than: Some(bound),
            less_than: None,
            message: None,
        }
    }

    /// Require a numeric value strictly less than `bound`.
    #[must_use]
    pub fn less_than(bound: f64) -> Self {
        Self::Numericality {
            greater_than: None,
            less_than: Some(bound),
            message: None,
        }
    }

    /// Replace the rule's default failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::Presence { message }
            | Self::Format { message, .. }
            | Self::Length { message, .. }
            | Self::Numericality { message, .. } => message,
        };
        *slot = Some(message.into());
        self
    }

    /// Evaluate the rule against a field value, returning the failure
    /// message when the rule is violated.
    #[must_use]
    pub fn check(&self, value: Option<&Value>) -> Option<String> {
        match self {
            Self::Presence { message } => {
                if is_blank(value) {
                    Some(override_or(message, || "can't be blank".to_owned()))
                } else {
                    None
                }
            }
            Self::Format { pattern, message } => {
                let matched = value
                    .and_then(Value::as_str)
                    .is_some_and(|s| pattern.is_match(s));
                if matched {
                    None
                } else {
                    Some(override_or(message, || "is invalid".to_owned()))
                }
            }
            Self::Length { min, max, message } => check_length(value, *min, *max)
                .map(|default| override_or(message, || default)),
            Self::Numericality {
                greater_than,
                less_than,
                message,
            } => check_numericality(value, *greater_than, *less_than)
                .map(|default| override_or(message, || default)),
        }
    }
}

fn override_or(message: &Option<String>, default: impl FnOnce() -> String) -> String {
    message.clone().unwrap_or_else(default)
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn check_length(value: Option<&Value>, min: Option<usize>, max: Option<usize>) -> Option<String> {
    let length = match value {
        None | Some(Value::Null) => 0,
        Some(Value::String(s)) => s.chars().count(),
        Some(_) => return Some("is invalid".to_owned()),
    };

    if let Some(min) = min
        && length < min
    {
        return Some(format!("is too short (minimum is {min} characters)"));
    }
    if let Some(max) = max
        && length > max
    {
        return Some(format!("is too long (maximum is {max} characters)"));
    }
    None
}

fn check_numericality(
    value: Option<&Value>,
    greater_than: Option<f64>,
    less_than: Option<f64>,
) -> Option<String> {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(number) = number else {
        return Some("is not a number".to_owned());
    };

    if let Some(bound) = greater_than
        && number <= bound
    {
        return Some(format!("must be greater than {}", format_bound(bound)));
    }
    if let Some(bound) = less_than
        && number >= bound
    {
        return Some(format!("must be less than {}", format_bound(bound)));
    }
    None
}

// Renders whole-number bounds without a trailing ".0" ("greater than 0",
// not "greater than 0.0").
fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        format!("{bound}")
    }
}
