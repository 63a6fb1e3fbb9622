use std::fmt;

use serde::Serialize;

/// One failed rule: the field it concerns and the failure message.
///
/// The message is the rule's fragment ("can't be blank"); callers that
/// report errors to humans want [`Violation::full_message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    field: String,
    message: String,
}

impl Violation {
    /// Build a violation for `field` with the given message fragment.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field the violation concerns.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The failure message fragment, e.g. "can't be blank".
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The field and message joined for human consumption:
    /// `` `email` can't be blank ``.
    #[must_use]
    pub fn full_message(&self) -> String {
        format!("`{}` {}", self.field, self.message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.field, self.message)
    }
}
