use serde_json::Value;

use crate::descriptor::{Kind, Shape};

impl Kind {
    /// Whether a candidate value is of this concrete kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Null => value.is_null(),
            Self::Bool => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

impl Shape {
    /// Whether a candidate value matches this shape.
    ///
    /// The single recursive matching function of the descriptor language:
    ///
    /// - a type tag matches values of that kind;
    /// - a disjunction matches when at least one alternative matches;
    /// - a predicate matches when its test returns `true`;
    /// - an `ArrayOf` matches arrays whose every element matches;
    /// - a `RecordOf` matches objects carrying every declared key with a
    ///   matching value (extra keys are permitted).
    ///
    /// Matching is total; a value of the wrong outer kind simply fails.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Kind(kind) => kind.matches(value),
            Self::AnyOf(alternatives) => alternatives.iter().any(|shape| shape.matches(value)),
            Self::Predicate(predicate) => predicate.test(value),
            Self::ArrayOf(element) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| element.matches(item))),
            Self::RecordOf(fields) => value.as_object().is_some_and(|record| {
                fields
                    .iter()
                    .all(|(key, shape)| record.get(key).is_some_and(|field| shape.matches(field)))
            }),
        }
    }
}
