use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// Concrete type tag for a JSON value.
///
/// `Integer` is narrower than `Number`: it matches only numbers
/// representable as `i64` or `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    Integer,
    String,
    Array,
    Object,
}

impl Kind {
    /// Human description used in contract error messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "a boolean",
            Self::Number => "a number",
            Self::Integer => "an integer",
            Self::String => "a string",
            Self::Array => "an array",
            Self::Object => "an object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A named predicate over a candidate value.
///
/// The label stands in for the closure in `Debug` and `Display` output, so
/// error messages can say what the predicate checks.
#[derive(Clone)]
pub struct Predicate {
    label: String,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    /// Build a predicate shape component from a label and a test closure.
    pub fn new(label: impl Into<String>, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// The label given at construction.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluate the predicate against a candidate value.
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A closed description of acceptable values.
///
/// The five variants cover the descriptor language of action contracts:
/// concrete type tags, OR-combined alternatives, named predicates,
/// homogeneous sequences, and keyed records.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A concrete type tag.
    Kind(Kind),
    /// A disjunction: the value must match at least one alternative.
    AnyOf(Vec<Shape>),
    /// A named predicate over the candidate value.
    Predicate(Predicate),
    /// A homogeneous sequence: every element must match the inner shape.
    ArrayOf(Box<Shape>),
    /// A keyed record: every declared key must be present and match.
    /// Keys not mentioned in the descriptor are permitted.
    RecordOf(IndexMap<String, Shape>),
}

impl Shape {
    /// The `null` type tag.
    #[must_use]
    pub fn null() -> Self {
        Self::Kind(Kind::Null)
    }

    /// The boolean type tag.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Kind(Kind::Bool)
    }

    /// The numeric type tag (any JSON number).
    #[must_use]
    pub fn number() -> Self {
        Self::Kind(Kind::Number)
    }

    /// The integer type tag (numbers representable as `i64`/`u64`).
    #[must_use]
    pub fn integer() -> Self {
        Self::Kind(Kind::Integer)
    }

    /// The string type tag.
    #[must_use]
    pub fn string() -> Self {
        Self::Kind(Kind::String)
    }

    /// The array type tag, with no constraint on elements.
    #[must_use]
    pub fn array() -> Self {
        Self::Kind(Kind::Array)
    }

    /// The object type tag, with no constraint on keys.
    #[must_use]
    pub fn object() -> Self {
        Self::Kind(Kind::Object)
    }

    /// A disjunction of alternative shapes (OR semantics).
    #[must_use]
    pub fn any_of(alternatives: impl IntoIterator<Item = Shape>) -> Self {
        Self::AnyOf(alternatives.into_iter().collect())
    }

    /// A homogeneous sequence whose elements all match `element`.
    #[must_use]
    pub fn array_of(element: Shape) -> Self {
        Self::ArrayOf(Box::new(element))
    }

    /// A keyed record with per-key shapes.
    #[must_use]
    pub fn record_of<K: Into<String>>(fields: impl IntoIterator<Item = (K, Shape)>) -> Self {
        Self::RecordOf(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// A named predicate shape.
    pub fn predicate(
        label: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Predicate(Predicate::new(label, test))
    }

    /// Whether this shape is a record descriptor.
    ///
    /// Record descriptors are the only shapes that field-level validation
    /// rules may attach to.
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, Self::RecordOf(_))
    }

    /// The record fields, when this shape is a record descriptor.
    #[must_use]
    pub fn record_fields(&self) -> Option<&IndexMap<String, Shape>> {
        match self {
            Self::RecordOf(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => kind.fmt(f),
            Self::AnyOf(alternatives) => {
                f.write_str("one of (")?;
                for (i, shape) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    shape.fmt(f)?;
                }
                f.write_str(")")
            }
            Self::Predicate(predicate) => write!(f, "a value satisfying `{}`", predicate.label()),
            Self::ArrayOf(element) => write!(f, "an array of {element}"),
            Self::RecordOf(fields) => {
                f.write_str("a record with { ")?;
                for (i, (key, shape)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {shape}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// Render a list of OR-combined alternatives the way contracts describe
/// them: a single alternative stands alone, several are grouped.
#[must_use]
pub fn describe_alternatives(shapes: &[Shape]) -> String {
    match shapes {
        [only] => only.to_string(),
        many => Shape::any_of(many.to_vec()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_descriptions() {
        assert_eq!(Kind::Null.describe(), "null");
        assert_eq!(Kind::Number.describe(), "a number");
        assert_eq!(Kind::Object.describe(), "an object");
    }

    #[test]
    fn display_simple_shapes() {
        assert_eq!(Shape::number().to_string(), "a number");
        assert_eq!(Shape::string().to_string(), "a string");
    }

    #[test]
    fn display_any_of() {
        let shape = Shape::any_of([Shape::integer(), Shape::string()]);
        assert_eq!(shape.to_string(), "one of (an integer | a string)");
    }

    #[test]
    fn display_array_of() {
        let shape = Shape::array_of(Shape::number());
        assert_eq!(shape.to_string(), "an array of a number");
    }

    #[test]
    fn display_record_of() {
        let shape = Shape::record_of([("email", Shape::string()), ("phone", Shape::string())]);
        assert_eq!(
            shape.to_string(),
            "a record with { email: a string, phone: a string }"
        );
    }

    #[test]
    fn display_predicate() {
        let shape = Shape::predicate("is_even", |v| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert_eq!(shape.to_string(), "a value satisfying `is_even`");
    }

    #[test]
    fn display_nested() {
        let shape = Shape::array_of(Shape::any_of([Shape::number(), Shape::null()]));
        assert_eq!(shape.to_string(), "an array of one of (a number | null)");
    }

    #[test]
    fn describe_alternatives_single_and_many() {
        assert_eq!(describe_alternatives(&[Shape::number()]), "a number");
        assert_eq!(
            describe_alternatives(&[Shape::integer(), Shape::null()]),
            "one of (an integer | null)"
        );
    }

    #[test]
    fn is_record_only_for_record_descriptors() {
        assert!(Shape::record_of([("a", Shape::null())]).is_record());
        assert!(!Shape::object().is_record());
        assert!(!Shape::any_of([Shape::record_of([("a", Shape::null())])]).is_record());
    }

    #[test]
    fn record_fields_accessor() {
        let shape = Shape::record_of([("email", Shape::string())]);
        let fields = shape.record_fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("email"));
        assert!(Shape::number().record_fields().is_none());
    }

    #[test]
    fn predicate_debug_hides_closure() {
        let predicate = Predicate::new("positive", |v| v.as_f64().is_some_and(|n| n > 0.0));
        let rendered = format!("{predicate:?}");
        assert!(rendered.contains("positive"));
    }
}
