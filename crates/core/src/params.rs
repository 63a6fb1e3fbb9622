use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// The parameter bag supplied to an action at construction.
///
/// An ordered name → value map. Once an [`Instance`](crate::Instance) holds
/// a bag it is immutable — the instance exposes readers only.
///
/// The [`params!`](crate::params) macro is the usual way to build one:
///
/// ```rust
/// let params = pactum_core::params! {
///     "number_of_widgets" => 32,
///     "user" => { "email": "ada@lovelace.net" },
/// };
/// assert_eq!(params.integer_of("number_of_widgets"), Some(32));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params {
    entries: IndexMap<String, Value>,
}

impl Params {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder-style, consuming).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Add an entry in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Look up a raw value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Whether the bag carries an entry with the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over entry names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry as a string slice, when present and a string.
    #[must_use]
    pub fn str_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The entry as an `f64`, when present and numeric.
    #[must_use]
    pub fn number_of(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// The entry as an `i64`, when present and an integer.
    #[must_use]
    pub fn integer_of(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// The entry as a boolean, when present and a boolean.
    #[must_use]
    pub fn bool_of(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// The entry as a record (JSON object), when present and an object.
    #[must_use]
    pub fn record_of(&self, name: &str) -> Option<&Map<String, Value>> {
        self.get(name).and_then(Value::as_object)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Build a [`Params`] bag from `name => value` pairs.
///
/// Values go through [`serde_json::json!`], so any JSON literal works:
///
/// ```rust
/// let params = pactum_core::params! {
///     "number" => 8,
///     "tags" => ["a", "b"],
///     "user" => { "email": "ada@lovelace.net" },
/// };
/// assert_eq!(params.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::Params::new() };
    ( $( $name:expr => $value:tt ),+ $(,)? ) => {{
        let mut params = $crate::Params::new();
        $( params.insert($name, $crate::__serde_json::json!($value)); )+
        params
    }};
}
