use indexmap::{IndexMap, IndexSet};
use pactum_rules::RuleSet;
use pactum_shape::Shape;

/// One declared-required parameter: its OR-combined shape alternatives and,
/// for record-shaped parameters, an optional set of field-level rules.
#[derive(Debug, Clone)]
pub struct RequiredParam {
    shapes: Vec<Shape>,
    rules: Option<RuleSet>,
}

impl RequiredParam {
    /// The declared shape alternatives (the value must match at least one).
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The attached field-level rules, when the parameter is record-shaped
    /// and a rule set was declared.
    #[must_use]
    pub fn rules(&self) -> Option<&RuleSet> {
        self.rules.as_ref()
    }
}

/// The per-action-type contract registry: required parameters, promised
/// return values, and declared failure kinds.
///
/// Built once at type-definition time via [`Declarations::builder`] and
/// held in a `static LazyLock` inside [`Action::declarations`]; immutable
/// thereafter. Iteration order is declaration order.
///
/// [`Action::declarations`]: crate::Action::declarations
#[derive(Debug, Clone)]
pub struct Declarations {
    name: String,
    required: IndexMap<String, RequiredParam>,
    promised: IndexMap<String, Vec<Shape>>,
    failure_kinds: IndexSet<String>,
}

impl Declarations {
    /// Start declaring an action contract under the given action name.
    ///
    /// The name appears verbatim in every contract error message.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DeclarationsBuilder {
        DeclarationsBuilder {
            inner: Self {
                name: name.into(),
                required: IndexMap::new(),
                promised: IndexMap::new(),
                failure_kinds: IndexSet::new(),
            },
        }
    }

    /// The action name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared required parameters, in declaration order.
    #[must_use]
    pub fn required(&self) -> &IndexMap<String, RequiredParam> {
        &self.required
    }

    /// Declared promised return values, in declaration order.
    #[must_use]
    pub fn promised(&self) -> &IndexMap<String, Vec<Shape>> {
        &self.promised
    }

    /// Declared failure kinds, in declaration order.
    #[must_use]
    pub fn failure_kinds(&self) -> &IndexSet<String> {
        &self.failure_kinds
    }

    /// The rule set attached to a required parameter, if any.
    #[must_use]
    pub fn rules_for(&self, param: &str) -> Option<&RuleSet> {
        self.required.get(param).and_then(RequiredParam::rules)
    }

    /// Whether the contract declares the given failure kind.
    #[must_use]
    pub fn declares_failure(&self, kind: &str) -> bool {
        self.failure_kinds.contains(kind)
    }
}

/// Consuming builder for [`Declarations`].
///
/// Declarations are append-only during setup; re-declaring a name
/// overwrites the earlier entry (last declaration wins). Call
/// [`extends`](Self::extends) before own declarations so the child's
/// entries can shadow the parent's.
#[derive(Debug, Clone)]
pub struct DeclarationsBuilder {
    inner: Declarations,
}

impl DeclarationsBuilder {
    /// Inherit a parent contract's declarations as a snapshot union.
    ///
    /// The parent's entries are copied in, not delegated to: later changes
    /// to neither side affect the other.
    #[must_use]
    pub fn extends(mut self, parent: &Declarations) -> Self {
        for (name, param) in &parent.required {
            self.inner.required.insert(name.clone(), param.clone());
        }
        for (name, shapes) in &parent.promised {
            self.inner.promised.insert(name.clone(), shapes.clone());
        }
        for kind in &parent.failure_kinds {
            self.inner.failure_kinds.insert(kind.clone());
        }
        self
    }

    /// Declare a required parameter with one-or-more alternative shapes
    /// (OR semantics).
    #[must_use]
    pub fn requires(
        mut self,
        name: impl Into<String>,
        shapes: impl IntoIterator<Item = Shape>,
    ) -> Self {
        self.inner.required.insert(
            name.into(),
            RequiredParam {
                shapes: shapes.into_iter().collect(),
                rules: None,
            },
        );
        self
    }

    /// Declare a required record-shaped parameter with field-level rules.
    ///
    /// The rules are retained only when `shape` is a record descriptor;
    /// for any other shape the rules are dropped and the declaration
    /// behaves like plain [`requires`](Self::requires).
    #[must_use]
    pub fn requires_validated(
        mut self,
        name: impl Into<String>,
        shape: Shape,
        rules: RuleSet,
    ) -> Self {
        let rules = shape.is_record().then_some(rules);
        self.inner.required.insert(
            name.into(),
            RequiredParam {
                shapes: vec![shape],
                rules,
            },
        );
        self
    }

    /// Declare a promised return value with one-or-more alternative shapes.
    #[must_use]
    pub fn returns(
        mut self,
        name: impl Into<String>,
        shapes: impl IntoIterator<Item = Shape>,
    ) -> Self {
        self.inner
            .promised
            .insert(name.into(), shapes.into_iter().collect());
        self
    }

    /// Declare a named failure kind.
    #[must_use]
    pub fn fails_with(mut self, kind: impl Into<String>) -> Self {
        self.inner.failure_kinds.insert(kind.into());
        self
    }

    /// Freeze the declarations.
    #[must_use]
    pub fn build(self) -> Declarations {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use pactum_rules::Rule;
    use pretty_assertions::assert_eq;

    use super::*;

    fn user_shape() -> Shape {
        Shape::record_of([("email", Shape::string()), ("phone", Shape::string())])
    }

    #[test]
    fn builder_collects_declarations_in_order() {
        let decls = Declarations::builder("ProcessOrder")
            .requires("number_of_widgets", [Shape::integer(), Shape::string()])
            .requires("user", [user_shape()])
            .returns("total_cost", [Shape::number()])
            .returns("uppercased_email", [Shape::string()])
            .fails_with("bad_response_from_api")
            .build();

        assert_eq!(decls.name(), "ProcessOrder");
        let required: Vec<&str> = decls.required().keys().map(String::as_str).collect();
        assert_eq!(required, vec!["number_of_widgets", "user"]);
        let promised: Vec<&str> = decls.promised().keys().map(String::as_str).collect();
        assert_eq!(promised, vec!["total_cost", "uppercased_email"]);
        assert!(decls.declares_failure("bad_response_from_api"));
        assert!(!decls.declares_failure("network_down"));
    }

    #[test]
    fn or_alternatives_are_preserved() {
        let decls = Declarations::builder("A")
            .requires("count", [Shape::integer(), Shape::string()])
            .build();
        assert_eq!(decls.required()["count"].shapes().len(), 2);
    }

    #[test]
    fn rules_attach_only_to_record_shapes() {
        let rules = RuleSet::new().field("email", [Rule::presence()]);
        let decls = Declarations::builder("A")
            .requires_validated("user", user_shape(), rules.clone())
            .requires_validated("count", Shape::integer(), rules)
            .build();

        assert!(decls.rules_for("user").is_some());
        assert!(decls.rules_for("count").is_none());
        assert!(decls.rules_for("absent").is_none());
    }

    #[test]
    fn redeclaring_a_name_overwrites() {
        let decls = Declarations::builder("A")
            .requires("count", [Shape::string()])
            .requires("count", [Shape::integer()])
            .build();
        assert_eq!(decls.required().len(), 1);
        assert!(matches!(
            decls.required()["count"].shapes(),
            [Shape::Kind(pactum_shape::Kind::Integer)]
        ));
    }

    #[test]
    fn extends_takes_a_snapshot_union() {
        let parent = Declarations::builder("Parent")
            .requires("count", [Shape::integer()])
            .returns("total", [Shape::number()])
            .fails_with("upstream_error")
            .build();

        let child = Declarations::builder("Child")
            .extends(&parent)
            .requires("user", [user_shape()])
            .returns("total", [Shape::integer()]) // child shadows the parent
            .build();

        let required: Vec<&str> = child.required().keys().map(String::as_str).collect();
        assert_eq!(required, vec!["count", "user"]);
        assert!(child.declares_failure("upstream_error"));
        assert!(matches!(
            child.promised()["total"].as_slice(),
            [Shape::Kind(pactum_shape::Kind::Integer)]
        ));

        // parent is unaffected
        assert_eq!(parent.required().len(), 1);
        assert!(matches!(
            parent.promised()["total"].as_slice(),
            [Shape::Kind(pactum_shape::Kind::Number)]
        ));
    }

    #[test]
    fn fails_with_deduplicates() {
        let decls = Declarations::builder("A")
            .fails_with("oops")
            .fails_with("oops")
            .build();
        assert_eq!(decls.failure_kinds().len(), 1);
    }
}
