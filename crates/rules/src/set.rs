use serde_json::{Map, Value};

use crate::rule::Rule;
use crate::violation::Violation;

/// The rules attached to one record field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: String,
    rules: Vec<Rule>,
}

impl FieldRules {
    /// The field the rules apply to.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The rules, in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// An ordered set of per-field validation rules.
///
/// Checking a record evaluates every rule of every field in declaration
/// order and collects all violations; it never short-circuits.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach rules to a field (builder-style, consuming).
    ///
    /// Declaring the same field twice keeps both groups; they are checked
    /// in order.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push(FieldRules {
            field: field.into(),
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// The per-field rule groups, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    /// Whether the set declares no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.rules.is_empty())
    }

    /// Evaluate every rule against the record, collecting all violations.
    #[must_use]
    pub fn check(&self, record: &Map<String, Value>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for group in &self.fields {
            let value = record.get(&group.field);
            for rule in &group.rules {
                if let Some(message) = rule.check(value) {
                    violations.push(Violation::new(group.field.clone(), message));
                }
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use regex::Regex;
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> Map<String, serde_json::Value> {
        value.as_object().unwrap().clone()
    }

    fn contact_rules() -> RuleSet {
        RuleSet::new()
            .field(
                "email",
                [
                    Rule::presence(),
                    Rule::format(Regex::new(r"[a-z]+@[a-z]+\.[a-z]+").unwrap()),
                ],
            )
            .field(
                "phone",
                [
                    Rule::presence(),
                    Rule::format(Regex::new(r"[0-9]{11}").unwrap()),
                ],
            )
    }

    #[test]
    fn valid_record_has_no_violations() {
        let violations = contact_rules().check(&record(json!({
            "email": "ada@lovelace.net",
            "phone": "15551239876",
        })));
        assert_eq!(violations, vec![]);
    }

    #[test]
    fn blank_field_collects_every_failing_rule() {
        let violations = contact_rules().check(&record(json!({
            "email": "ada@lovelace.net",
            "phone": "",
        })));
        assert_eq!(
            violations,
            vec![
                Violation::new("phone", "can't be blank"),
                Violation::new("phone", "is invalid"),
            ]
        );
    }

    #[test]
    fn absent_field_is_checked_like_a_blank_one() {
        let violations = contact_rules().check(&record(json!({
            "email": "ada@lovelace.net",
        })));
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.field() == "phone"));
    }

    #[test]
    fn violations_follow_declaration_order_across_fields() {
        let violations = contact_rules().check(&record(json!({})));
        let fields: Vec<&str> = violations.iter().map(Violation::field).collect();
        assert_eq!(fields, vec!["email", "email", "phone", "phone"]);
    }

    #[test]
    fn same_field_declared_twice_keeps_both_groups() {
        let rules = RuleSet::new()
            .field("name", [Rule::presence()])
            .field("name", [Rule::min_length(3)]);
        let violations = rules.check(&record(json!({ "name": "ab" })));
        assert_eq!(
            violations,
            vec![Violation::new(
                "name",
                "is too short (minimum is 3 characters)"
            )]
        );
    }

    #[test]
    fn empty_set_is_empty() {
        assert!(RuleSet::new().is_empty());
        assert!(RuleSet::new().field("a", []).is_empty());
        assert!(!RuleSet::new().field("a", [Rule::presence()]).is_empty());
    }

    #[test]
    fn check_is_idempotent() {
        let rules = contact_rules();
        let record = record(json!({ "phone": "" }));
        assert_eq!(rules.check(&record), rules.check(&record));
    }
}
