//! Validation rules spanning more than one field

use super::snapshot::ValueSnapshot;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&ValueSnapshot) -> bool + Send + Sync>;

/// A predicate over the whole snapshot, reported at `target` when it fails.
///
/// Rules only run once every field has passed its own constraints. The
/// predicate must still be total: optional fields may be unset.
#[derive(Clone)]
pub struct CrossFieldRule {
    target: String,
    message: String,
    /// Fields the predicate reads, checked against the schema at compile time
    depends_on: Vec<String>,
    predicate: Predicate,
}

impl CrossFieldRule {
    /// Build a rule from an arbitrary predicate
    pub fn new<F>(target: &str, message: &str, predicate: F) -> Self
    where
        F: Fn(&ValueSnapshot) -> bool + Send + Sync + 'static,
    {
        Self {
            target: target.to_string(),
            message: message.to_string(),
            depends_on: Vec::new(),
            predicate: Arc::new(predicate),
        }
    }

    /// Passes when at least one of `first` and `second` is filled
    pub fn at_least_one_of(first: &str, second: &str, target: &str, message: &str) -> Self {
        let (a, b) = (first.to_string(), second.to_string());
        Self::new(target, message, move |values| {
            !values.is_blank(&a) || !values.is_blank(&b)
        })
        .reads(&[first, second])
    }

    /// Passes when `field` holds the same text as `other`; reported at `field`
    pub fn matches(field: &str, other: &str, message: &str) -> Self {
        let (a, b) = (field.to_string(), other.to_string());
        Self::new(field, message, move |values| values.text(&a) == values.text(&b))
            .reads(&[field, other])
    }

    /// Declare the fields the predicate reads
    pub fn reads(mut self, fields: &[&str]) -> Self {
        self.depends_on
            .extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn passes(&self, values: &ValueSnapshot) -> bool {
        (self.predicate)(values)
    }
}

impl fmt::Debug for CrossFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossFieldRule")
            .field("target", &self.target)
            .field("message", &self.message)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least_one_of() {
        let rule = CrossFieldRule::at_least_one_of("phone", "telegram", "phone", "Need one");
        let empty = ValueSnapshot::new();
        assert!(!rule.passes(&empty));
        assert!(!rule.passes(&empty.with("phone", "   ")));
        assert!(rule.passes(&empty.with("telegram", "@ada")));
        assert!(rule.passes(&empty.with("phone", "555").with("telegram", "@ada")));
        assert_eq!(rule.depends_on(), ["phone", "telegram"]);
    }

    #[test]
    fn test_matches_targets_first_field() {
        let rule = CrossFieldRule::matches("confirm", "password", "Passwords don't match");
        assert_eq!(rule.target(), "confirm");
        let values = ValueSnapshot::new().with("password", "hunter22");
        assert!(!rule.passes(&values.with("confirm", "hunter2")));
        assert!(rule.passes(&values.with("confirm", "hunter22")));
    }

    #[test]
    fn test_custom_predicate_is_total_over_unset_fields() {
        let rule = CrossFieldRule::new("root", "Pick a plan", |v| v.flag("plan_selected"));
        assert!(!rule.passes(&ValueSnapshot::new()));
        assert!(rule.passes(&ValueSnapshot::new().with("plan_selected", true)));
    }

    #[test]
    fn test_debug_omits_predicate() {
        let rule = CrossFieldRule::new("root", "msg", |_| true);
        let debug_str = format!("{:?}", rule);
        assert!(debug_str.contains("CrossFieldRule"));
        assert!(debug_str.contains("root"));
    }
}
