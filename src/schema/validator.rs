//! Schema compilation and the validation pass

use super::field::{FieldKind, FieldSpec, REQUIRED_MESSAGE};
use super::rule::CrossFieldRule;
use super::snapshot::ValueSnapshot;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Pseudo-field carrying form-level errors
pub const ROOT_FIELD: &str = "root";

/// Problems found while compiling a [`FormSchema`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    #[error("field name `{0}` is reserved")]
    ReservedName(String),
    #[error("boolean field `{0}` cannot carry text constraints")]
    ConstraintOnBoolean(String),
    #[error("field `{field}` is toggled by `{toggle}`, which is not a boolean field")]
    InvalidToggle { field: String, toggle: String },
    #[error("rule targets unknown field `{0}`")]
    UnknownRuleTarget(String),
    #[error("rule reads unknown field `{0}`")]
    UnknownRuleDependency(String),
}

/// Ordered field declarations plus cross-field rules
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
    rules: Vec<CrossFieldRule>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn rule(mut self, rule: CrossFieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `spec` is currently shown given `values`
    pub fn is_visible(&self, spec: &FieldSpec, values: &ValueSnapshot) -> bool {
        spec.visibility
            .as_ref()
            .map_or(true, |v| values.flag(&v.toggle))
    }

    /// Fields currently shown given `values`, in declaration order
    pub fn visible_fields<'a>(
        &'a self,
        values: &'a ValueSnapshot,
    ) -> impl Iterator<Item = &'a FieldSpec> + 'a {
        self.fields.iter().filter(|f| self.is_visible(f, values))
    }

    /// Snapshot holding every field's empty value
    pub fn empty_values(&self) -> ValueSnapshot {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.empty_value()))
            .collect()
    }
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
    is_valid: bool,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Message for `field`, if it failed. Accepts [`ROOT_FIELD`].
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Copy of this result with `field` marked failed
    pub(crate) fn with_error(&self, field: &str, message: &str) -> Self {
        let mut errors = self.errors.clone();
        errors.insert(field.to_string(), message.to_string());
        Self {
            errors,
            is_valid: false,
        }
    }
}

/// A compiled schema: a pure function from snapshot to [`ValidationResult`]
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: FormSchema,
}

impl SchemaValidator {
    /// Check the schema's structural invariants and compile it
    pub fn compile(schema: FormSchema) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for spec in &schema.fields {
            if spec.name == ROOT_FIELD {
                return Err(SchemaError::ReservedName(spec.name.clone()));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateField(spec.name.clone()));
            }
            if spec.kind == FieldKind::Boolean && !spec.constraints.is_empty() {
                return Err(SchemaError::ConstraintOnBoolean(spec.name.clone()));
            }
        }

        for spec in &schema.fields {
            if let Some(visibility) = &spec.visibility {
                let is_boolean = schema
                    .get(&visibility.toggle)
                    .is_some_and(|t| t.kind == FieldKind::Boolean && t.name != spec.name);
                if !is_boolean {
                    return Err(SchemaError::InvalidToggle {
                        field: spec.name.clone(),
                        toggle: visibility.toggle.clone(),
                    });
                }
            }
        }

        for rule in &schema.rules {
            if rule.target() != ROOT_FIELD && !seen.contains(rule.target()) {
                return Err(SchemaError::UnknownRuleTarget(rule.target().to_string()));
            }
            if let Some(missing) = rule
                .depends_on()
                .iter()
                .find(|d| !seen.contains(d.as_str()))
            {
                return Err(SchemaError::UnknownRuleDependency(missing.clone()));
            }
        }

        tracing::debug!(
            fields = schema.fields.len(),
            rules = schema.rules.len(),
            "Compiled form schema"
        );
        Ok(Self { schema })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Validate `values` against the schema
    pub fn run(&self, values: &ValueSnapshot) -> ValidationResult {
        let mut errors = BTreeMap::new();

        for spec in &self.schema.fields {
            if !self.schema.is_visible(spec, values) {
                continue;
            }
            if let Some(message) = field_error(spec, values) {
                errors.insert(spec.name.clone(), message);
            }
        }

        let mut rules_pass = true;
        if errors.is_empty() {
            for rule in &self.schema.rules {
                if !rule.passes(values) {
                    rules_pass = false;
                    errors.insert(rule.target().to_string(), rule.message().to_string());
                }
            }
        }

        let is_valid = errors.is_empty() && rules_pass;
        tracing::trace!(is_valid, errors = errors.len(), "Validation pass");
        ValidationResult { errors, is_valid }
    }
}

/// First failing constraint's message for one field
fn field_error(spec: &FieldSpec, values: &ValueSnapshot) -> Option<String> {
    if spec.kind == FieldKind::Boolean {
        return None;
    }

    let value = match values.get(&spec.name) {
        Some(value) => value.as_text(),
        None if spec.optional => return None,
        None => return Some(REQUIRED_MESSAGE.to_string()),
    };

    let blank = value.trim().is_empty();
    if spec.optional && blank {
        return None;
    }

    spec.constraints
        .iter()
        .find(|c| !c.check(value))
        .map(|c| c.message())
        .or_else(|| blank.then(|| REQUIRED_MESSAGE.to_string()))
}
