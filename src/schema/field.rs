//! Field declarations and value objects

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `local-part@domain` with at least one dot in the domain; domain labels
/// neither start nor end with a hyphen
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9._%+'-]+@",
        r"[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    ))
    .expect("email pattern is a valid regex")
});

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Boolean,
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Bool(_) => FieldKind::Boolean,
        }
    }

    /// Get the text value (returns empty string for boolean values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Bool(_) => "",
        }
    }

    /// Get the boolean value (returns false for text values)
    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Text(_) => false,
        }
    }

    /// Whitespace-only text and `false` both count as empty
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Bool(b) => !b,
        }
    }
}

/// A single check applied to a text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    NonEmpty { message: Option<String> },
    MinLength { min: usize, message: Option<String> },
    Email { message: Option<String> },
}

impl Constraint {
    pub fn non_empty() -> Self {
        Constraint::NonEmpty { message: None }
    }

    pub fn min_length(min: usize) -> Self {
        Constraint::MinLength { min, message: None }
    }

    pub fn email() -> Self {
        Constraint::Email { message: None }
    }

    /// Replace the default failure message
    pub fn with_message(self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match self {
            Constraint::NonEmpty { .. } => Constraint::NonEmpty { message: text },
            Constraint::MinLength { min, .. } => Constraint::MinLength { min, message: text },
            Constraint::Email { .. } => Constraint::Email { message: text },
        }
    }

    /// Message reported when this constraint fails
    pub fn message(&self) -> String {
        match self {
            Constraint::NonEmpty { message } => {
                message.clone().unwrap_or_else(|| REQUIRED_MESSAGE.to_string())
            }
            Constraint::MinLength { min, message } => message
                .clone()
                .unwrap_or_else(|| format!("String must contain at least {min} character(s)")),
            Constraint::Email { message } => {
                message.clone().unwrap_or_else(|| "Invalid email".to_string())
            }
        }
    }

    /// Returns true when `value` satisfies the constraint
    pub fn check(&self, value: &str) -> bool {
        match self {
            Constraint::NonEmpty { .. } => !value.trim().is_empty(),
            Constraint::MinLength { min, .. } => value.trim().chars().count() >= *min,
            Constraint::Email { .. } => EMAIL_PATTERN.is_match(value),
        }
    }
}

/// Message for a required field that has no value
pub const REQUIRED_MESSAGE: &str = "Required";

/// Shows a field only while a boolean toggle is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    /// Name of the boolean field controlling visibility
    pub toggle: String,
    /// Whether the field must be filled while visible
    pub required_when_visible: bool,
}

/// Declarative description of one form field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub constraints: Vec<Constraint>,
    pub optional: bool,
    pub visibility: Option<Visibility>,
    /// Rendered with masked input
    pub is_secret: bool,
}

impl FieldSpec {
    /// Create a new required text field
    pub fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text,
            constraints: Vec::new(),
            optional: false,
            visibility: None,
            is_secret: false,
        }
    }

    /// Create a new boolean toggle
    pub fn boolean(name: &str, label: &str) -> Self {
        Self {
            kind: FieldKind::Boolean,
            ..Self::text(name, label)
        }
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn secret(mut self) -> Self {
        self.is_secret = true;
        self
    }

    /// Hide this field unless `toggle` is on; once shown it must be filled
    pub fn required_when(mut self, toggle: &str) -> Self {
        self.visibility = Some(Visibility {
            toggle: toggle.to_string(),
            required_when_visible: true,
        });
        self
    }

    /// Hide this field unless `toggle` is on, without making it required
    pub fn shown_when(mut self, toggle: &str) -> Self {
        self.visibility = Some(Visibility {
            toggle: toggle.to_string(),
            required_when_visible: false,
        });
        self
    }

    /// Value a field holds before any edit
    pub fn empty_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Boolean => FieldValue::Bool(false),
        }
    }
}
