//! Shipped form schemas

use crate::schema::{Constraint, CrossFieldRule, FieldSpec, FormSchema};
use serde::{Deserialize, Serialize};

/// Email pre-filled into the minimal form
pub const DEFAULT_EMAIL: &str = "test@email.com";

/// Which shipped schema to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    #[default]
    Minimal,
    Signup,
}

impl SchemaVariant {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimal" => Some(Self::Minimal),
            "signup" => Some(Self::Signup),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Minimal => "Sign In",
            Self::Signup => "Create Account",
        }
    }

    pub fn schema(&self) -> FormSchema {
        match self {
            Self::Minimal => minimal(),
            Self::Signup => signup(),
        }
    }
}

/// Email and password only
pub fn minimal() -> FormSchema {
    FormSchema::new()
        .field(FieldSpec::text("email", "Email").constraint(Constraint::email()))
        .field(
            FieldSpec::text("password", "Password")
                .secret()
                .constraint(Constraint::min_length(8)),
        )
}

/// Full registration form.
///
/// Adds a contact requirement (phone or Telegram) and a GitHub handle that
/// becomes required once the user says they have an account.
pub fn signup() -> FormSchema {
    FormSchema::new()
        .field(
            FieldSpec::text("name", "Name")
                .constraint(Constraint::non_empty().with_message("Name is required")),
        )
        .field(FieldSpec::text("email", "Email").constraint(Constraint::email()))
        .field(
            FieldSpec::text("password", "Password")
                .secret()
                .constraint(Constraint::min_length(8)),
        )
        .field(FieldSpec::text("confirm_password", "Confirm password").secret())
        .field(FieldSpec::text("phone", "Phone (optional)").optional())
        .field(
            FieldSpec::text("telegram", "Telegram (optional)")
                .optional()
                .constraint(
                    Constraint::min_length(5)
                        .with_message("Telegram handles are at least 5 characters"),
                ),
        )
        .field(FieldSpec::boolean("has_github", "I have a GitHub account"))
        .field(
            FieldSpec::text("github", "GitHub handle")
                .optional()
                .required_when("has_github"),
        )
        .rule(CrossFieldRule::matches(
            "confirm_password",
            "password",
            "Passwords don't match",
        ))
        .rule(CrossFieldRule::at_least_one_of(
            "phone",
            "telegram",
            "phone",
            "Provide a phone number or a Telegram handle",
        ))
}
