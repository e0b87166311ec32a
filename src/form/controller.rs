//! Form controller: value snapshot, validation and submission lifecycle

use super::submitter::{Submitter, DEFAULT_ROOT_ERROR};
use crate::schema::{
    FieldKind, FieldSpec, FieldValue, FormSchema, SchemaValidator, ValidationResult,
    ValueSnapshot, REQUIRED_MESSAGE, ROOT_FIELD,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Where the form is in its submission cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Carries the root-level error message
    Failed(String),
}

/// What a call to [`FormController::submit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the submitter was not called
    Invalid,
    /// Another submission is in flight; nothing happened
    AlreadySubmitting,
    Succeeded,
    /// The submitter refused; carries the root error now shown
    Failed(String),
}

/// Misuse of the controller's edit API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{field}` expects a {expected:?} value")]
    KindMismatch { field: String, expected: FieldKind },
}

/// Everything a front end needs to render the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub values: ValueSnapshot,
    pub validation: ValidationResult,
    pub submission: SubmissionState,
    pub derived_enabled: bool,
}

impl FormState {
    pub fn is_submitting(&self) -> bool {
        self.submission == SubmissionState::Submitting
    }

    /// Form-level error: a failed submission, else a rule targeting the root
    pub fn root_error(&self) -> Option<&str> {
        match &self.submission {
            SubmissionState::Failed(message) => Some(message),
            _ => self.validation.error(ROOT_FIELD),
        }
    }

    /// Error for `field`, or the root error for [`ROOT_FIELD`]
    pub fn error(&self, field: &str) -> Option<&str> {
        if field == ROOT_FIELD {
            self.root_error()
        } else {
            self.validation.error(field)
        }
    }
}

/// Whether submission is currently allowed.
///
/// Requires that no submission is in flight, that the schema passes, and that
/// every visible conditionally-required field is filled.
pub fn derive_enabled(
    validation: &ValidationResult,
    values: &ValueSnapshot,
    schema: &FormSchema,
    submission: &SubmissionState,
) -> bool {
    *submission != SubmissionState::Submitting
        && validation.is_valid()
        && missing_conditional(schema, values).next().is_none()
}

/// Visible fields that are required by their toggle but still blank
fn missing_conditional<'a>(
    schema: &'a FormSchema,
    values: &'a ValueSnapshot,
) -> impl Iterator<Item = &'a FieldSpec> + 'a {
    schema.visible_fields(values).filter(move |spec| {
        spec.visibility
            .as_ref()
            .is_some_and(|v| v.required_when_visible)
            && values.is_blank(&spec.name)
    })
}

struct Inner {
    values: ValueSnapshot,
    validation: ValidationResult,
    submission: SubmissionState,
    derived_enabled: bool,
}

/// Holds one form's values and drives validation and submission.
///
/// Edits are applied atomically under a lock that is never held across the
/// submitter call, so the controller can be shared through an `Arc` while a
/// submission is pending. At most one submission is in flight at a time.
pub struct FormController {
    validator: SchemaValidator,
    submitter: Arc<dyn Submitter>,
    initial: ValueSnapshot,
    default_root_error: String,
    inner: Mutex<Inner>,
}

impl FormController {
    /// Create a controller with every field at its empty value
    pub fn new(validator: SchemaValidator, submitter: Arc<dyn Submitter>) -> Self {
        let initial = validator.schema().empty_values();
        let inner = Self::evaluate(&validator, initial.clone(), SubmissionState::Idle);
        Self {
            validator,
            submitter,
            initial,
            default_root_error: DEFAULT_ROOT_ERROR.to_string(),
            inner: Mutex::new(inner),
        }
    }

    /// Seed the form with default values; unknown or mistyped entries are skipped
    pub fn with_values(mut self, defaults: &ValueSnapshot) -> Self {
        let schema = self.validator.schema();
        let mut initial = self.initial.clone();
        for (name, value) in defaults.iter() {
            match schema.get(name) {
                Some(spec) if spec.kind == value.kind() => initial = initial.with(name, value.clone()),
                _ => tracing::warn!(field = name, "Ignoring default for unknown or mistyped field"),
            }
        }
        *self.lock() = Self::evaluate(&self.validator, initial.clone(), SubmissionState::Idle);
        self.initial = initial;
        self
    }

    /// Root message used when the submitter fails without one of its own
    pub fn with_default_root_error(mut self, message: impl Into<String>) -> Self {
        self.default_root_error = message.into();
        self
    }

    pub fn schema(&self) -> &FormSchema {
        self.validator.schema()
    }

    /// Set one field, re-validate, and recompute enablement
    pub fn set_field(&self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let value = value.into();
        let spec = self
            .schema()
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if spec.kind != value.kind() {
            return Err(FormError::KindMismatch {
                field: name.to_string(),
                expected: spec.kind,
            });
        }

        let mut inner = self.lock();
        let values = inner.values.with(name, value);
        let submission = std::mem::take(&mut inner.submission);
        *inner = Self::evaluate(&self.validator, values, submission);
        tracing::debug!(
            field = name,
            is_valid = inner.validation.is_valid(),
            enabled = inner.derived_enabled,
            "Field updated"
        );
        Ok(())
    }

    /// Validate once more and, if allowed, hand the snapshot to the submitter
    pub async fn submit(&self) -> SubmitOutcome {
        let values = {
            let mut inner = self.lock();
            if inner.submission == SubmissionState::Submitting {
                tracing::debug!("Submit ignored, a submission is already in flight");
                return SubmitOutcome::AlreadySubmitting;
            }

            let mut validation = self.validator.run(&inner.values);
            for spec in missing_conditional(self.schema(), &inner.values) {
                validation = validation.with_error(&spec.name, REQUIRED_MESSAGE);
            }
            if !validation.is_valid() {
                tracing::debug!(errors = validation.errors().len(), "Submit blocked by validation");
                inner.validation = validation;
                inner.derived_enabled = false;
                return SubmitOutcome::Invalid;
            }

            inner.validation = validation;
            inner.submission = SubmissionState::Submitting;
            inner.derived_enabled = false;
            inner.values.clone()
        };

        tracing::info!("Submitting form");
        let result = self.submitter.submit(&values).await;

        let mut inner = self.lock();
        let outcome = match result {
            Ok(()) => {
                tracing::info!("Submission succeeded");
                inner.submission = SubmissionState::Succeeded;
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                tracing::warn!(error = %err, "Submission failed");
                let message = err.root_message(&self.default_root_error);
                inner.submission = SubmissionState::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        };
        inner.derived_enabled = derive_enabled(
            &inner.validation,
            &inner.values,
            self.schema(),
            &inner.submission,
        );
        outcome
    }

    /// Return to the initial values; ignored while a submission is in flight
    pub fn reset(&self) -> bool {
        let mut inner = self.lock();
        if inner.submission == SubmissionState::Submitting {
            return false;
        }
        *inner = Self::evaluate(&self.validator, self.initial.clone(), SubmissionState::Idle);
        tracing::debug!("Form reset");
        true
    }

    pub fn get_state(&self) -> FormState {
        let inner = self.lock();
        FormState {
            values: inner.values.clone(),
            validation: inner.validation.clone(),
            submission: inner.submission.clone(),
            derived_enabled: inner.derived_enabled,
        }
    }

    fn evaluate(
        validator: &SchemaValidator,
        values: ValueSnapshot,
        submission: SubmissionState,
    ) -> Inner {
        let validation = validator.run(&values);
        let derived_enabled =
            derive_enabled(&validation, &values, validator.schema(), &submission);
        Inner {
            values,
            validation,
            submission,
            derived_enabled,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
