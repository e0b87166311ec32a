//! Form controller layer
//!
//! Holds field values, re-validates on every edit, and drives submission
//! through the [`Submitter`] collaborator.

mod controller;
mod submitter;

pub use controller::{
    derive_enabled, FormController, FormError, FormState, SubmissionState, SubmitOutcome,
};
pub use submitter::{SubmitError, Submitter, DEFAULT_ROOT_ERROR};

#[cfg(test)]
pub use submitter::MockSubmitter;
