//! Trait abstraction for the submission collaborator to enable mocking in tests

use crate::schema::ValueSnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// Root message shown when a submission fails without a message of its own
pub const DEFAULT_ROOT_ERROR: &str = "This email is already taken";

/// Why a submission did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Refused with a message meant for the user
    #[error("{0}")]
    Rejected(String),
    /// Any other failure; the cause is logged, not shown
    #[error("submission failed: {0}")]
    Failed(String),
}

impl SubmitError {
    /// Message to surface as the form's root error
    pub fn root_message(&self, default: &str) -> String {
        match self {
            SubmitError::Rejected(message) if !message.trim().is_empty() => message.clone(),
            _ => default.to_string(),
        }
    }
}

/// Receives a validated snapshot and accepts or refuses it
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, values: &ValueSnapshot) -> Result<(), SubmitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_surfaced() {
        let err = SubmitError::Rejected("Handle already in use".to_string());
        assert_eq!(err.root_message(DEFAULT_ROOT_ERROR), "Handle already in use");
    }

    #[test]
    fn test_blank_rejection_falls_back_to_default() {
        let err = SubmitError::Rejected("  ".to_string());
        assert_eq!(err.root_message(DEFAULT_ROOT_ERROR), DEFAULT_ROOT_ERROR);
    }

    #[test]
    fn test_other_failures_use_default() {
        let err = SubmitError::Failed("connection reset".to_string());
        assert_eq!(err.root_message("Try again"), "Try again");
        assert_eq!(err.to_string(), "submission failed: connection reset");
    }

    #[test]
    fn test_mock_submitter_records_snapshot() {
        let mut submitter = MockSubmitter::new();
        submitter
            .expect_submit()
            .withf(|values| values.text("email") == "a@b.com")
            .times(1)
            .returning(|_| Ok(()));

        let values = ValueSnapshot::new().with("email", "a@b.com");
        let result = tokio_test::block_on(submitter.submit(&values));
        assert_eq!(result, Ok(()));
    }
}
