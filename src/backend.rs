//! Simulated submission backend

use crate::form::{SubmitError, Submitter};
use crate::schema::ValueSnapshot;
use async_trait::async_trait;
use std::time::Duration;

/// Stands in for a network call: waits, then refuses taken emails
pub struct SimulatedBackend {
    delay: Duration,
    taken_emails: Vec<String>,
}

impl SimulatedBackend {
    pub fn new(delay: Duration, taken_emails: Vec<String>) -> Self {
        Self {
            delay,
            taken_emails: taken_emails
                .into_iter()
                .map(|e| e.trim().to_lowercase())
                .collect(),
        }
    }
}

#[async_trait]
impl Submitter for SimulatedBackend {
    async fn submit(&self, values: &ValueSnapshot) -> Result<(), SubmitError> {
        tokio::time::sleep(self.delay).await;

        let email = values.text("email").trim().to_lowercase();
        if self.taken_emails.contains(&email) {
            tracing::info!(email = %email, "Refusing taken email");
            return Err(SubmitError::Failed(format!("{email} is already registered")));
        }

        tracing::info!(fields = values.len(), "Accepted submission");
        Ok(())
    }
}
