use async_trait::async_trait;
use thiserror::Error;

use crate::models::PublicUser;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outbound notifications to users
///
/// Failures are reported to the caller, which decides whether they matter.
/// Registration treats them as non-fatal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn registered(&self, user: &PublicUser) -> Result<(), NotifyError>;
}

/// Notifier that records each notification in the log instead of sending it
pub struct LogNotifier {
    enabled: bool,
    sender: String,
}

impl LogNotifier {
    pub fn new(enabled: bool, sender: impl Into<String>) -> Self {
        Self {
            enabled,
            sender: sender.into(),
        }
    }

    /// Subject and body of the welcome message; never carries the password
    pub fn welcome(user: &PublicUser) -> (String, String) {
        let subject = "Welcome to the job platform".to_string();
        let body = format!(
            "Hello {},\n\nYour account has been created. Sign in with the username \"{}\".",
            user.username, user.username
        );
        (subject, body)
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn registered(&self, user: &PublicUser) -> Result<(), NotifyError> {
        if !self.enabled {
            tracing::debug!("Notifications disabled, skipping welcome for user {}", user.id);
            return Ok(());
        }

        let (subject, body) = Self::welcome(user);
        tracing::info!(
            from = %self.sender,
            to = %user.email,
            subject = %subject,
            body_len = body.len(),
            "Welcome notification"
        );

        Ok(())
    }
}
