//! Notifier trait definition and shared error types.

use alert_core::AlertMessage;

/// Errors that can occur while rendering or delivering an alert.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Invalid channel '{channel}': {reason}")]
    InvalidChannel { channel: String, reason: String },

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Slack API error: {0}")]
    Api(String),
}

/// A delivery channel bound to one destination.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Render and deliver the message through this channel.
    async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "slack", "email").
    fn channel_name(&self) -> &str;

    /// Where this channel delivers to (channel or recipient list), for reports.
    fn target(&self) -> String;
}

/// Result of dispatching a message to a single destination.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    pub target: String,
    pub error: Option<NotifyError>,
    pub duration_ms: u64,
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
