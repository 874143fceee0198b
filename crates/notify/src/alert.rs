//! `send_alert`: fan one message out to every destination.

use alert_core::{AlertConfig, AlertMessage, ConfigError, Destination, ValidationError};

use crate::dispatcher::{Dispatcher, SendReport};
use crate::traits::NotifyError;

/// Why an alert was not delivered everywhere.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid destination: {0}")]
    Destination(NotifyError),

    #[error("No alert destinations configured")]
    NoDestinations,

    #[error("{} of {} alert destinations failed", .0.failure_count(), .0.len())]
    Delivery(SendReport),
}

impl AlertError {
    /// The full per-destination report, when delivery was attempted.
    pub fn report(&self) -> Option<&SendReport> {
        match self {
            AlertError::Delivery(report) => Some(report),
            _ => None,
        }
    }
}

/// Send an alert to each destination in order.
///
/// Every destination is attempted even when an earlier one fails. Returns
/// the report when all succeeded, otherwise [`AlertError::Delivery`] carrying
/// every outcome. Destinations that cannot be set up at all (bad addresses,
/// empty tokens) abort before anything is sent.
pub async fn send_alert(
    message: &AlertMessage,
    destinations: &[Destination],
) -> Result<SendReport, AlertError> {
    if destinations.is_empty() {
        return Err(AlertError::NoDestinations);
    }

    let dispatcher = Dispatcher::for_destinations(destinations).map_err(AlertError::Destination)?;

    tracing::debug!(
        subject = %message.subject(),
        components = message.components().len(),
        destinations = dispatcher.len(),
        "sending alert"
    );

    let report = dispatcher.dispatch(message).await;
    if report.is_success() {
        Ok(report)
    } else {
        Err(AlertError::Delivery(report))
    }
}

/// Send an alert to the destinations derived from `config`.
pub async fn send_alert_with_config(
    message: &AlertMessage,
    config: &AlertConfig,
) -> Result<SendReport, AlertError> {
    let destinations = config.destinations()?;
    send_alert(message, &destinations).await
}
