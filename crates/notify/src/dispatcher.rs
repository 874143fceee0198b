//! Delivers one alert to every configured destination.
//!
//! Destinations are processed sequentially in the order given. Individual
//! delivery failures don't block the remaining destinations; every outcome
//! is collected into a [`SendReport`].

use alert_core::{AlertMessage, Destination};

use crate::email::EmailNotifier;
use crate::slack::SlackNotifier;
use crate::traits::{DispatchResult, Notifier, NotifyError};

/// Per-destination outcomes of one dispatch, in destination order.
#[derive(Debug, Default)]
pub struct SendReport {
    pub results: Vec<DispatchResult>,
}

impl SendReport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(DispatchResult::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn successes(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Build the notifier matching a destination's type.
pub fn notifier_for(destination: &Destination) -> Result<Box<dyn Notifier>, NotifyError> {
    let notifier: Box<dyn Notifier> = match destination {
        Destination::Email(dest) => Box::new(EmailNotifier::from_destination(dest)?),
        Destination::Slack(dest) => Box::new(SlackNotifier::from_destination(dest)?),
    };
    Ok(notifier)
}

/// Dispatches alerts to an ordered list of channels.
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Create a dispatcher over prepared channels.
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Build one channel per destination.
    ///
    /// Fails on the first destination that cannot be turned into a channel
    /// (e.g. an unparsable email address), before anything is sent.
    pub fn for_destinations(destinations: &[Destination]) -> Result<Self, NotifyError> {
        let channels = destinations
            .iter()
            .map(notifier_for)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(channels))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Deliver the message to every channel, one after another.
    pub async fn dispatch(&self, message: &AlertMessage) -> SendReport {
        if self.channels.is_empty() {
            tracing::debug!("No alert channels configured");
            return SendReport::default();
        }

        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let start = std::time::Instant::now();
            let result = channel.send(message).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let error = match result {
                Ok(()) => {
                    tracing::info!(
                        channel = channel.channel_name(),
                        target = %channel.target(),
                        duration_ms,
                        "Alert delivered"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        channel = channel.channel_name(),
                        target = %channel.target(),
                        error = %e,
                        duration_ms,
                        "Alert delivery failed"
                    );
                    Some(e)
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                target: channel.target(),
                error,
                duration_ms,
            });
        }

        SendReport { results }
    }
}
