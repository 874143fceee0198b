//! Rendering and delivery of alert messages.
//!
//! This crate provides:
//! - HTML, Slack Block Kit, and Markdown renderers for [`alert_core::Component`]
//! - Assemblers that turn a whole message into an email document or Slack block batches
//! - `Notifier` trait with email (SMTP) and Slack (Web API) implementations
//! - Dispatcher that delivers to every destination and reports each outcome
//! - `send_alert`, the entry point tying it all together

pub mod alert;
pub mod assemble;
pub mod dispatcher;
pub mod email;
pub mod render;
pub mod slack;
pub mod traits;

pub use alert::{send_alert, send_alert_with_config, AlertError};
pub use dispatcher::{Dispatcher, SendReport};
pub use traits::{DispatchResult, Notifier, NotifyError};
