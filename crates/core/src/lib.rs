//! Component model, destinations, and configuration for alert messages.
//!
//! Everything here is plain data: components are validated at construction
//! and never mutated afterwards, destinations describe where an alert goes,
//! and [`AlertConfig`] is the environment-derived default for both.

pub mod component;
pub mod config;
pub mod destination;
pub mod emoji;
pub mod error;

pub use component::*;
pub use config::{load_dotenv, AlertConfig, AlertMethod};
pub use destination::*;
pub use error::*;
