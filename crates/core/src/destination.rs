//! Where an alert is delivered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AlertMethod;
use crate::error::ConfigError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// A credential that never shows up in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for handing to a transport.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS (usually port 465).
    #[default]
    Tls,
    /// Plaintext connection upgraded with STARTTLS (usually port 587).
    StartTls,
    /// No encryption. Only for local relays.
    None,
}

impl FromStr for SmtpSecurity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tls" | "ssl" => Ok(SmtpSecurity::Tls),
            "starttls" => Ok(SmtpSecurity::StartTls),
            "none" | "plain" => Ok(SmtpSecurity::None),
            other => Err(ConfigError::Invalid {
                key: "smtp security".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// SMTP sender credentials and the recipients of one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDestination {
    pub sender: String,
    pub password: Option<Secret>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub security: SmtpSecurity,
    pub recipients: Vec<String>,
}

impl EmailDestination {
    /// Email destination on the default relay. Duplicate recipients are
    /// dropped, keeping first occurrence order.
    pub fn new<I, S>(sender: impl Into<String>, password: Option<Secret>, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for r in recipients {
            let r = r.into();
            if !unique.contains(&r) {
                unique.push(r);
            }
        }
        Self {
            sender: sender.into(),
            password,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            security: SmtpSecurity::default(),
            recipients: unique,
        }
    }

    pub fn with_relay(
        mut self,
        host: impl Into<String>,
        port: u16,
        security: SmtpSecurity,
    ) -> Self {
        self.smtp_host = host.into();
        self.smtp_port = port;
        self.security = security;
        self
    }
}

/// Slack bot credentials and the channel to post into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackDestination {
    pub bot_token: Secret,
    pub channel: String,
    pub api_base: String,
}

impl SlackDestination {
    pub fn new(bot_token: impl Into<Secret>, channel: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            channel: channel.into(),
            api_base: DEFAULT_SLACK_API_BASE.to_string(),
        }
    }

    /// Point the destination at another Web API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

/// A configured target for an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Email(EmailDestination),
    Slack(SlackDestination),
}

impl Destination {
    pub fn method(&self) -> AlertMethod {
        match self {
            Destination::Email(_) => AlertMethod::Email,
            Destination::Slack(_) => AlertMethod::Slack,
        }
    }
}

impl From<EmailDestination> for Destination {
    fn from(value: EmailDestination) -> Self {
        Destination::Email(value)
    }
}

impl From<SlackDestination> for Destination {
    fn from(value: SlackDestination) -> Self {
        Destination::Slack(value)
    }
}
