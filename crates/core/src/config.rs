use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::destination::{
    Destination, EmailDestination, Secret, SlackDestination, SmtpSecurity, DEFAULT_SLACK_API_BASE,
    DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT,
};
use crate::error::ConfigError;

/// Prefix shared by every environment key this crate reads.
pub const ENV_PREFIX: &str = "ALERT_MSGS_";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn key(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Alert methods ─────────────────────────────────────────────

/// Kind of destination an alert can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMethod {
    Email,
    Slack,
}

impl AlertMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertMethod::Email => "email",
            AlertMethod::Slack => "slack",
        }
    }
}

impl fmt::Display for AlertMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(AlertMethod::Email),
            "slack" => Ok(AlertMethod::Slack),
            other => Err(ConfigError::UnknownMethod(other.to_string())),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

/// Default alert destinations, read once at the call boundary.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Methods to use when no explicit destinations are given.
    /// Empty means every configured method.
    pub methods: Vec<AlertMethod>,
    pub email: EmailSettings,
    pub slack: SlackSettings,
}

impl AlertConfig {
    /// Build config from `ALERT_MSGS_*` environment variables
    /// (call `load_dotenv()` first to pick up a .env file).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_opt)
    }

    /// Build config from an arbitrary key lookup. Keys are the full
    /// environment names, e.g. `ALERT_MSGS_SLACK_CHANNEL`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&key(name)).filter(|s| !s.is_empty());

        let methods = match get("ALERT_METHODS") {
            Some(raw) => split_list(&raw)
                .iter()
                .map(|m| m.parse())
                .collect::<Result<Vec<AlertMethod>, _>>()?,
            None => Vec::new(),
        };

        let smtp_port = match get("EMAIL_SMTP_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: key("EMAIL_SMTP_PORT"),
                value: raw.clone(),
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let security = match get("EMAIL_SECURITY") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: key("EMAIL_SECURITY"),
                value: raw.clone(),
            })?,
            None => SmtpSecurity::default(),
        };

        let email = EmailSettings {
            addr: get("EMAIL_ADDR"),
            password: get("EMAIL_PASSWORD").map(Secret::from),
            receiver_addrs: get("EMAIL_RECEIVER_ADDR")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            smtp_host: get("EMAIL_SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port,
            security,
        };

        let slack = SlackSettings {
            bot_token: get("SLACK_BOT_TOKEN").map(Secret::from),
            channel: get("SLACK_CHANNEL"),
            api_base: get("SLACK_API_URL").unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
        };

        Ok(Self {
            methods,
            email,
            slack,
        })
    }

    /// Resolve the default destinations.
    ///
    /// With explicit methods, each one must be fully configured. Without,
    /// every configured method is used (Slack first, then email).
    pub fn destinations(&self) -> Result<Vec<Destination>, ConfigError> {
        if self.methods.is_empty() {
            let mut out: Vec<Destination> = Vec::new();
            if self.slack.is_configured() {
                out.push(self.slack.to_destination()?.into());
            }
            if self.email.is_configured() {
                out.push(self.email.to_destination()?.into());
            }
            return Ok(out);
        }

        self.methods
            .iter()
            .map(|method| match method {
                AlertMethod::Email => self.email.to_destination().map(Destination::from),
                AlertMethod::Slack => self.slack.to_destination().map(Destination::from),
            })
            .collect()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        let methods: Vec<&str> = self.methods.iter().map(|m| m.as_str()).collect();
        let methods = if methods.is_empty() {
            "(auto)".to_string()
        } else {
            methods.join(",")
        };
        let token = if self.slack.bot_token.is_some() {
            "set"
        } else {
            "unset"
        };
        tracing::info!("Alert config loaded:");
        tracing::info!("  methods: {}", methods);
        tracing::info!(
            "  email:   sender={}, relay={}:{}, recipients={}",
            self.email.addr.as_deref().unwrap_or("(none)"),
            self.email.smtp_host,
            self.email.smtp_port,
            self.email.receiver_addrs.len()
        );
        tracing::info!(
            "  slack:   channel={}, token={}",
            self.slack.channel.as_deref().unwrap_or("(none)"),
            token
        );
    }

    /// Return a redacted view safe to print or serialize (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "methods": self.methods,
            "email": {
                "sender": self.email.addr,
                "recipients": self.email.receiver_addrs,
                "smtp_host": self.email.smtp_host,
                "smtp_port": self.email.smtp_port,
                "security": self.email.security,
                "configured": self.email.is_configured(),
            },
            "slack": {
                "channel": self.slack.channel,
                "api_base": self.slack.api_base,
                "configured": self.slack.is_configured(),
            },
        })
    }
}

// ── Email ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub addr: Option<String>,
    pub password: Option<Secret>,
    /// Defaults to the sender address when empty.
    pub receiver_addrs: Vec<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub security: SmtpSecurity,
}

impl EmailSettings {
    pub fn is_configured(&self) -> bool {
        self.addr.is_some()
    }

    pub fn to_destination(&self) -> Result<EmailDestination, ConfigError> {
        let sender = self
            .addr
            .clone()
            .ok_or_else(|| ConfigError::Missing(key("EMAIL_ADDR")))?;
        let recipients = if self.receiver_addrs.is_empty() {
            vec![sender.clone()]
        } else {
            self.receiver_addrs.clone()
        };
        Ok(EmailDestination::new(sender, self.password.clone(), recipients).with_relay(
            self.smtp_host.clone(),
            self.smtp_port,
            self.security,
        ))
    }
}

// ── Slack ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SlackSettings {
    pub bot_token: Option<Secret>,
    pub channel: Option<String>,
    pub api_base: String,
}

impl SlackSettings {
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.channel.is_some()
    }

    pub fn to_destination(&self) -> Result<SlackDestination, ConfigError> {
        let token = self
            .bot_token
            .clone()
            .ok_or_else(|| ConfigError::Missing(key("SLACK_BOT_TOKEN")))?;
        let channel = self
            .channel
            .clone()
            .ok_or_else(|| ConfigError::Missing(key("SLACK_CHANNEL")))?;
        Ok(SlackDestination::new(token, channel).with_api_base(self.api_base.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<AlertConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AlertConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn empty_environment_has_no_destinations() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.methods.is_empty());
        assert!(cfg.destinations().unwrap().is_empty());
        assert_eq!(cfg.email.smtp_host, DEFAULT_SMTP_HOST);
        assert_eq!(cfg.email.smtp_port, DEFAULT_SMTP_PORT);
    }

    #[test]
    fn auto_methods_use_everything_configured() {
        let cfg = config(&[
            ("ALERT_MSGS_EMAIL_ADDR", "alerts@example.com"),
            ("ALERT_MSGS_EMAIL_PASSWORD", "hunter2"),
            ("ALERT_MSGS_SLACK_BOT_TOKEN", "xoxb-1"),
            ("ALERT_MSGS_SLACK_CHANNEL", "C123"),
        ])
        .unwrap();
        let dests = cfg.destinations().unwrap();
        let methods: Vec<_> = dests.iter().map(Destination::method).collect();
        assert_eq!(methods, vec![AlertMethod::Slack, AlertMethod::Email]);

        match &dests[1] {
            Destination::Email(email) => {
                assert_eq!(email.recipients, vec!["alerts@example.com"]);
                assert_eq!(email.password.as_ref().map(Secret::expose), Some("hunter2"));
            }
            other => panic!("expected email, got {other:?}"),
        }
    }

    #[test]
    fn explicit_methods_follow_listed_order() {
        let cfg = config(&[
            ("ALERT_MSGS_ALERT_METHODS", "email, slack"),
            ("ALERT_MSGS_EMAIL_ADDR", "alerts@example.com"),
            ("ALERT_MSGS_EMAIL_RECEIVER_ADDR", "a@example.com,b@example.com"),
            ("ALERT_MSGS_EMAIL_SMTP_PORT", "587"),
            ("ALERT_MSGS_EMAIL_SECURITY", "starttls"),
            ("ALERT_MSGS_SLACK_BOT_TOKEN", "xoxb-1"),
            ("ALERT_MSGS_SLACK_CHANNEL", "C123"),
            ("ALERT_MSGS_SLACK_API_URL", "http://127.0.0.1:9/api"),
        ])
        .unwrap();
        let dests = cfg.destinations().unwrap();
        match (&dests[0], &dests[1]) {
            (Destination::Email(email), Destination::Slack(slack)) => {
                assert_eq!(email.recipients, vec!["a@example.com", "b@example.com"]);
                assert_eq!(email.smtp_port, 587);
                assert_eq!(email.security, SmtpSecurity::StartTls);
                assert_eq!(slack.channel, "C123");
                assert_eq!(slack.api_base, "http://127.0.0.1:9/api");
            }
            other => panic!("unexpected destinations: {other:?}"),
        }
    }

    #[test]
    fn explicit_method_missing_settings_is_error() {
        let cfg = config(&[
            ("ALERT_MSGS_ALERT_METHODS", "slack"),
            ("ALERT_MSGS_SLACK_BOT_TOKEN", "xoxb-1"),
        ])
        .unwrap();
        let err = cfg.destinations().unwrap_err().to_string();
        assert!(err.contains("ALERT_MSGS_SLACK_CHANNEL"), "got: {err}");
    }

    #[test]
    fn unknown_method_rejected() {
        let err = config(&[("ALERT_MSGS_ALERT_METHODS", "pager")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMethod(m) if m == "pager"));
    }

    #[test]
    fn invalid_port_rejected() {
        let err = config(&[("ALERT_MSGS_EMAIL_SMTP_PORT", "lots")]).unwrap_err();
        assert!(err.to_string().contains("ALERT_MSGS_EMAIL_SMTP_PORT"));
    }

    #[test]
    fn redacted_summary_hides_secrets() {
        let cfg = config(&[
            ("ALERT_MSGS_EMAIL_ADDR", "alerts@example.com"),
            ("ALERT_MSGS_EMAIL_PASSWORD", "hunter2"),
            ("ALERT_MSGS_SLACK_BOT_TOKEN", "xoxb-secret"),
            ("ALERT_MSGS_SLACK_CHANNEL", "C123"),
        ])
        .unwrap();
        let summary = cfg.redacted_summary().to_string();
        assert!(!summary.contains("hunter2"));
        assert!(!summary.contains("xoxb-secret"));
        assert!(summary.contains("alerts@example.com"));
        assert_eq!(cfg.redacted_summary()["slack"]["configured"], true);
    }

    #[test]
    fn log_summary_handles_unconfigured() {
        config(&[]).unwrap().log_summary();
        config(&[("ALERT_MSGS_ALERT_METHODS", "slack,email")])
            .unwrap()
            .log_summary();
    }
}
