//! Slack Web API notifier posting Block Kit messages.
//!
//! File components are uploaded first through the external upload flow
//! (`files.getUploadURLExternal`, raw byte POST, `files.completeUploadExternal`),
//! then the message blocks are posted with `chat.postMessage`, one post per
//! batch of at most [`SLACK_BLOCK_LIMIT`] blocks.

use alert_core::{AlertMessage, File, Secret, SlackDestination};
use serde_json::{json, Value};

use crate::assemble::{self, SLACK_BLOCK_LIMIT};
use crate::render::slack::Block;
use crate::traits::{Notifier, NotifyError};

/// Error codes Slack returns for a bad or revoked token.
const AUTH_ERRORS: &[&str] = &[
    "not_authed",
    "invalid_auth",
    "account_inactive",
    "token_revoked",
    "token_expired",
    "no_permission",
    "missing_scope",
];

/// Error codes Slack returns when the channel cannot be posted to.
const CHANNEL_ERRORS: &[&str] = &[
    "channel_not_found",
    "not_in_channel",
    "is_archived",
    "invalid_channel",
];

/// Sends alerts to one Slack channel through the Web API.
#[derive(Debug)]
pub struct SlackNotifier {
    bot_token: Secret,
    channel: String,
    api_base: String,
    block_limit: usize,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Build a `SlackNotifier` for one Slack destination.
    ///
    /// Returns [`NotifyError::Config`] if the token or channel is empty.
    pub fn from_destination(dest: &SlackDestination) -> Result<Self, NotifyError> {
        if dest.bot_token.expose().trim().is_empty() {
            return Err(NotifyError::Config(
                "Slack bot token must not be empty".to_string(),
            ));
        }
        if dest.channel.trim().is_empty() {
            return Err(NotifyError::Config(
                "Slack channel must not be empty".to_string(),
            ));
        }

        Ok(Self {
            bot_token: dest.bot_token.clone(),
            channel: dest.channel.clone(),
            api_base: dest.api_base.trim_end_matches('/').to_string(),
            block_limit: SLACK_BLOCK_LIMIT,
            client: reqwest::Client::new(),
        })
    }

    /// Override the per-message block limit.
    pub fn with_block_limit(mut self, limit: usize) -> Self {
        self.block_limit = limit.max(1);
        self
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    /// Call a Web API method with a JSON body.
    async fn call_json(&self, method: &str, body: &Value) -> Result<Value, NotifyError> {
        tracing::debug!(method, channel = %self.channel, "calling Slack API");
        let response = self
            .client
            .post(self.url(method))
            .bearer_auth(self.bot_token.expose())
            .json(body)
            .send()
            .await?;
        self.check(method, response).await
    }

    /// Call a Web API method with form-encoded arguments.
    async fn call_form(&self, method: &str, form: &[(&str, String)]) -> Result<Value, NotifyError> {
        tracing::debug!(method, channel = %self.channel, "calling Slack API");
        let response = self
            .client
            .post(self.url(method))
            .bearer_auth(self.bot_token.expose())
            .form(form)
            .send()
            .await?;
        self.check(method, response).await
    }

    /// Map an API response onto the error taxonomy.
    async fn check(&self, method: &str, response: reqwest::Response) -> Result<Value, NotifyError> {
        let status = response.status();

        // Rate limiting (HTTP 429).
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(30);
            return Err(NotifyError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(method, %status, body = %body_text, "Slack API returned non-2xx status");
            return Err(NotifyError::Api(format!("{method} returned {status}: {body_text}")));
        }

        let body: Value = response.json().await?;
        if body.get("ok") == Some(&Value::Bool(true)) {
            return Ok(body);
        }

        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error")
            .to_string();
        Err(self.classify(code))
    }

    fn classify(&self, code: String) -> NotifyError {
        if AUTH_ERRORS.contains(&code.as_str()) {
            NotifyError::Auth(code)
        } else if CHANNEL_ERRORS.contains(&code.as_str()) {
            NotifyError::InvalidChannel {
                channel: self.channel.clone(),
                reason: code,
            }
        } else if code == "ratelimited" || code == "rate_limited" {
            NotifyError::RateLimited { retry_after_secs: 30 }
        } else {
            NotifyError::Api(code)
        }
    }

    /// Upload one file and share it into the channel.
    async fn upload_file(&self, file: &File) -> Result<(), NotifyError> {
        let ticket = self
            .call_form(
                "files.getUploadURLExternal",
                &[
                    ("filename", file.name().to_string()),
                    ("length", file.bytes().len().to_string()),
                ],
            )
            .await?;

        let upload_url = ticket
            .get("upload_url")
            .and_then(Value::as_str)
            .ok_or_else(|| NotifyError::Api("upload ticket missing upload_url".to_string()))?;
        let file_id = ticket
            .get("file_id")
            .and_then(Value::as_str)
            .ok_or_else(|| NotifyError::Api("upload ticket missing file_id".to_string()))?;

        let response = self
            .client
            .post(upload_url)
            .header(reqwest::header::CONTENT_TYPE, file.mime_type())
            .body(file.bytes().to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifyError::Api(format!(
                "file upload returned {}",
                response.status()
            )));
        }

        self.call_json(
            "files.completeUploadExternal",
            &json!({
                "files": [{ "id": file_id, "title": file.name() }],
                "channel_id": self.channel,
            }),
        )
        .await?;

        tracing::debug!(channel = %self.channel, file = %file.name(), "file uploaded");
        Ok(())
    }

    async fn post_blocks(&self, text: &str, blocks: &[Block]) -> Result<(), NotifyError> {
        self.call_json(
            "chat.postMessage",
            &json!({
                "channel": self.channel,
                "text": text,
                "blocks": blocks,
            }),
        )
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    /// Upload attached files, then post the message blocks in order.
    async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError> {
        let mut uploaded = 0;
        for file in message.files() {
            self.upload_file(file).await?;
            uploaded += 1;
        }

        let text = assemble::slack_fallback_text(message);
        let batches = assemble::slack_batches(message, self.block_limit);
        for blocks in &batches {
            self.post_blocks(&text, blocks).await?;
        }

        tracing::info!(
            channel = "slack",
            slack_channel = %self.channel,
            posts = batches.len(),
            files = uploaded,
            "alert delivered"
        );

        Ok(())
    }

    /// Returns `"slack"`.
    fn channel_name(&self) -> &str {
        "slack"
    }

    fn target(&self) -> String {
        self.channel.clone()
    }
}
