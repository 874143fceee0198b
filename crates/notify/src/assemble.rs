//! Turns a whole [`AlertMessage`] into one payload per destination family.
//!
//! Email gets a single HTML document rendered through a minijinja template
//! (plus a Markdown alternative). Slack gets the subject as a header block
//! followed by every component's blocks, split into batches that fit the
//! per-message block limit.

use minijinja::{context, AutoEscape, Environment};

use alert_core::AlertMessage;

use crate::render::slack::Block;
use crate::render::{html, markdown, slack};
use crate::traits::NotifyError;

/// Maximum number of blocks Slack accepts in one message.
pub const SLACK_BLOCK_LIMIT: usize = 50;

const EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ subject }}</title>
<style>{{ base_css | safe }}</style>
{%- if table_css %}
<style>{{ table_css | safe }}</style>
{%- endif %}
</head>
<body>
{%- if subject %}
<h1>{{ subject }}</h1>
{%- endif %}
{%- for fragment in fragments %}
<div>{{ fragment | safe }}</div>
<br>
{%- endfor %}
</body>
</html>
"#;

const BASE_CSS: &str = "body {text-align:center;}";

const TABLE_CSS: &str = "table {border-collapse:collapse;margin:0 auto;} \
th, td {border:1px solid #999;padding:4px 8px;} \
th {background-color:#f2f2f2;} \
tr:nth-child(even) {background-color:#fafafa;}";

fn build_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env
}

/// Render the full HTML email body.
///
/// # Errors
///
/// Returns [`NotifyError::Render`] if the document template fails to render.
pub fn html_document(message: &AlertMessage) -> Result<String, NotifyError> {
    let fragments: Vec<String> = message.components().iter().map(html::render).collect();
    let table_css = if message.has_table() { TABLE_CSS } else { "" };

    build_env()
        .render_str(
            EMAIL_TEMPLATE,
            context! {
                subject => message.subject(),
                base_css => BASE_CSS,
                table_css => table_css,
                fragments => fragments,
            },
        )
        .map_err(|e| NotifyError::Render(e.to_string()))
}

/// Render the plain-text alternative of the email body.
pub fn markdown_document(message: &AlertMessage) -> String {
    let body = markdown::document(message.components(), markdown::Flavor::Classic);
    if message.subject().is_empty() {
        body
    } else {
        format!("# {}\n\n{body}", message.subject())
    }
}

/// All blocks of a message in order: subject header first.
pub fn slack_blocks(message: &AlertMessage) -> Vec<Block> {
    let mut blocks = Vec::new();
    if !message.subject().trim().is_empty() {
        blocks.push(Block::header(message.subject()));
    }
    blocks.extend(message.components().iter().flat_map(slack::render));
    blocks
}

/// Split blocks into consecutive batches of at most `limit` blocks.
pub fn split_blocks(blocks: Vec<Block>, limit: usize) -> Vec<Vec<Block>> {
    let limit = limit.max(1);
    let mut batches = Vec::with_capacity(blocks.len().div_ceil(limit));
    let mut iter = blocks.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(limit).collect());
    }
    batches
}

/// The message as Slack posts, each within `limit` blocks.
pub fn slack_batches(message: &AlertMessage, limit: usize) -> Vec<Vec<Block>> {
    split_blocks(slack_blocks(message), limit)
}

/// Notification text shown where blocks cannot be (push notifications, previews).
pub fn slack_fallback_text(message: &AlertMessage) -> String {
    if message.subject().trim().is_empty() {
        markdown::document(message.components(), markdown::Flavor::Slack)
            .chars()
            .take(3000)
            .collect()
    } else {
        markdown::escape_mrkdwn(message.subject())
    }
}
