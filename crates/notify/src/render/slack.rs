//! Slack Block Kit fragments.

use serde::Serialize;

use alert_core::{Component, FontSize, Text};

use super::markdown::{self, Flavor};

/// Slack rejects header text longer than this.
pub const HEADER_MAX_CHARS: usize = 150;

/// Slack rejects section and context text longer than this.
pub const SECTION_MAX_CHARS: usize = 3000;

/// Text object kinds accepted by Block Kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    PlainText,
    Mrkdwn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextKind,
    pub text: String,
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::PlainText,
            text: text.into(),
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Mrkdwn,
            text: text.into(),
        }
    }
}

/// The subset of Block Kit layout blocks alerts are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
    Context { elements: Vec<TextObject> },
    Divider,
}

impl Block {
    /// Header block; text beyond [`HEADER_MAX_CHARS`] is cut off.
    pub fn header(text: &str) -> Self {
        let text: String = text.chars().take(HEADER_MAX_CHARS).collect();
        Block::Header {
            text: TextObject::plain(text),
        }
    }

    pub fn section(mrkdwn: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(mrkdwn),
        }
    }

    pub fn context(mrkdwn: impl Into<String>) -> Self {
        Block::Context {
            elements: vec![TextObject::mrkdwn(mrkdwn)],
        }
    }
}

/// Consecutive sections holding `mrkdwn`, none over [`SECTION_MAX_CHARS`].
/// Blank text yields no blocks.
pub fn sections(mrkdwn: &str) -> Vec<Block> {
    markdown::split_text(mrkdwn, SECTION_MAX_CHARS)
        .into_iter()
        .map(Block::section)
        .collect()
}

/// Render one component as Slack blocks.
///
/// Large text becomes a header, small text a context line, everything else
/// a mrkdwn section. File components only yield a reference here; the bytes
/// are uploaded separately by the Slack notifier.
pub fn render(component: &Component) -> Vec<Block> {
    match component {
        Component::Text(t) => text(t),
        Component::Map(_) | Component::File(_) => {
            sections(&markdown::render(component, Flavor::Slack))
        }
        Component::Table(t) => {
            let mut blocks = Vec::new();
            if let Some(title) = t.title() {
                blocks.extend(sections(&format!("*{}*", markdown::escape_mrkdwn(title))));
            }
            blocks.extend(markdown::slack_table_chunks(t).into_iter().map(Block::section));
            blocks
        }
        Component::LineBreak(lb) => vec![Block::Divider; lb.count()],
    }
}

fn text(t: &Text) -> Vec<Block> {
    if t.content().trim().is_empty() {
        return Vec::new();
    }
    match t.font_size() {
        FontSize::Large => vec![Block::header(t.content())],
        FontSize::Medium => sections(&markdown::slack_text(t)),
        FontSize::Small => markdown::split_text(&markdown::slack_text(t), SECTION_MAX_CHARS)
            .into_iter()
            .map(Block::context)
            .collect(),
    }
}
