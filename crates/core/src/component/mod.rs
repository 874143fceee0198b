//! Renderable units of alert content.
//!
//! [`Component`] is a closed set: every renderer matches it exhaustively, so a
//! new kind of content has to be handled everywhere before it compiles.

mod file;
mod map;
mod table;
mod text;

pub use file::File;
pub use map::Map;
pub use table::{Row, Table};
pub use text::{ContentType, FontSize, Text};

use crate::error::ValidationError;

/// One unit of alert content.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Text(Text),
    Map(Map),
    Table(Table),
    File(File),
    LineBreak(LineBreak),
}

impl Component {
    /// Short name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Text(_) => "text",
            Component::Map(_) => "map",
            Component::Table(_) => "table",
            Component::File(_) => "file",
            Component::LineBreak(_) => "line_break",
        }
    }
}

/// Vertical whitespace between components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    count: usize,
}

impl LineBreak {
    pub fn new(count: usize) -> Result<Self, ValidationError> {
        if count == 0 {
            return Err(ValidationError::ZeroLineBreak);
        }
        Ok(Self { count })
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Default for LineBreak {
    fn default() -> Self {
        Self { count: 1 }
    }
}

impl From<Text> for Component {
    fn from(value: Text) -> Self {
        Component::Text(value)
    }
}

impl From<Map> for Component {
    fn from(value: Map) -> Self {
        Component::Map(value)
    }
}

impl From<Table> for Component {
    fn from(value: Table) -> Self {
        Component::Table(value)
    }
}

impl From<File> for Component {
    fn from(value: File) -> Self {
        Component::File(value)
    }
}

impl From<LineBreak> for Component {
    fn from(value: LineBreak) -> Self {
        Component::LineBreak(value)
    }
}

impl From<&str> for Component {
    fn from(value: &str) -> Self {
        Component::Text(Text::new(value))
    }
}

impl From<String> for Component {
    fn from(value: String) -> Self {
        Component::Text(Text::new(value))
    }
}

/// A subject plus the ordered components that make up one alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    subject: String,
    components: Vec<Component>,
}

impl AlertMessage {
    /// Build a message, rejecting an empty component list.
    pub fn new<I, C>(subject: impl Into<String>, components: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Component>,
    {
        let components: Vec<Component> = components.into_iter().map(Into::into).collect();
        if components.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(Self {
            subject: subject.into(),
            components,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// File components, in message order.
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.components.iter().filter_map(|c| match c {
            Component::File(f) => Some(f),
            _ => None,
        })
    }

    pub fn has_table(&self) -> bool {
        self.components
            .iter()
            .any(|c| matches!(c, Component::Table(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_become_default_text() {
        let component: Component = "disk almost full".into();
        match component {
            Component::Text(text) => {
                assert_eq!(text.content(), "disk almost full");
                assert_eq!(text.content_type(), ContentType::Info);
                assert_eq!(text.font_size(), FontSize::Medium);
            }
            other => panic!("expected text, got {}", other.kind()),
        }
    }

    #[test]
    fn message_preserves_component_order() {
        let msg = AlertMessage::new(
            "subject",
            vec![
                Component::from("first"),
                Map::new([("k", "v")]).unwrap().into(),
                LineBreak::default().into(),
            ],
        )
        .unwrap();
        let kinds: Vec<_> = msg.components().iter().map(Component::kind).collect();
        assert_eq!(kinds, vec!["text", "map", "line_break"]);
    }

    #[test]
    fn empty_message_rejected() {
        let result = AlertMessage::new("subject", Vec::<Component>::new());
        assert!(matches!(result, Err(ValidationError::EmptyMessage)));
    }

    #[test]
    fn files_and_tables_detected() {
        let file = File::from_bytes("log.txt", b"boom".to_vec()).unwrap();
        let table = Table::new(vec![vec![("a", "1")]]).unwrap();
        let msg = AlertMessage::new(
            "s",
            vec![Component::from(file), Component::from(table)],
        )
        .unwrap();
        assert!(msg.has_table());
        assert_eq!(msg.files().map(File::name).collect::<Vec<_>>(), vec!["log.txt"]);
    }

    #[test]
    fn zero_line_break_rejected() {
        assert!(matches!(LineBreak::new(0), Err(ValidationError::ZeroLineBreak)));
        assert_eq!(LineBreak::new(3).unwrap().count(), 3);
    }
}
