use serde::{Deserialize, Serialize};

/// Relative font size of a [`Text`] component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// CSS `font-size` value.
    pub fn css(self) -> &'static str {
        match self {
            FontSize::Small => "16px",
            FontSize::Medium => "18px",
            FontSize::Large => "20px",
        }
    }
}

/// Semantic category of a [`Text`] component; drives color and emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Info,
    Warning,
    Error,
    Important,
}

impl ContentType {
    /// CSS `color` value.
    pub fn css_color(self) -> &'static str {
        match self {
            ContentType::Info => "black",
            ContentType::Warning => "#ffca28",
            ContentType::Error => "#C34A2C",
            ContentType::Important => "#1967d3",
        }
    }

    /// HTML element used to carry text of this category.
    pub fn html_tag(self) -> &'static str {
        match self {
            ContentType::Info => "div",
            ContentType::Warning => "p",
            ContentType::Error => "h2",
            ContentType::Important => "h1",
        }
    }
}

/// Formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    content: String,
    content_type: ContentType,
    font_size: FontSize,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: ContentType::default(),
            font_size: FontSize::default(),
        }
    }

    pub fn styled(
        content: impl Into<String>,
        content_type: ContentType,
        font_size: FontSize,
    ) -> Self {
        Self {
            content: content.into(),
            content_type,
            font_size,
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_font_size(mut self, font_size: FontSize) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }
}
