//! HTML fragments for email bodies.

use alert_core::{Component, ContentType, File, FontSize, Map, Table, Text};

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one component as an HTML fragment.
pub fn render(component: &Component) -> String {
    match component {
        Component::Text(t) => text(t),
        Component::Map(m) => map(m),
        Component::Table(t) => table(t),
        Component::File(f) => file(f),
        Component::LineBreak(lb) => format!("<div>{}</div>", "<br>".repeat(lb.count())),
    }
}

fn text(t: &Text) -> String {
    let tag = t.content_type().html_tag();
    format!(
        "<{tag} style=\"font-size:{};color:{};\">{}</{tag}>",
        t.font_size().css(),
        t.content_type().css_color(),
        escape_html(t.content()),
    )
}

fn key_value(key: &str, value: &str, inline: bool) -> String {
    let wrapper = if inline {
        "<span style=\"display:inline-block;margin-right:1em;\">"
    } else {
        "<div>"
    };
    let close = if inline { "</span>" } else { "</div>" };
    let key = text(&Text::styled(
        format!("{key}: "),
        ContentType::Important,
        FontSize::Large,
    ));
    let value = text(&Text::new(value).with_font_size(FontSize::Large));
    format!("{wrapper}<span><b>{key}</b>{value}</span>{close}")
}

fn map(m: &Map) -> String {
    let mut out = String::from("<div>");
    for (k, v) in m.entries() {
        out.push_str(&key_value(k, v, m.is_inline()));
    }
    out.push_str("</div>");
    out
}

fn table(t: &Table) -> String {
    let mut out = String::from("<div style=\"border:1px solid black;\">");
    if let Some(title) = t.title() {
        out.push_str(&text(&Text::styled(
            title,
            ContentType::Important,
            FontSize::Large,
        )));
    }
    out.push_str("<div><table><tr>");
    for column in t.header() {
        out.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    out.push_str("</tr>");
    for cells in t.cells() {
        out.push_str("<tr>");
        for cell in cells {
            out.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table></div></div>");
    out
}

fn file(f: &File) -> String {
    format!("<div>{}</div>", key_value("Attachment", f.name(), false))
}
