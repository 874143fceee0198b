//! Markdown fragments, in classic and Slack `mrkdwn` flavors.
//!
//! Classic Markdown is the plain-text alternative of alert emails; the Slack
//! flavor feeds the text of Slack blocks.

use alert_core::{Component, ContentType, FontSize, Map, Table, Text};

use super::slack::SECTION_MAX_CHARS;

/// Slack renders at most this many table rows legibly in one code block.
pub const SLACK_TABLE_CHUNK_ROWS: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Classic,
    Slack,
}

/// Escape the three characters Slack treats as control sequences.
pub fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap text in a fenced code block.
pub fn as_code_block(text: &str) -> String {
    format!("```\n{text}\n```")
}

/// Render one component as Markdown.
pub fn render(component: &Component, flavor: Flavor) -> String {
    match (component, flavor) {
        (Component::Text(t), Flavor::Classic) => classic_text(t),
        (Component::Text(t), Flavor::Slack) => slack_text(t),
        (Component::Map(m), Flavor::Classic) => classic_map(m),
        (Component::Map(m), Flavor::Slack) => slack_map(m),
        (Component::Table(t), Flavor::Classic) => classic_table(t),
        (Component::Table(t), Flavor::Slack) => {
            let mut parts = Vec::new();
            if let Some(title) = t.title() {
                parts.push(format!("*{}*", escape_mrkdwn(title)));
            }
            parts.extend(slack_table_chunks(t));
            parts.join("\n\n")
        }
        (Component::File(f), Flavor::Classic) => format!("**Attachment:** {}", f.name()),
        (Component::File(f), Flavor::Slack) => format!("*Attachment:* {}", escape_mrkdwn(f.name())),
        (Component::LineBreak(lb), _) => "\n".repeat(lb.count()),
    }
}

/// Render a sequence of components, separated by blank lines.
pub fn document(components: &[Component], flavor: Flavor) -> String {
    components
        .iter()
        .map(|c| render(c, flavor))
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

fn classic_text(t: &Text) -> String {
    match t.font_size() {
        FontSize::Small => t.content().to_string(),
        FontSize::Medium => format!("## {}", t.content()),
        FontSize::Large => format!("# {}", t.content()),
    }
}

/// Slack emphasis for a text category.
pub fn slack_text(t: &Text) -> String {
    let content = escape_mrkdwn(t.content());
    if content.trim().is_empty() {
        return content;
    }
    match t.content_type() {
        ContentType::Important | ContentType::Error => format!("*{content}*"),
        ContentType::Warning => format!("_{content}_"),
        ContentType::Info => content,
    }
}

fn separator(m: &Map) -> &'static str {
    if m.is_inline() {
        "\t"
    } else {
        "\n"
    }
}

fn classic_map(m: &Map) -> String {
    let mut rows = vec!["|||".to_string(), "|---:|:---|".to_string()];
    rows.extend(m.entries().map(|(k, v)| format!("|**{k}:**|{v}|")));
    rows.push("|||".to_string());
    rows.join(separator(m))
}

fn slack_map(m: &Map) -> String {
    m.entries()
        .map(|(k, v)| format!("*{}:* {}", escape_mrkdwn(k), escape_mrkdwn(v)))
        .collect::<Vec<_>>()
        .join(separator(m))
}

fn classic_table(t: &Table) -> String {
    let mut parts = Vec::new();
    if let Some(title) = t.title() {
        parts.push(format!("# {title}"));
    }
    let mut lines = vec![
        t.header().join("|"),
        vec![":----:"; t.header().len()].join("|"),
    ];
    lines.extend(t.cells().map(|cells| cells.join("|")));
    parts.push(lines.join("\n"));
    parts.join("\n\n")
}

/// The table rows as fixed-width grids in code blocks of at most
/// [`SLACK_TABLE_CHUNK_ROWS`] rows, each repeating the header.
///
/// A chunk takes fewer rows when the full count would not fit in one Slack
/// section. A single row that still does not fit is split across several
/// code blocks.
pub fn slack_table_chunks(t: &Table) -> Vec<String> {
    let rows: Vec<Vec<&str>> = t.cells().collect();
    let header: Vec<&str> = t.header().iter().map(String::as_str).collect();
    let chunk = |rows: &[Vec<&str>]| as_code_block(&escape_mrkdwn(&text_grid(&header, rows)));

    let mut out = Vec::new();
    let mut start = 0;
    while start < rows.len() {
        let mut take = SLACK_TABLE_CHUNK_ROWS.min(rows.len() - start);
        let mut block = chunk(&rows[start..start + take]);
        while take > 1 && block.chars().count() > SECTION_MAX_CHARS {
            take -= 1;
            block = chunk(&rows[start..start + take]);
        }
        if block.chars().count() > SECTION_MAX_CHARS {
            let grid = escape_mrkdwn(&text_grid(&header, &rows[start..start + take]));
            let fence = as_code_block("").chars().count();
            out.extend(
                split_text(&grid, SECTION_MAX_CHARS - fence)
                    .iter()
                    .map(|piece| as_code_block(piece)),
            );
        } else {
            out.push(block);
        }
        start += take;
    }
    out
}

/// Split text into pieces of at most `max` characters, breaking between
/// lines where possible. Blank pieces are dropped.
pub fn split_text(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if line_len > max {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
            let chars: Vec<char> = line.chars().collect();
            pieces.extend(chars.chunks(max).map(|c| c.iter().collect::<String>()));
            continue;
        }
        if current_len > 0 && current_len + 1 + line_len > max {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }
    pieces.push(current);

    pieces.retain(|p| !p.trim().is_empty());
    pieces
}

/// Lay out rows as a plain-text grid with padded columns.
pub fn text_grid(header: &[&str], rows: &[Vec<&str>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(header)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.extend(rows.iter().map(|r| line(r.as_slice())));
    out.join("\n")
}
