//! Markdown table renderer.
//!
//! Output is a pure function of the document: the same input always produces
//! byte-identical Markdown. Interpolated text goes through [`escape_markdown`]
//! so it is safe inside table cells and MDX pages.

use crate::document::{Document, DocumentV1, VersionedDocument};
use serde_json::Value;

/// Escape text for a Markdown table cell.
///
/// Structural characters are escaped first, then line endings are unified and
/// turned into `<br/>`, so a backslash before a newline is escaped only once.
pub fn escape_markdown(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        // MDX would read braces as expressions and angle brackets as JSX
        .replace('{', "&#123;")
        .replace('}', "&#125;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br/>")
}

fn pre(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<pre>{}</pre>", escape_markdown(text))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Render a document using the table shape of its own schema version.
pub fn render_markdown(doc: &VersionedDocument) -> String {
    match doc {
        VersionedDocument::V1(doc) => render_v1(doc),
        VersionedDocument::V2(doc) => render_v2(doc),
    }
}

/// Title, version, publication date and description lines shared by both shapes.
fn render_header(
    lines: &mut Vec<String>,
    title: &str,
    version: Option<&str>,
    publication_date: &str,
    description: &str,
) {
    lines.push(format!("# {}", escape_markdown(title)));
    lines.push(String::new());

    if let Some(version) = non_empty(version) {
        lines.push(format!("Version: {}", escape_markdown(version)));
    }
    if !publication_date.is_empty() {
        lines.push(format!("Published: {}", escape_markdown(publication_date)));
    }
    if !description.is_empty() {
        lines.push(String::new());
        lines.push(escape_markdown(description));
    }
}

fn render_section_heading(lines: &mut Vec<String>, title: &str, description: Option<&str>) {
    lines.push(String::new());
    lines.push(format!("## {}", escape_markdown(title)));

    if let Some(description) = non_empty(description) {
        lines.push(String::new());
        lines.push(escape_markdown(description));
    }

    lines.push(String::new());
}

/// Render a v2 document: anchor/content columns styled by retrieval direction.
pub fn render_v2(doc: &Document) -> String {
    let mut lines = Vec::new();
    render_header(
        &mut lines,
        &doc.title,
        doc.version.as_deref(),
        &doc.publication_date,
        &doc.description,
    );

    if let Some(direction) = &doc.retrieval_direction {
        if !direction.as_str().is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "*Retrieval direction: {}*",
                escape_markdown(direction.as_str())
            ));
        }
    }

    let anchor_is_mechanism = doc.retrieval_direction().anchor_is_mechanism();
    let header = format!(
        "| {} | {} |",
        escape_markdown(doc.anchor_label()),
        escape_markdown(doc.content_label())
    );

    for section in &doc.sections {
        render_section_heading(&mut lines, &section.title, section.description.as_deref());
        lines.push(header.clone());
        lines.push("| --- | --- |".to_string());

        for entry in &section.entries {
            let label = non_empty(entry.label.as_deref())
                .map(|label| escape_markdown(&format!(" ({label})")))
                .unwrap_or_default();

            let (lhs, rhs) = if anchor_is_mechanism {
                let lhs = if entry.anchor.is_empty() {
                    String::new()
                } else {
                    format!("{}{label}", pre(&entry.anchor))
                };
                (lhs, escape_markdown(&entry.content))
            } else {
                let lhs = if entry.anchor.is_empty() {
                    String::new()
                } else {
                    format!("{}{label}", escape_markdown(&entry.anchor))
                };
                (lhs, pre(&entry.content))
            };

            lines.push(format!("| {lhs} | {rhs} |"));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Render a v1 document as `Example | Description` tables.
pub fn render_v1(doc: &DocumentV1) -> String {
    let mut lines = Vec::new();
    render_header(
        &mut lines,
        &doc.title,
        doc.version.as_deref(),
        &doc.publication_date,
        &doc.description,
    );

    for section in &doc.sections {
        render_section_heading(&mut lines, &section.title, section.description.as_deref());
        lines.push("| Example | Description |".to_string());
        lines.push("| --- | --- |".to_string());

        for item in &section.items {
            // A present example always wins, even when it is empty or null
            let example = match &item.example {
                None => item.title.clone(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => format!("{other:#}"),
            };

            lines.push(format!(
                "| {} | {} |",
                pre(&example),
                escape_markdown(&item.description)
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}
