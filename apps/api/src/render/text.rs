//! Plain-text resume.

use crate::document::ResumeDocument;
use crate::render::outline::{EntryBlock, Outline, SectionBody};

const SECTION_RULE: &str = "--------------------";

pub fn render_text(document: &ResumeDocument) -> String {
    let outline = Outline::build(document);
    let mut lines: Vec<String> = Vec::new();

    let name = &outline.header.full_name;
    if !name.is_empty() {
        lines.push(name.clone());
        // Underline spans the name in characters, not bytes.
        lines.push("=".repeat(name.chars().count()));
    }
    if !outline.header.contact.is_empty() {
        lines.push(outline.header.contact.join(" | "));
    }

    for section in &outline.sections {
        lines.push(String::new());
        lines.push(section.title.to_uppercase());
        lines.push(SECTION_RULE.to_string());
        match &section.body {
            SectionBody::Paragraphs(paragraphs) => lines.extend(paragraphs.iter().cloned()),
            SectionBody::Badges(names) => lines.push(names.join(", ")),
            SectionBody::Entries(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.extend(entry_lines(entry));
                }
            }
        }
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn entry_lines(entry: &EntryBlock) -> Vec<String> {
    let mut lines = vec![entry.title.clone()];
    lines.extend([&entry.subtitle, &entry.date].into_iter().flatten().cloned());
    lines.extend(entry.details.iter().cloned());
    if !entry.links.is_empty() {
        let links: Vec<String> = entry
            .links
            .iter()
            .map(|link| format!("{}: {}", link.short_label, link.url))
            .collect();
        lines.push(links.join(" | "));
    }
    lines
}
