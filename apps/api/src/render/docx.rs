//! Word-processor (.docx) resume.
//!
//! The outline is first lowered into a small block graph that tests can inspect,
//! then serialized with docx-rs.

use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, LineSpacing, Paragraph, Run, RunFonts, Style, StyleType};

use crate::document::ResumeDocument;
use crate::render::outline::{EntryBlock, Outline, SectionBody};
use crate::render::RenderError;
use crate::templates::styles::PrintStyle;

const TITLE_STYLE: &str = "Heading1";
const HEADING_STYLE: &str = "Heading2";

/// Half-points, as docx-rs sizes are.
const TITLE_SIZE: usize = 36;
const HEADING_SIZE: usize = 28;
const BODY_SIZE: usize = 22;

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
}

impl TextRun {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// The candidate's name.
    Title(String),
    /// A section heading.
    Heading(String),
    Paragraph {
        runs: Vec<TextRun>,
        centered: bool,
        /// Twips of space above the paragraph.
        space_before: u32,
    },
}

impl Block {
    fn line(run: TextRun) -> Self {
        Self::Paragraph {
            runs: vec![run],
            centered: false,
            space_before: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentGraph {
    pub blocks: Vec<Block>,
}

impl DocumentGraph {
    pub fn headings(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every run's text, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Title(text) | Block::Heading(text) => text.clone(),
                Block::Paragraph { runs, .. } => runs.iter().map(|r| r.text.as_str()).collect(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn build_graph(outline: &Outline) -> DocumentGraph {
    let mut blocks = Vec::new();

    if !outline.header.full_name.is_empty() {
        blocks.push(Block::Title(outline.header.full_name.clone()));
    }
    if !outline.header.contact.is_empty() {
        blocks.push(Block::Paragraph {
            runs: vec![TextRun::plain(outline.header.contact.join(" | "))],
            centered: true,
            space_before: 0,
        });
    }

    for section in &outline.sections {
        blocks.push(Block::Heading(section.title.to_string()));
        match &section.body {
            SectionBody::Paragraphs(lines) => {
                blocks.extend(lines.iter().map(|l| Block::line(TextRun::plain(l.as_str()))));
            }
            SectionBody::Badges(names) => {
                blocks.push(Block::line(TextRun::plain(names.join(", "))));
            }
            SectionBody::Entries(entries) => {
                for entry in entries {
                    push_entry(&mut blocks, entry);
                }
            }
        }
    }

    DocumentGraph { blocks }
}

fn push_entry(blocks: &mut Vec<Block>, entry: &EntryBlock) {
    blocks.push(Block::Paragraph {
        runs: vec![TextRun::bold(entry.title.as_str())],
        centered: false,
        space_before: 120,
    });
    for line in [&entry.subtitle, &entry.date].into_iter().flatten() {
        blocks.push(Block::line(TextRun::plain(line.as_str())));
    }
    for line in &entry.details {
        blocks.push(Block::line(TextRun::plain(line.as_str())));
    }
    if !entry.links.is_empty() {
        let links: Vec<String> = entry
            .links
            .iter()
            .map(|link| format!("{}: {}", link.short_label, link.url))
            .collect();
        blocks.push(Block::line(TextRun::plain(links.join(" | "))));
    }
}

pub fn render_docx(document: &ResumeDocument, style: &PrintStyle) -> Result<Vec<u8>, RenderError> {
    let graph = build_graph(&Outline::build(document));
    pack(&graph, style)
}

fn pack(graph: &DocumentGraph, style: &PrintStyle) -> Result<Vec<u8>, RenderError> {
    let mut docx = Docx::new()
        .add_style(Style::new(TITLE_STYLE, StyleType::Paragraph).name("Heading 1"))
        .add_style(Style::new(HEADING_STYLE, StyleType::Paragraph).name("Heading 2"));

    for block in &graph.blocks {
        docx = docx.add_paragraph(paragraph(block, style));
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| RenderError::Package(e.to_string()))?;
    Ok(buffer.into_inner())
}

fn accent_run(text: &str, size: usize, style: &PrintStyle) -> Run {
    let run = Run::new()
        .add_text(text)
        .bold()
        .size(size)
        .color(style.accent_color);
    match style.heading_font {
        Some(font) => run.fonts(RunFonts::new().ascii(font).hi_ansi(font)),
        None => run,
    }
}

fn paragraph(block: &Block, style: &PrintStyle) -> Paragraph {
    match block {
        Block::Title(text) => Paragraph::new()
            .style(TITLE_STYLE)
            .align(AlignmentType::Center)
            .add_run(accent_run(text, TITLE_SIZE, style)),
        Block::Heading(text) => Paragraph::new()
            .style(HEADING_STYLE)
            .line_spacing(LineSpacing::new().before(240).after(80))
            .add_run(accent_run(text, HEADING_SIZE, style)),
        Block::Paragraph {
            runs,
            centered,
            space_before,
        } => {
            let mut p = Paragraph::new().line_spacing(LineSpacing::new().before(*space_before));
            if *centered {
                p = p.align(AlignmentType::Center);
            }
            for run in runs {
                let mut r = Run::new().add_text(run.text.as_str()).size(BODY_SIZE);
                if run.bold {
                    r = r.bold();
                }
                p = p.add_run(r);
            }
            p
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{full, jane_only};
    use crate::templates::styles::resolve_styles;

    #[test]
    fn test_header_only_graph() {
        let graph = build_graph(&Outline::build(&jane_only()));
        assert_eq!(
            graph.blocks,
            vec![
                Block::Title("Jane Doe".into()),
                Block::Paragraph {
                    runs: vec![TextRun::plain("jane@x.com")],
                    centered: true,
                    space_before: 0,
                },
            ]
        );
        assert!(graph.headings().is_empty());
    }

    #[test]
    fn test_entry_title_is_bold_and_subtitle_plain() {
        let graph = build_graph(&Outline::build(&full()));
        let engineer = graph
            .blocks
            .iter()
            .position(|b| matches!(b, Block::Paragraph { runs, .. } if runs[0].text == "Engineer"))
            .unwrap();
        let Block::Paragraph { runs, .. } = &graph.blocks[engineer] else {
            unreachable!()
        };
        assert!(runs[0].bold);
        assert_eq!(graph.blocks[engineer + 1], Block::line(TextRun::plain("Acme, Remote")));
        assert_eq!(
            graph.blocks[engineer + 2],
            Block::line(TextRun::plain("Jan 2020 - Present"))
        );
    }

    #[test]
    fn test_docx_packages_for_every_family() {
        for id in ["professional-classic", "modern-bold", "simple-clean", "creative-modern", "executive-premium"] {
            let bytes = render_docx(&full(), &resolve_styles(id).print).unwrap();
            assert!(bytes.starts_with(b"PK"), "{id}");
            assert!(bytes.len() > 1000, "{id}");
        }
    }

    #[test]
    fn test_empty_document_still_packages() {
        let bytes = render_docx(&ResumeDocument::default(), &resolve_styles("").print).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
