// Render pipeline: one normalized document, three output encodings.
// Every renderer walks the same `Outline`, which is where section order and
// empty-section omission are decided.

pub mod docx;
pub mod html;
pub mod outline;
pub mod print;
pub mod text;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::ResumeDocument;
use crate::templates::styles::StyleBundle;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Document packaging failed: {0}")]
    Package(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Txt,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    /// Upper-case label recorded in export history.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
        }
    }

    /// MIME type of the downloadable artifact. The PDF path ships print-ready HTML.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "text/html; charset=utf-8",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Txt => "text/plain; charset=utf-8",
        }
    }
}

/// Renders `document` in `format`. Pure: the same inputs always produce the same bytes.
pub fn render(
    format: ExportFormat,
    document: &ResumeDocument,
    styles: &StyleBundle,
) -> Result<Vec<u8>, RenderError> {
    match format {
        ExportFormat::Pdf => html::render_html(document, &styles.print).map(String::into_bytes),
        ExportFormat::Docx => docx::render_docx(document, &styles.print),
        ExportFormat::Txt => Ok(text::render_text(document).into_bytes()),
    }
}
