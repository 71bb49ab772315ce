//! Export Orchestrator: aggregate, validate, render, then record.
//!
//! Only the render result decides whether an export succeeded. The print
//! surface and the history write run after the artifact exists, and their
//! failures come back as warnings on an otherwise successful outcome.

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::document::aggregator::aggregate;
use crate::document::PersonalInfo;
use crate::export::notifier::{Notice, Notifier};
use crate::render::print::PrintSurface;
use crate::render::{render, ExportFormat, RenderError};
use crate::store::{
    ActivityType, ExportRecord, NewActivity, NewExportRecord, ResumeStore, StoreError,
};
use crate::templates::styles::resolve_styles;

pub const DEFAULT_FILE_NAME: &str = "My_Resume";
const MAX_FILE_NAME_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Please add your personal information first.")]
    MissingPersonalInfo,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    pub user_id: Uuid,
    pub format: ExportFormat,
    /// Without extension. Defaults to the resume title.
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Artifact {
    /// Name offered to the browser, extension included.
    pub download_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub artifact: Artifact,
    /// `None` when the history write failed.
    pub record: Option<ExportRecord>,
    pub print_url: Option<String>,
    pub warnings: Vec<String>,
}

/// The resume title with whitespace runs turned into `_`, or `My_Resume`.
pub fn default_file_name(title: &str) -> String {
    let name = title.split_whitespace().collect::<Vec<_>>().join("_");
    if name.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        sanitize_file_name(&name, None)
    }
}

/// Makes a caller-supplied name safe for a `Content-Disposition` header and an
/// object key: no path separators, quotes or control characters. A trailing
/// extension matching `format` is dropped so it is not doubled.
pub fn sanitize_file_name(raw: &str, format: Option<ExportFormat>) -> String {
    let mut name = raw.trim();
    if let Some(format) = format {
        let suffix = format!(".{}", format.extension());
        if name.to_ascii_lowercase().ends_with(&suffix) {
            name = &name[..name.len() - suffix.len()];
        }
    }

    let cleaned: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILE_NAME_CHARS)
        .collect();

    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

/// `<First>_<Last>_Resume.html`, the name the print-ready HTML downloads under.
pub fn print_file_name(info: &PersonalInfo) -> String {
    let parts: Vec<String> = [info.first_name.as_deref(), info.last_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|p| !p.trim().is_empty())
        .map(|p| sanitize_file_name(p, None))
        .collect();
    if parts.is_empty() {
        format!("{DEFAULT_FILE_NAME}.html")
    } else {
        format!("{}_Resume.html", parts.join("_"))
    }
}

pub async fn export_resume<S>(
    store: &S,
    notifier: &dyn Notifier,
    print_surface: Option<&dyn PrintSurface>,
    resume_id: Uuid,
    request: &ExportRequest,
) -> Result<ExportOutcome, ExportError>
where
    S: ResumeStore + ?Sized,
{
    let user_id = request.user_id;
    let format = request.format;

    let aggregated = aggregate(store, user_id, resume_id).await.map_err(|e| {
        notifier.notify(
            user_id,
            Notice::error("Export Failed", "There was an error loading your resume."),
        );
        e
    })?;
    let meta = aggregated.meta;
    let document = aggregated.document;

    let personal_info = match document.personal_info.as_ref() {
        Some(info) if info.has_identity() => info,
        _ => {
            notifier.notify(
                user_id,
                Notice::error("No Data", "Please add your personal information first."),
            );
            return Err(ExportError::MissingPersonalInfo);
        }
    };

    let file_name = match request.file_name.as_deref() {
        Some(name) if !name.trim().is_empty() => sanitize_file_name(name, Some(format)),
        _ => default_file_name(&meta.title),
    };
    let recorded_name = format!("{file_name}.{}", format.extension());

    let styles = resolve_styles(&meta.template_id);
    let bytes = render(format, &document, &styles).map_err(|e| {
        notifier.notify(
            user_id,
            Notice::error("Export Failed", "There was an error exporting your resume."),
        );
        e
    })?;

    let download_name = match format {
        ExportFormat::Pdf => print_file_name(personal_info),
        _ => recorded_name.clone(),
    };

    let mut warnings = Vec::new();

    let print_url = match (format, print_surface) {
        (ExportFormat::Pdf, Some(surface)) => {
            let html = String::from_utf8_lossy(&bytes);
            match surface.publish(resume_id, &download_name, &html).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Print surface unavailable for resume {resume_id}: {e}");
                    let message =
                        "Print dialog could not be opened; the HTML file was downloaded instead.";
                    notifier.notify(user_id, Notice::warning("Print Unavailable", message));
                    warnings.push(message.to_string());
                    None
                }
            }
        }
        _ => None,
    };

    let new_record = NewExportRecord {
        resume_id,
        resume_title: meta.title.clone(),
        export_format: format.label().to_string(),
        file_name: recorded_name.clone(),
    };
    let record = match store.record_export(user_id, &new_record).await {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Failed to record export of resume {resume_id}: {e}");
            warnings.push("Export history could not be updated.".to_string());
            None
        }
    };

    let activity = NewActivity {
        resume_id: Some(resume_id),
        activity_type: ActivityType::Downloaded,
        resume_title: meta.title.clone(),
    };
    if let Err(e) = store.record_activity(user_id, &activity).await {
        warn!("Failed to record download of resume {resume_id}: {e}");
    }

    notifier.notify(
        user_id,
        Notice::success(
            "Resume Exported Successfully",
            format!("Your resume has been downloaded as {recorded_name}"),
        ),
    );

    info!(
        "Exported resume {resume_id} as {} ({} bytes, template {})",
        format.label(),
        bytes.len(),
        meta.template_id
    );

    Ok(ExportOutcome {
        artifact: Artifact {
            download_name,
            content_type: format.content_type(),
            bytes: Bytes::from(bytes),
        },
        record,
        print_url,
        warnings,
    })
}
