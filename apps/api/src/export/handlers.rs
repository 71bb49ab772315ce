//! Axum route handlers for the Export API.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::orchestrator::{export_resume, Artifact, ExportOutcome, ExportRequest};
use crate::resumes::handlers::{require_user, UserQuery};
use crate::state::AppState;
use crate::store::ExportRecord;

/// How many history records a listing returns.
pub const HISTORY_LIMIT: i64 = 10;

pub const EXPORT_ID_HEADER: HeaderName = HeaderName::from_static("x-export-id");
pub const PRINT_URL_HEADER: HeaderName = HeaderName::from_static("x-print-url");
pub const WARNING_HEADER: HeaderName = HeaderName::from_static("x-export-warning");

/// `attachment` disposition with an ASCII `filename` and, when the name is not
/// plain ASCII, an RFC 5987 `filename*` carrying the original.
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    if ascii == file_name {
        return format!("attachment; filename=\"{ascii}\"");
    }
    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.') {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

fn artifact_headers(artifact: &Artifact) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(artifact.content_type),
    );
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&artifact.download_name)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}

fn export_response(outcome: ExportOutcome) -> Response {
    let mut headers = artifact_headers(&outcome.artifact);

    if let Some(record) = &outcome.record {
        if let Ok(value) = HeaderValue::from_str(&record.id.to_string()) {
            headers.insert(EXPORT_ID_HEADER, value);
        }
    }
    if let Some(url) = &outcome.print_url {
        if let Ok(value) = HeaderValue::from_str(url) {
            headers.insert(PRINT_URL_HEADER, value);
        }
    }
    for warning in &outcome.warnings {
        if let Ok(value) = HeaderValue::from_str(warning) {
            headers.append(WARNING_HEADER, value);
        }
    }

    (headers, outcome.artifact.bytes).into_response()
}

/// POST /api/v1/resumes/:id/export
///
/// Renders the resume and returns the artifact as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    require_user(request.user_id)?;
    let outcome = export_resume(
        state.store.as_ref(),
        state.notifier.as_ref(),
        state.print_surface.as_deref(),
        resume_id,
        &request,
    )
    .await?;

    Ok(export_response(outcome))
}

/// GET /api/v1/resumes/:id/exports?user_id=
pub async fn handle_resume_exports(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<ExportRecord>>, AppError> {
    let user_id = require_user(query.user_id)?;
    state.store.resume(user_id, resume_id).await?;
    let records = state
        .store
        .recent_exports(user_id, Some(resume_id), HISTORY_LIMIT)
        .await?;
    Ok(Json(records))
}

/// GET /api/v1/exports?user_id=
///
/// Most recent exports across all of the user's resumes.
pub async fn handle_user_exports(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<ExportRecord>>, AppError> {
    let user_id = require_user(query.user_id)?;
    let records = state
        .store
        .recent_exports(user_id, None, HISTORY_LIMIT)
        .await?;
    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ExportFormat;
    use bytes::Bytes;

    #[test]
    fn test_ascii_disposition() {
        assert_eq!(
            content_disposition("Jane_Doe_Resume.html"),
            "attachment; filename=\"Jane_Doe_Resume.html\""
        );
    }

    #[test]
    fn test_non_ascii_disposition_is_encoded() {
        let value = content_disposition("Jos\u{e9}_CV.txt");
        assert!(value.starts_with("attachment; filename=\"Jos__CV.txt\""));
        assert!(value.ends_with("filename*=UTF-8''Jos%C3%A9_CV.txt"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn test_export_response_headers() {
        let outcome = ExportOutcome {
            artifact: Artifact {
                download_name: "cv.txt".into(),
                content_type: ExportFormat::Txt.content_type(),
                bytes: Bytes::from_static(b"Jane Doe\n"),
            },
            record: None,
            print_url: Some("https://prints.test/x".into()),
            warnings: vec!["Export history could not be updated.".into()],
        };
        let response = export_response(outcome);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(headers[header::CONTENT_DISPOSITION], "attachment; filename=\"cv.txt\"");
        assert_eq!(headers[PRINT_URL_HEADER], "https://prints.test/x");
        assert!(headers.get(EXPORT_ID_HEADER).is_none());
        assert_eq!(headers.get_all(WARNING_HEADER).iter().count(), 1);
    }
}
