//! Axum route handlers for sharing a resume.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::notifier::{Notice, Notifier};
use crate::resumes::handlers::require_user;
use crate::share::email::{validate_recipient, EmailSender, ShareEmail};
use crate::share::share_link;
use crate::state::AppState;
use crate::store::ResumeStore;

#[derive(Debug, Deserialize)]
pub struct ShareLinkRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ShareLinkResponse {
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareEmailRequest {
    pub user_id: Uuid,
    pub recipient_email: String,
}

#[derive(Debug, Serialize)]
pub struct ShareEmailResponse {
    pub success: bool,
}

/// Validates, looks up the sender, and hands the message to `sender`.
/// An unusable recipient is rejected before the store is touched.
pub async fn share_by_email<S>(
    store: &S,
    sender: &dyn EmailSender,
    notifier: &dyn Notifier,
    public_base_url: &str,
    resume_id: Uuid,
    request: &ShareEmailRequest,
) -> Result<(), AppError>
where
    S: ResumeStore + ?Sized,
{
    let recipient = validate_recipient(&request.recipient_email)?;

    let meta = store.resume(request.user_id, resume_id).await?;
    let sender_name = store
        .personal_info(resume_id)
        .await?
        .filter(|info| info.has_identity())
        .map(|info| info.full_name())
        .ok_or_else(|| {
            AppError::Validation("Please add your personal information first.".to_string())
        })?;

    let email = ShareEmail {
        recipient,
        link: share_link(public_base_url, resume_id),
        resume_title: meta.title,
        sender_name,
    };

    if let Err(e) = sender.send(&email).await {
        notifier.notify(
            request.user_id,
            Notice::error("Email Failed", "Failed to send email. Please try again."),
        );
        return Err(e.into());
    }

    notifier.notify(
        request.user_id,
        Notice::success(
            "Email Sent",
            format!("Your resume has been sent to {}.", email.recipient),
        ),
    );
    Ok(())
}

/// POST /api/v1/resumes/:id/share/link
pub async fn handle_share_link(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<ShareLinkRequest>,
) -> Result<Json<ShareLinkResponse>, AppError> {
    let user_id = require_user(request.user_id)?;
    state.store.resume(user_id, resume_id).await?;

    let link = share_link(&state.config.public_base_url, resume_id);
    state.notifier.notify(
        user_id,
        Notice::success("Link Generated", "Your shareable link has been created."),
    );
    Ok(Json(ShareLinkResponse { link }))
}

/// POST /api/v1/resumes/:id/share/email
pub async fn handle_share_email(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<ShareEmailRequest>,
) -> Result<Json<ShareEmailResponse>, AppError> {
    require_user(request.user_id)?;
    share_by_email(
        state.store.as_ref(),
        state.email.as_ref(),
        state.notifier.as_ref(),
        &state.config.public_base_url,
        resume_id,
        &request,
    )
    .await?;
    Ok(Json(ShareEmailResponse { success: true }))
}
