use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::document::aggregator::aggregate;
use crate::document::ResumeDocument;
use crate::errors::AppError;
use crate::resumes::lifecycle::{
    self, CreateResumeRequest, UpdateResumeRequest, ACTIVITY_LIMIT,
};
use crate::resumes::preview::{preview, PreviewBundle};
use crate::state::AppState;
use crate::store::{ActivityRecord, ResumeRecord};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

/// Body of an action that carries nothing but the caller.
#[derive(Debug, Deserialize)]
pub struct UserBody {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub user_id: Uuid,
    pub template_id: Option<String>,
}

/// The nil id is what an unauthenticated client sends; treat it as no caller.
pub fn require_user(user_id: Uuid) -> Result<Uuid, AppError> {
    if user_id.is_nil() {
        return Err(AppError::Unauthorized);
    }
    Ok(user_id)
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    let user_id = require_user(params.user_id)?;
    Ok(Json(state.store.list_resumes(user_id).await?))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    require_user(request.user_id)?;
    let record =
        lifecycle::create_resume(state.store.as_ref(), state.notifier.as_ref(), &request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    require_user(request.user_id)?;
    let record = lifecycle::update_resume(
        state.store.as_ref(),
        state.notifier.as_ref(),
        resume_id,
        &request,
    )
    .await?;
    Ok(Json(record))
}

/// DELETE /api/v1/resumes/:id?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserQuery>,
) -> Result<StatusCode, AppError> {
    let user_id = require_user(params.user_id)?;
    lifecycle::delete_resume(
        state.store.as_ref(),
        state.notifier.as_ref(),
        user_id,
        resume_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/duplicate
pub async fn handle_duplicate_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(body): Json<UserBody>,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    let user_id = require_user(body.user_id)?;
    let copy = lifecycle::duplicate_resume(
        state.store.as_ref(),
        state.notifier.as_ref(),
        user_id,
        resume_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// GET /api/v1/activities?user_id=
///
/// The user's most recent activity, newest first.
pub async fn handle_activities(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<ActivityRecord>>, AppError> {
    let user_id = require_user(params.user_id)?;
    let activities = state
        .store
        .recent_activities(user_id, ACTIVITY_LIMIT)
        .await?;
    Ok(Json(activities))
}

/// GET /api/v1/resumes/:id/document
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserQuery>,
) -> Result<Json<ResumeDocument>, AppError> {
    let user_id = require_user(params.user_id)?;
    let aggregated = aggregate(state.store.as_ref(), user_id, resume_id).await?;
    Ok(Json(aggregated.document))
}

/// GET /api/v1/resumes/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<PreviewQuery>,
) -> Result<Json<PreviewBundle>, AppError> {
    let user_id = require_user(params.user_id)?;
    let bundle = preview(
        state.store.as_ref(),
        user_id,
        resume_id,
        params.template_id.as_deref(),
    )
    .await?;
    Ok(Json(bundle))
}
