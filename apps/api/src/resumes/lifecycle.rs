//! Resume lifecycle: create, update, delete and duplicate.
//!
//! Each successful change raises a notice and appends to the user's activity
//! feed. The feed write is best-effort; a failure is logged and the change
//! stands.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::notifier::{Notice, Notifier};
use crate::store::{ActivityType, NewActivity, ResumeChanges, ResumeRecord, ResumeStore};
use crate::templates::registry::{self, DEFAULT_TEMPLATE_ID};

/// How many entries the activity feed returns.
pub const ACTIVITY_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub template_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
}

pub fn copy_title(title: &str) -> String {
    format!("{title} (Copy)")
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

fn validate_template(template_id: &str) -> Result<String, AppError> {
    registry::resolve(template_id)
        .map(|template| template.id.to_string())
        .ok_or_else(|| AppError::Validation(format!("unknown template '{template_id}'")))
}

async fn log_activity<S>(
    store: &S,
    user_id: Uuid,
    resume_id: Option<Uuid>,
    activity_type: ActivityType,
    resume_title: &str,
) where
    S: ResumeStore + ?Sized,
{
    let activity = NewActivity {
        resume_id,
        activity_type,
        resume_title: resume_title.to_string(),
    };
    if let Err(e) = store.record_activity(user_id, &activity).await {
        warn!(
            "Failed to record {} activity for user {user_id}: {e}",
            activity_type.as_str()
        );
    }
}

fn report<T>(
    notifier: &dyn Notifier,
    user_id: Uuid,
    result: Result<T, AppError>,
    title: &str,
    description: &str,
) -> Result<T, AppError> {
    match &result {
        Ok(_) => notifier.notify(user_id, Notice::success(title, description)),
        Err(e) => notifier.notify(user_id, Notice::error("Error", e.to_string())),
    }
    result
}

pub async fn create_resume<S>(
    store: &S,
    notifier: &dyn Notifier,
    request: &CreateResumeRequest,
) -> Result<ResumeRecord, AppError>
where
    S: ResumeStore + ?Sized,
{
    let user_id = request.user_id;
    let result = async {
        let title = validate_title(&request.title)?;
        let template_id = match request.template_id.as_deref() {
            Some(id) => validate_template(id)?,
            None => DEFAULT_TEMPLATE_ID.to_string(),
        };
        let record = store.create_resume(user_id, &title, &template_id).await?;
        log_activity(store, user_id, Some(record.id), ActivityType::Created, &record.title).await;
        info!("Created resume {} for user {user_id}", record.id);
        Ok::<_, AppError>(record)
    }
    .await;

    report(
        notifier,
        user_id,
        result,
        "Resume Created",
        "Your new resume has been created successfully.",
    )
}

pub async fn update_resume<S>(
    store: &S,
    notifier: &dyn Notifier,
    resume_id: Uuid,
    request: &UpdateResumeRequest,
) -> Result<ResumeRecord, AppError>
where
    S: ResumeStore + ?Sized,
{
    let user_id = request.user_id;
    let result = async {
        let changes = ResumeChanges {
            title: request.title.as_deref().map(validate_title).transpose()?,
            template_id: request
                .template_id
                .as_deref()
                .map(validate_template)
                .transpose()?,
        };
        let record = store.update_resume(user_id, resume_id, &changes).await?;
        log_activity(store, user_id, Some(record.id), ActivityType::Updated, &record.title).await;
        Ok::<_, AppError>(record)
    }
    .await;

    report(
        notifier,
        user_id,
        result,
        "Resume Updated",
        "Your resume has been updated successfully.",
    )
}

pub async fn delete_resume<S>(
    store: &S,
    notifier: &dyn Notifier,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<(), AppError>
where
    S: ResumeStore + ?Sized,
{
    let result = async {
        let meta = store.resume(user_id, resume_id).await?;
        store.delete_resume(user_id, resume_id).await?;
        log_activity(store, user_id, None, ActivityType::Deleted, &meta.title).await;
        info!("Deleted resume {resume_id} for user {user_id}");
        Ok::<_, AppError>(())
    }
    .await;

    report(
        notifier,
        user_id,
        result,
        "Resume Deleted",
        "Your resume has been deleted successfully.",
    )
}

pub async fn duplicate_resume<S>(
    store: &S,
    notifier: &dyn Notifier,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<ResumeRecord, AppError>
where
    S: ResumeStore + ?Sized,
{
    let result = async {
        let meta = store.resume(user_id, resume_id).await?;
        let copy = store
            .duplicate_resume(user_id, resume_id, &copy_title(&meta.title))
            .await?;
        log_activity(store, user_id, Some(copy.id), ActivityType::Duplicated, &meta.title).await;
        info!("Duplicated resume {resume_id} as {} for user {user_id}", copy.id);
        Ok::<_, AppError>(copy)
    }
    .await;

    report(
        notifier,
        user_id,
        result,
        "Resume Duplicated",
        "Your resume has been duplicated successfully.",
    )
}
