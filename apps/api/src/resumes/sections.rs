//! Section writes. One set of generic handlers serves all six section tables;
//! `section_routes` mounts them under a table's URL slug.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::sections::{
    CertificationRow, EducationRow, PersonalInfoRow, ProjectRow, SkillRow, WorkExperienceRow,
};
use crate::resumes::handlers::{require_user, UserQuery};
use crate::state::AppState;
use crate::store::changes::{ChangeOperation, SectionChange};
use crate::store::repository::SectionTable;
use crate::store::{ResumeSource, ResumeStore, SectionWriter, StoreError};

/// Body of a create or update: the caller plus the row's writable fields.
#[derive(Debug, Deserialize)]
pub struct SectionWrite<I> {
    pub user_id: Uuid,
    pub row: I,
}

pub fn change_for<S: SectionTable>(
    resume_id: Uuid,
    row_id: Uuid,
    operation: ChangeOperation,
) -> SectionChange {
    SectionChange {
        table: S::TABLE,
        resume_id,
        row_id,
        operation,
    }
}

/// Ownership check, then the write. The caller is already known to be signed in.
pub async fn create_section<S, W>(
    store: &W,
    user_id: Uuid,
    resume_id: Uuid,
    input: &S::Input,
) -> Result<S, StoreError>
where
    S: SectionTable,
    W: ResumeSource + SectionWriter<S> + ?Sized,
{
    store.resume(user_id, resume_id).await?;
    SectionWriter::<S>::create_row(store, resume_id, input).await
}

pub async fn update_section<S, W>(
    store: &W,
    user_id: Uuid,
    resume_id: Uuid,
    row_id: Uuid,
    input: &S::Input,
) -> Result<S, StoreError>
where
    S: SectionTable,
    W: ResumeSource + SectionWriter<S> + ?Sized,
{
    store.resume(user_id, resume_id).await?;
    SectionWriter::<S>::update_row(store, resume_id, row_id, input).await
}

pub async fn delete_section<S, W>(
    store: &W,
    user_id: Uuid,
    resume_id: Uuid,
    row_id: Uuid,
) -> Result<(), StoreError>
where
    S: SectionTable,
    W: ResumeSource + SectionWriter<S> + ?Sized,
{
    store.resume(user_id, resume_id).await?;
    SectionWriter::<S>::delete_row(store, resume_id, row_id).await
}

/// POST /api/v1/resumes/:id/sections/<slug>
pub async fn handle_create_row<S>(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(body): Json<SectionWrite<S::Input>>,
) -> Result<(StatusCode, Json<S>), AppError>
where
    S: SectionTable,
    dyn ResumeStore: SectionWriter<S>,
{
    let user_id = require_user(body.user_id)?;
    let row = create_section::<S, _>(state.store.as_ref(), user_id, resume_id, &body.row).await?;

    state
        .changes
        .publish(
            user_id,
            &change_for::<S>(resume_id, row.row_id(), ChangeOperation::Created),
        )
        .await;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/resumes/:id/sections/<slug>/:row_id
pub async fn handle_update_row<S>(
    State(state): State<AppState>,
    Path((resume_id, row_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<SectionWrite<S::Input>>,
) -> Result<Json<S>, AppError>
where
    S: SectionTable,
    dyn ResumeStore: SectionWriter<S>,
{
    let user_id = require_user(body.user_id)?;
    let row = update_section::<S, _>(state.store.as_ref(), user_id, resume_id, row_id, &body.row)
        .await?;

    state
        .changes
        .publish(
            user_id,
            &change_for::<S>(resume_id, row_id, ChangeOperation::Updated),
        )
        .await;
    Ok(Json(row))
}

/// DELETE /api/v1/resumes/:id/sections/<slug>/:row_id?user_id=
pub async fn handle_delete_row<S>(
    State(state): State<AppState>,
    Path((resume_id, row_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<UserQuery>,
) -> Result<StatusCode, AppError>
where
    S: SectionTable,
    dyn ResumeStore: SectionWriter<S>,
{
    let user_id = require_user(params.user_id)?;
    delete_section::<S, _>(state.store.as_ref(), user_id, resume_id, row_id).await?;

    state
        .changes
        .publish(
            user_id,
            &change_for::<S>(resume_id, row_id, ChangeOperation::Deleted),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}

pub fn section_routes<S>(router: Router<AppState>, slug: &str) -> Router<AppState>
where
    S: SectionTable,
    dyn ResumeStore: SectionWriter<S>,
{
    let collection = format!("/api/v1/resumes/:id/sections/{slug}");
    let member = format!("{collection}/:row_id");
    router
        .route(&collection, post(handle_create_row::<S>))
        .route(
            &member,
            put(handle_update_row::<S>).delete(handle_delete_row::<S>),
        )
}

/// Mounts create/update/delete for every section table.
pub fn all_section_routes(router: Router<AppState>) -> Router<AppState> {
    let router = section_routes::<PersonalInfoRow>(router, "personal-info");
    let router = section_routes::<WorkExperienceRow>(router, "work-experience");
    let router = section_routes::<EducationRow>(router, "education");
    let router = section_routes::<SkillRow>(router, "skills");
    let router = section_routes::<CertificationRow>(router, "certifications");
    section_routes::<ProjectRow>(router, "projects")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sections::{PersonalInfoInput, SkillInput, WorkExperienceInput};
    use crate::render::fixtures::full;
    use crate::store::memory::MemoryStore;
    use crate::store::ResumeMeta;
    use crate::document::ResumeDocument;

    fn meta(id: Uuid) -> ResumeMeta {
        ResumeMeta {
            id,
            title: "Resume".into(),
            template_id: "modern-bold".into(),
        }
    }

    fn job(title: &str) -> WorkExperienceInput {
        WorkExperienceInput {
            job_title: title.into(),
            company: "Acme".into(),
            location: None,
            start_date: None,
            end_date: None,
            is_current: true,
            description: None,
            display_order: Some(0),
        }
    }

    #[tokio::test]
    async fn test_create_update_delete_row() {
        let (user, resume) = (Uuid::new_v4(), Uuid::new_v4());
        let store = MemoryStore::new().with_resume(user, meta(resume), ResumeDocument::default());

        let created = create_section::<WorkExperienceRow, _>(&store, user, resume, &job("Engineer"))
            .await
            .unwrap();
        assert_eq!(created.resume_id, resume);
        assert_eq!(created.is_current, Some(true));

        let updated =
            update_section::<WorkExperienceRow, _>(&store, user, resume, created.id, &job("Staff Engineer"))
                .await
                .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);

        let titles: Vec<String> = store
            .work_experience(resume)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.title)
            .collect();
        assert_eq!(titles, ["Staff Engineer"]);

        delete_section::<WorkExperienceRow, _>(&store, user, resume, created.id)
            .await
            .unwrap();
        assert!(store.rows::<WorkExperienceRow>(resume).is_empty());
        assert!(matches!(
            delete_section::<WorkExperienceRow, _>(&store, user, resume, created.id).await,
            Err(StoreError::RowNotFound(id)) if id == created.id
        ));
    }

    #[tokio::test]
    async fn test_second_personal_info_is_rejected() {
        let (user, resume) = (Uuid::new_v4(), Uuid::new_v4());
        let store = MemoryStore::new().with_resume(user, meta(resume), ResumeDocument::default());
        let input = PersonalInfoInput {
            first_name: Some("Jane".into()),
            ..Default::default()
        };

        let first = create_section::<PersonalInfoRow, _>(&store, user, resume, &input)
            .await
            .unwrap();
        assert_eq!(first.first_name.as_deref(), Some("Jane"));

        let second = create_section::<PersonalInfoRow, _>(&store, user, resume, &input).await;
        assert!(matches!(second, Err(StoreError::Invalid(_))));
        assert_eq!(store.rows::<PersonalInfoRow>(resume).len(), 1);

        let (seeded_user, seeded) = (Uuid::new_v4(), Uuid::new_v4());
        let store = MemoryStore::new().with_resume(seeded_user, meta(seeded), full());
        let again = create_section::<PersonalInfoRow, _>(&store, seeded_user, seeded, &input).await;
        assert!(matches!(again, Err(StoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_row_of_another_resume_is_not_found() {
        let (user, mine, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let store = MemoryStore::new()
            .with_resume(user, meta(mine), ResumeDocument::default())
            .with_resume(user, meta(other), ResumeDocument::default());

        let row = create_section::<WorkExperienceRow, _>(&store, user, other, &job("Engineer"))
            .await
            .unwrap();

        let update =
            update_section::<WorkExperienceRow, _>(&store, user, mine, row.id, &job("Lead")).await;
        assert!(matches!(update, Err(StoreError::RowNotFound(id)) if id == row.id));
        let delete = delete_section::<WorkExperienceRow, _>(&store, user, mine, row.id).await;
        assert!(matches!(delete, Err(StoreError::RowNotFound(_))));
        assert_eq!(store.rows::<WorkExperienceRow>(other)[0].job_title, "Engineer");
    }

    #[tokio::test]
    async fn test_writes_to_someone_elses_resume_are_refused() {
        let (owner, resume) = (Uuid::new_v4(), Uuid::new_v4());
        let store = MemoryStore::new().with_resume(owner, meta(resume), ResumeDocument::default());

        let create =
            create_section::<WorkExperienceRow, _>(&store, Uuid::new_v4(), resume, &job("X")).await;
        assert!(matches!(create, Err(StoreError::NotOwner(_))));
        assert!(store.rows::<WorkExperienceRow>(resume).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_row_is_rejected_before_write() {
        let (user, resume) = (Uuid::new_v4(), Uuid::new_v4());
        let store = MemoryStore::new().with_resume(user, meta(resume), ResumeDocument::default());
        let input = SkillInput {
            skill_name: "Rust".into(),
            category: "wizardry".into(),
            proficiency_level: Some(80),
            display_order: None,
        };
        let result = create_section::<SkillRow, _>(&store, user, resume, &input).await;
        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert!(store.rows::<SkillRow>(resume).is_empty());
    }

    #[test]
    fn test_write_body_shape() {
        let body: SectionWrite<SkillInput> = serde_json::from_value(serde_json::json!({
            "user_id": "6f1c1b2e-0d7a-4c43-9d55-2f6f4f1b7a10",
            "row": {"skill_name": "Rust", "category": "technical", "proficiency_level": 80}
        }))
        .unwrap();
        assert_eq!(body.row.skill_name, "Rust");
        assert_eq!(body.row.display_order, None);
    }

    #[test]
    fn test_change_names_the_table() {
        let (resume, row) = (Uuid::new_v4(), Uuid::new_v4());
        let change = change_for::<ProjectRow>(resume, row, ChangeOperation::Updated);
        assert_eq!(change.table, "projects");
        assert_eq!(change.row_id, row);
        assert_eq!(
            change_for::<PersonalInfoRow>(resume, row, ChangeOperation::Created).table,
            "personal_info"
        );
    }
}
