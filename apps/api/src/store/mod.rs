//! Store boundary: everything the pipeline reads from or writes to the
//! managed database goes through the traits in this module.
//!
//! `PgStore` is the production implementation. Access policy (does this resume
//! belong to this user?) is enforced here and surfaced as a typed error so the
//! aggregator never mistakes "not yours" for "empty".

pub mod changes;
pub mod postgres;
pub mod repository;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::document::{Certification, Education, PersonalInfo, Project, Skill, WorkExperience};
use crate::models::sections::{
    CertificationRow, EducationRow, PersonalInfoRow, ProjectRow, SkillRow, WorkExperienceRow,
};
use crate::store::repository::SectionTable;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    ResumeNotFound(Uuid),

    #[error("Resume {0} does not belong to the requesting user")]
    NotOwner(Uuid),

    #[error("Row {0} not found")]
    RowNotFound(Uuid),

    #[error("Invalid section data: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The resume header row, as much of it as the pipeline needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMeta {
    pub id: Uuid,
    pub title: String,
    pub template_id: String,
}

/// A resume as the dashboard lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub title: String,
    pub template_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// Fields an update may change; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeChanges {
    pub title: Option<String>,
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Created,
    Updated,
    Downloaded,
    Deleted,
    Duplicated,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Downloaded => "downloaded",
            Self::Deleted => "deleted",
            Self::Duplicated => "duplicated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "downloaded" => Some(Self::Downloaded),
            "deleted" => Some(Self::Deleted),
            "duplicated" => Some(Self::Duplicated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    /// `None` once the resume is gone.
    pub resume_id: Option<Uuid>,
    pub activity_type: ActivityType,
    pub resume_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub resume_id: Option<Uuid>,
    pub activity_type: ActivityType,
    pub resume_title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExportRecord {
    pub resume_id: Uuid,
    pub resume_title: String,
    pub export_format: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub resume_title: String,
    pub export_format: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// Read side of the store, one method per section. Lists come back in
/// whatever order the backend chose; callers sort.
#[async_trait]
pub trait ResumeSource: Send + Sync {
    /// Fails with `ResumeNotFound` or `NotOwner` rather than returning nothing.
    async fn resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<ResumeMeta, StoreError>;
    async fn personal_info(&self, resume_id: Uuid) -> Result<Option<PersonalInfo>, StoreError>;
    async fn work_experience(&self, resume_id: Uuid) -> Result<Vec<WorkExperience>, StoreError>;
    async fn education(&self, resume_id: Uuid) -> Result<Vec<Education>, StoreError>;
    async fn skills(&self, resume_id: Uuid) -> Result<Vec<Skill>, StoreError>;
    async fn certifications(&self, resume_id: Uuid) -> Result<Vec<Certification>, StoreError>;
    async fn projects(&self, resume_id: Uuid) -> Result<Vec<Project>, StoreError>;
}

#[async_trait]
pub trait ExportLog: Send + Sync {
    async fn record_export(
        &self,
        user_id: Uuid,
        record: &NewExportRecord,
    ) -> Result<ExportRecord, StoreError>;

    /// Newest first. `resume_id = None` lists across all of the user's resumes.
    async fn recent_exports(
        &self,
        user_id: Uuid,
        resume_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<ExportRecord>, StoreError>;
}

/// Resume rows themselves. Every method takes the caller and fails with
/// `ResumeNotFound` or `NotOwner` for someone else's resume.
#[async_trait]
pub trait ResumeCatalog: Send + Sync {
    /// Most recently updated first.
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRecord>, StoreError>;

    async fn create_resume(
        &self,
        user_id: Uuid,
        title: &str,
        template_id: &str,
    ) -> Result<ResumeRecord, StoreError>;

    async fn update_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        changes: &ResumeChanges,
    ) -> Result<ResumeRecord, StoreError>;

    /// Section rows go with the resume.
    async fn delete_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<(), StoreError>;

    /// New resume titled `title` with the source's template and a copy of
    /// every section row. All or nothing.
    async fn duplicate_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        title: &str,
    ) -> Result<ResumeRecord, StoreError>;
}

#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record_activity(
        &self,
        user_id: Uuid,
        activity: &NewActivity,
    ) -> Result<ActivityRecord, StoreError>;

    /// Newest first.
    async fn recent_activities(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityRecord>, StoreError>;
}

/// Row writes for one section table. Callers check resume ownership first.
#[async_trait]
pub trait SectionWriter<S: SectionTable>: Send + Sync {
    /// Rejects a second row for a singleton table with `Invalid`.
    async fn create_row(&self, resume_id: Uuid, input: &S::Input) -> Result<S, StoreError>;

    /// `RowNotFound` unless `row_id` belongs to `resume_id`.
    async fn update_row(
        &self,
        resume_id: Uuid,
        row_id: Uuid,
        input: &S::Input,
    ) -> Result<S, StoreError>;

    async fn delete_row(&self, resume_id: Uuid, row_id: Uuid) -> Result<(), StoreError>;
}

/// Everything the service needs from the database. Carried in `AppState` as
/// `Arc<dyn ResumeStore>`.
pub trait ResumeStore:
    ResumeSource
    + ExportLog
    + ResumeCatalog
    + ActivityLog
    + SectionWriter<PersonalInfoRow>
    + SectionWriter<WorkExperienceRow>
    + SectionWriter<EducationRow>
    + SectionWriter<SkillRow>
    + SectionWriter<CertificationRow>
    + SectionWriter<ProjectRow>
{
}

impl<T> ResumeStore for T where
    T: ResumeSource
        + ExportLog
        + ResumeCatalog
        + ActivityLog
        + SectionWriter<PersonalInfoRow>
        + SectionWriter<WorkExperienceRow>
        + SectionWriter<EducationRow>
        + SectionWriter<SkillRow>
        + SectionWriter<CertificationRow>
        + SectionWriter<ProjectRow>
{
}
