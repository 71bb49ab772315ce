use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::document::{Certification, Education, PersonalInfo, Project, Skill, WorkExperience};
use crate::models::resume::{ActivityRow, ExportHistoryRow, ResumeRow};
use crate::models::sections::{
    CertificationRow, EducationRow, PersonalInfoRow, ProjectRow, SkillRow, WorkExperienceRow,
};
use crate::store::repository::{copy_rows, Repository, SectionTable};
use crate::store::{
    ActivityLog, ActivityRecord, ActivityType, ExportLog, ExportRecord, NewActivity,
    NewExportRecord, ResumeCatalog, ResumeChanges, ResumeMeta, ResumeRecord, ResumeSource,
    SectionWriter, StoreError,
};

/// PostgreSQL-backed store. Section reads go through the generic repository.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list<S, T>(&self, resume_id: Uuid) -> Result<Vec<T>, StoreError>
    where
        S: SectionTable + Into<T>,
        T: Send,
    {
        let rows = Repository::<S>::new(&self.pool)
            .list_for_resume(resume_id)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            template_id: row.template_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_accessed_at: row.last_accessed_at,
        }
    }
}

impl TryFrom<ActivityRow> for ActivityRecord {
    type Error = StoreError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let activity_type = ActivityType::parse(&row.activity_type).ok_or_else(|| {
            StoreError::Invalid(format!("unknown activity type '{}'", row.activity_type))
        })?;
        Ok(Self {
            id: row.id,
            resume_id: row.resume_id,
            activity_type,
            resume_title: row.resume_title,
            created_at: row.created_at,
        })
    }
}

impl From<ExportHistoryRow> for ExportRecord {
    fn from(row: ExportHistoryRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            resume_title: row.resume_title,
            export_format: row.export_format,
            file_name: row.file_name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ResumeSource for PgStore {
    async fn resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<ResumeMeta, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(resume_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ResumeNotFound(resume_id))?;

        if row.user_id != user_id {
            return Err(StoreError::NotOwner(resume_id));
        }

        Ok(ResumeMeta {
            id: row.id,
            title: row.title,
            template_id: row.template_id,
        })
    }

    async fn personal_info(&self, resume_id: Uuid) -> Result<Option<PersonalInfo>, StoreError> {
        let rows: Vec<PersonalInfo> = self.list::<PersonalInfoRow, _>(resume_id).await?;
        Ok(rows.into_iter().next())
    }

    async fn work_experience(&self, resume_id: Uuid) -> Result<Vec<WorkExperience>, StoreError> {
        self.list::<WorkExperienceRow, _>(resume_id).await
    }

    async fn education(&self, resume_id: Uuid) -> Result<Vec<Education>, StoreError> {
        self.list::<EducationRow, _>(resume_id).await
    }

    async fn skills(&self, resume_id: Uuid) -> Result<Vec<Skill>, StoreError> {
        self.list::<SkillRow, _>(resume_id).await
    }

    async fn certifications(&self, resume_id: Uuid) -> Result<Vec<Certification>, StoreError> {
        self.list::<CertificationRow, _>(resume_id).await
    }

    async fn projects(&self, resume_id: Uuid) -> Result<Vec<Project>, StoreError> {
        self.list::<ProjectRow, _>(resume_id).await
    }
}

#[async_trait]
impl ExportLog for PgStore {
    async fn record_export(
        &self,
        user_id: Uuid,
        record: &NewExportRecord,
    ) -> Result<ExportRecord, StoreError> {
        let row = sqlx::query_as::<_, ExportHistoryRow>(
            r#"
            INSERT INTO export_history (user_id, resume_id, resume_title, export_format, file_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(record.resume_id)
        .bind(&record.resume_title)
        .bind(&record.export_format)
        .bind(&record.file_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn recent_exports(
        &self,
        user_id: Uuid,
        resume_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<ExportRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ExportHistoryRow>(
            r#"
            SELECT * FROM export_history
            WHERE user_id = $1 AND ($2::uuid IS NULL OR resume_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(resume_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ResumeCatalog for PgStore {
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_resume(
        &self,
        user_id: Uuid,
        title: &str,
        template_id: &str,
    ) -> Result<ResumeRecord, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "INSERT INTO resumes (user_id, title, template_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(template_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        changes: &ResumeChanges,
    ) -> Result<ResumeRecord, StoreError> {
        self.resume(user_id, resume_id).await?;
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET title = COALESCE($3, title),
                template_id = COALESCE($4, template_id),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(resume_id)
        .bind(user_id)
        .bind(changes.title.as_deref())
        .bind(changes.template_id.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ResumeNotFound(resume_id))?;
        Ok(row.into())
    }

    async fn delete_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<(), StoreError> {
        self.resume(user_id, resume_id).await?;
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(resume_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::ResumeNotFound(resume_id));
        }
        Ok(())
    }

    async fn duplicate_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        title: &str,
    ) -> Result<ResumeRecord, StoreError> {
        self.resume(user_id, resume_id).await?;

        let mut tx = self.pool.begin().await?;
        let copy = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (user_id, title, template_id, custom_styles)
            SELECT user_id, $3, template_id, custom_styles FROM resumes
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(resume_id)
        .bind(user_id)
        .bind(title)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::ResumeNotFound(resume_id))?;

        copy_rows::<PersonalInfoRow>(&mut *tx, resume_id, copy.id).await?;
        copy_rows::<WorkExperienceRow>(&mut *tx, resume_id, copy.id).await?;
        copy_rows::<EducationRow>(&mut *tx, resume_id, copy.id).await?;
        copy_rows::<SkillRow>(&mut *tx, resume_id, copy.id).await?;
        copy_rows::<CertificationRow>(&mut *tx, resume_id, copy.id).await?;
        copy_rows::<ProjectRow>(&mut *tx, resume_id, copy.id).await?;
        tx.commit().await?;

        Ok(copy.into())
    }
}

#[async_trait]
impl ActivityLog for PgStore {
    async fn record_activity(
        &self,
        user_id: Uuid,
        activity: &NewActivity,
    ) -> Result<ActivityRecord, StoreError> {
        let row = sqlx::query_as::<_, ActivityRow>(
            r#"
            INSERT INTO activities (user_id, resume_id, activity_type, resume_title)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(activity.resume_id)
        .bind(activity.activity_type.as_str())
        .bind(&activity.resume_title)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn recent_activities(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            "SELECT * FROM activities WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ActivityRecord::try_from).collect()
    }
}

#[async_trait]
impl<S: SectionTable> SectionWriter<S> for PgStore {
    async fn create_row(&self, resume_id: Uuid, input: &S::Input) -> Result<S, StoreError> {
        Repository::<S>::new(&self.pool).create(resume_id, input).await
    }

    async fn update_row(
        &self,
        resume_id: Uuid,
        row_id: Uuid,
        input: &S::Input,
    ) -> Result<S, StoreError> {
        Repository::<S>::new(&self.pool)
            .update(resume_id, row_id, input)
            .await
    }

    async fn delete_row(&self, resume_id: Uuid, row_id: Uuid) -> Result<(), StoreError> {
        Repository::<S>::new(&self.pool).delete(resume_id, row_id).await
    }
}
