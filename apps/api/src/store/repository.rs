//! Generic section repository: one implementation of list/create/update/delete
//! shared by all six section tables.
//!
//! A table opts in by implementing [`SectionTable`]: its name, the columns a
//! client may write, and how to bind an input in column order. SQL is derived
//! from those declarations, so adding a column means touching one impl.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::document::SkillCategory;
use crate::models::sections::{
    CertificationInput, CertificationRow, EducationInput, EducationRow, PersonalInfoInput,
    PersonalInfoRow, ProjectInput, ProjectRow, SkillInput, SkillRow, WorkExperienceInput,
    WorkExperienceRow,
};
use crate::store::StoreError;

pub type SectionQuery<'q, S> = QueryAs<'q, Postgres, S, PgArguments>;

pub trait SectionTable:
    for<'r> FromRow<'r, PgRow> + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;
    /// Writable columns, in the order `bind_input` binds them.
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str = "display_order ASC NULLS LAST, created_at ASC";
    /// At most one row per resume.
    const SINGLETON: bool = false;

    type Input: DeserializeOwned + Serialize + Send + Sync + 'static;

    fn validate(_input: &Self::Input) -> Result<(), String> {
        Ok(())
    }

    fn bind_input<'q>(query: SectionQuery<'q, Self>, input: &Self::Input) -> SectionQuery<'q, Self>;

    fn row_id(&self) -> Uuid;
}

pub fn select_sql<S: SectionTable>() -> String {
    format!(
        "SELECT * FROM {} WHERE resume_id = $1 ORDER BY {}",
        S::TABLE,
        S::ORDER_BY
    )
}

/// `$1` is the resume id; input columns follow from `$2`. A singleton table
/// inserts nothing when the resume already has a row.
pub fn insert_sql<S: SectionTable>() -> String {
    let placeholders: Vec<String> = (0..S::COLUMNS.len())
        .map(|i| format!("${}", i + 2))
        .collect();
    if S::SINGLETON {
        return format!(
            "INSERT INTO {table} (resume_id, {}) SELECT $1, {} \
             WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE resume_id = $1) RETURNING *",
            S::COLUMNS.join(", "),
            placeholders.join(", "),
            table = S::TABLE
        );
    }
    format!(
        "INSERT INTO {} (resume_id, {}) VALUES ($1, {}) RETURNING *",
        S::TABLE,
        S::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

/// Copies every row of resume `$1` onto resume `$2`; ids and timestamps are fresh.
pub fn copy_sql<S: SectionTable>() -> String {
    let columns = S::COLUMNS.join(", ");
    format!(
        "INSERT INTO {table} (resume_id, {columns}) SELECT $2, {columns} FROM {table} WHERE resume_id = $1",
        table = S::TABLE
    )
}

fn already_exists<S: SectionTable>(resume_id: Uuid) -> StoreError {
    StoreError::Invalid(format!(
        "{} already exists for resume {resume_id}; update it instead",
        S::TABLE
    ))
}

/// `$1` is the row id, `$2` the resume id; input columns follow from `$3`.
pub fn update_sql<S: SectionTable>() -> String {
    let assignments: Vec<String> = S::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 3))
        .collect();
    format!(
        "UPDATE {} SET {}, updated_at = NOW() WHERE id = $1 AND resume_id = $2 RETURNING *",
        S::TABLE,
        assignments.join(", ")
    )
}

pub fn delete_sql<S: SectionTable>() -> String {
    format!("DELETE FROM {} WHERE id = $1 AND resume_id = $2", S::TABLE)
}

/// Runs [`copy_sql`] on `conn`, usually inside the duplicating transaction.
pub async fn copy_rows<S: SectionTable>(
    conn: &mut PgConnection,
    from_resume: Uuid,
    to_resume: Uuid,
) -> Result<u64, StoreError> {
    let result = sqlx::query(&copy_sql::<S>())
        .bind(from_resume)
        .bind(to_resume)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Row access for one section table. Callers are responsible for checking that
/// the resume belongs to the requesting user before writing.
pub struct Repository<'a, S> {
    pool: &'a PgPool,
    _section: PhantomData<S>,
}

impl<'a, S: SectionTable> Repository<'a, S> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            _section: PhantomData,
        }
    }

    pub async fn list_for_resume(&self, resume_id: Uuid) -> Result<Vec<S>, StoreError> {
        let sql = select_sql::<S>();
        Ok(sqlx::query_as::<_, S>(&sql)
            .bind(resume_id)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn create(&self, resume_id: Uuid, input: &S::Input) -> Result<S, StoreError> {
        S::validate(input).map_err(StoreError::Invalid)?;

        let sql = insert_sql::<S>();
        let query = sqlx::query_as::<_, S>(&sql).bind(resume_id);
        match S::bind_input(query, input).fetch_optional(self.pool).await {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(already_exists::<S>(resume_id)),
            // A unique index on a singleton's resume_id catches concurrent inserts.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(already_exists::<S>(resume_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(
        &self,
        resume_id: Uuid,
        row_id: Uuid,
        input: &S::Input,
    ) -> Result<S, StoreError> {
        S::validate(input).map_err(StoreError::Invalid)?;

        let sql = update_sql::<S>();
        let query = sqlx::query_as::<_, S>(&sql).bind(row_id).bind(resume_id);
        S::bind_input(query, input)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StoreError::RowNotFound(row_id))
    }

    pub async fn delete(&self, resume_id: Uuid, row_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(&delete_sql::<S>())
            .bind(row_id)
            .bind(resume_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound(row_id));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section tables
// ────────────────────────────────────────────────────────────────────────────

fn require(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    Ok(())
}

impl SectionTable for PersonalInfoRow {
    const TABLE: &'static str = "personal_info";
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "phone",
        "address",
        "linkedin_url",
        "professional_summary",
        "photo_url",
    ];
    const ORDER_BY: &'static str = "created_at ASC";
    const SINGLETON: bool = true;

    type Input = PersonalInfoInput;

    fn bind_input<'q>(query: SectionQuery<'q, Self>, input: &Self::Input) -> SectionQuery<'q, Self> {
        query
            .bind(input.first_name.clone())
            .bind(input.last_name.clone())
            .bind(input.email.clone())
            .bind(input.phone.clone())
            .bind(input.address.clone())
            .bind(input.linkedin_url.clone())
            .bind(input.professional_summary.clone())
            .bind(input.photo_url.clone())
    }

    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl SectionTable for WorkExperienceRow {
    const TABLE: &'static str = "work_experience";
    const COLUMNS: &'static [&'static str] = &[
        "job_title",
        "company",
        "location",
        "start_date",
        "end_date",
        "is_current",
        "description",
        "display_order",
    ];

    type Input = WorkExperienceInput;

    fn validate(input: &Self::Input) -> Result<(), String> {
        require(&input.job_title, "job_title")?;
        require(&input.company, "company")?;
        if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
            if !input.is_current && end < start {
                return Err("end_date cannot be before start_date".to_string());
            }
        }
        Ok(())
    }

    fn bind_input<'q>(query: SectionQuery<'q, Self>, input: &Self::Input) -> SectionQuery<'q, Self> {
        // A current position has no end date.
        let end_date = if input.is_current { None } else { input.end_date };
        query
            .bind(input.job_title.clone())
            .bind(input.company.clone())
            .bind(input.location.clone())
            .bind(input.start_date)
            .bind(end_date)
            .bind(input.is_current)
            .bind(input.description.clone())
            .bind(input.display_order)
    }

    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl SectionTable for EducationRow {
    const TABLE: &'static str = "education";
    const COLUMNS: &'static [&'static str] = &[
        "school",
        "degree",
        "field_of_study",
        "graduation_date",
        "gpa",
        "relevant_coursework",
        "display_order",
    ];

    type Input = EducationInput;

    fn validate(input: &Self::Input) -> Result<(), String> {
        require(&input.school, "school")?;
        require(&input.degree, "degree")
    }

    fn bind_input<'q>(query: SectionQuery<'q, Self>, input: &Self::Input) -> SectionQuery<'q, Self> {
        query
            .bind(input.school.clone())
            .bind(input.degree.clone())
            .bind(input.field_of_study.clone())
            .bind(input.graduation_date)
            .bind(input.gpa.clone())
            .bind(input.relevant_coursework.clone())
            .bind(input.display_order)
    }

    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl SectionTable for SkillRow {
    const TABLE: &'static str = "skills";
    const COLUMNS: &'static [&'static str] = &[
        "skill_name",
        "category",
        "proficiency_level",
        "display_order",
    ];

    type Input = SkillInput;

    fn validate(input: &Self::Input) -> Result<(), String> {
        require(&input.skill_name, "skill_name")?;
        if SkillCategory::parse(&input.category).is_none() {
            return Err(format!(
                "category must be one of technical, soft, language (got '{}')",
                input.category
            ));
        }
        match input.proficiency_level {
            Some(level) if !(0..=100).contains(&level) => {
                Err(format!("proficiency_level must be within 0..=100 (got {level})"))
            }
            _ => Ok(()),
        }
    }

    fn bind_input<'q>(query: SectionQuery<'q, Self>, input: &Self::Input) -> SectionQuery<'q, Self> {
        let category = SkillCategory::parse(&input.category)
            .unwrap_or_default()
            .as_str();
        query
            .bind(input.skill_name.clone())
            .bind(category)
            .bind(input.proficiency_level)
            .bind(input.display_order)
    }

    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl SectionTable for CertificationRow {
    const TABLE: &'static str = "certifications";
    const COLUMNS: &'static [&'static str] = &[
        "certification_name",
        "issuing_organization",
        "date_earned",
        "expiration_date",
        "credential_id",
        "is_verified",
        "certificate_url",
        "display_order",
    ];

    type Input = CertificationInput;

    fn validate(input: &Self::Input) -> Result<(), String> {
        require(&input.certification_name, "certification_name")?;
        require(&input.issuing_organization, "issuing_organization")
    }

    fn bind_input<'q>(query: SectionQuery<'q, Self>, input: &Self::Input) -> SectionQuery<'q, Self> {
        query
            .bind(input.certification_name.clone())
            .bind(input.issuing_organization.clone())
            .bind(input.date_earned)
            .bind(input.expiration_date)
            .bind(input.credential_id.clone())
            .bind(input.is_verified)
            .bind(input.certificate_url.clone())
            .bind(input.display_order)
    }

    fn row_id(&self) -> Uuid {
        self.id
    }
}

impl SectionTable for ProjectRow {
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "project_name",
        "description",
        "role",
        "duration",
        "technologies",
        "live_url",
        "github_url",
        "image_url",
        "display_order",
    ];

    type Input = ProjectInput;

    fn validate(input: &Self::Input) -> Result<(), String> {
        require(&input.project_name, "project_name")
    }

    fn bind_input<'q>(query: SectionQuery<'q, Self>, input: &Self::Input) -> SectionQuery<'q, Self> {
        let technologies: Vec<String> = input
            .technologies
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        query
            .bind(input.project_name.clone())
            .bind(input.description.clone())
            .bind(input.role.clone())
            .bind(input.duration.clone())
            .bind(technologies)
            .bind(input.live_url.clone())
            .bind(input.github_url.clone())
            .bind(input.image_url.clone())
            .bind(input.display_order)
    }

    fn row_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_numbers_placeholders_after_resume_id() {
        assert_eq!(
            insert_sql::<SkillRow>(),
            "INSERT INTO skills (resume_id, skill_name, category, proficiency_level, display_order) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *"
        );
    }

    #[test]
    fn test_update_sql_scopes_by_row_and_resume() {
        let sql = update_sql::<SkillRow>();
        assert!(sql.starts_with("UPDATE skills SET skill_name = $3, category = $4"));
        assert!(sql.contains("display_order = $6, updated_at = NOW()"));
        assert!(sql.ends_with("WHERE id = $1 AND resume_id = $2 RETURNING *"));
    }

    #[test]
    fn test_select_sql_orders_personal_info_without_display_order() {
        assert_eq!(
            select_sql::<PersonalInfoRow>(),
            "SELECT * FROM personal_info WHERE resume_id = $1 ORDER BY created_at ASC"
        );
        assert!(select_sql::<ProjectRow>().ends_with("display_order ASC NULLS LAST, created_at ASC"));
    }

    #[test]
    fn test_singleton_insert_is_guarded_in_sql() {
        assert_eq!(
            insert_sql::<PersonalInfoRow>(),
            "INSERT INTO personal_info (resume_id, first_name, last_name, email, phone, address, \
             linkedin_url, professional_summary, photo_url) SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9 \
             WHERE NOT EXISTS (SELECT 1 FROM personal_info WHERE resume_id = $1) RETURNING *"
        );
    }

    #[test]
    fn test_copy_sql_moves_writable_columns_only() {
        assert_eq!(
            copy_sql::<SkillRow>(),
            "INSERT INTO skills (resume_id, skill_name, category, proficiency_level, display_order) \
             SELECT $2, skill_name, category, proficiency_level, display_order FROM skills WHERE resume_id = $1"
        );
    }

    #[test]
    fn test_delete_sql() {
        assert_eq!(
            delete_sql::<CertificationRow>(),
            "DELETE FROM certifications WHERE id = $1 AND resume_id = $2"
        );
    }

    #[test]
    fn test_skill_validation() {
        let mut input = SkillInput {
            skill_name: "Rust".into(),
            category: "Technical".into(),
            proficiency_level: Some(80),
            display_order: None,
        };
        assert!(SkillRow::validate(&input).is_ok());

        input.proficiency_level = Some(101);
        assert!(SkillRow::validate(&input).is_err());

        input.proficiency_level = None;
        input.category = "hobby".into();
        assert!(SkillRow::validate(&input).is_err());
    }

    #[test]
    fn test_work_experience_validation_rejects_inverted_dates() {
        let input = WorkExperienceInput {
            job_title: "Engineer".into(),
            company: "Acme".into(),
            location: None,
            start_date: chrono::NaiveDate::from_ymd_opt(2022, 1, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2021, 1, 1),
            is_current: false,
            description: None,
            display_order: Some(0),
        };
        assert!(WorkExperienceRow::validate(&input).is_err());

        let blank_title = WorkExperienceInput {
            job_title: "  ".into(),
            end_date: None,
            ..input
        };
        assert!(WorkExperienceRow::validate(&blank_title).is_err());
    }

    #[test]
    fn test_every_table_declares_columns() {
        assert_eq!(PersonalInfoRow::COLUMNS.len(), 8);
        assert_eq!(WorkExperienceRow::COLUMNS.len(), 8);
        assert_eq!(EducationRow::COLUMNS.len(), 7);
        assert_eq!(SkillRow::COLUMNS.len(), 4);
        assert_eq!(CertificationRow::COLUMNS.len(), 8);
        assert_eq!(ProjectRow::COLUMNS.len(), 9);
    }
}
