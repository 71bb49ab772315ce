//! Database rows and write payloads for the six resume section tables.
//!
//! Rows are what the store returns (always carrying a stable `id`); inputs are
//! what clients send on create/update and never carry one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonalInfoRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linkedin_url: Option<String>,
    pub professional_summary: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkExperienceRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub graduation_date: Option<NaiveDate>,
    pub gpa: Option<String>,
    pub relevant_coursework: Option<String>,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub skill_name: String,
    pub category: String,
    pub proficiency_level: Option<i32>,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CertificationRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub certification_name: String,
    pub issuing_organization: String,
    pub date_earned: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub is_verified: Option<bool>,
    pub certificate_url: Option<String>,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub project_name: String,
    pub description: Option<String>,
    pub role: Option<String>,
    pub duration: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Write payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfoInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linkedin_url: Option<String>,
    pub professional_summary: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperienceInput {
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationInput {
    pub school: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub graduation_date: Option<NaiveDate>,
    pub gpa: Option<String>,
    pub relevant_coursework: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillInput {
    pub skill_name: String,
    pub category: String,
    pub proficiency_level: Option<i32>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationInput {
    pub certification_name: String,
    pub issuing_organization: String,
    pub date_earned: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub certificate_url: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub project_name: String,
    pub description: Option<String>,
    pub role: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
}
