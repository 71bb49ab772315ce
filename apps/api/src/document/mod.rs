//! The normalized resume aggregate passed through the render pipeline.
//!
//! A `ResumeDocument` is assembled fresh for every preview or export and is only
//! ever read by renderers. List sections keep the order the store returned, but
//! consumers must go through [`in_display_order`] rather than trust it: display
//! order is client-assigned and may contain gaps or nulls.

pub mod aggregator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::sections::{
    CertificationRow, EducationRow, PersonalInfoRow, ProjectRow, SkillRow, WorkExperienceRow,
};

/// Proficiency used when a stored skill has none.
pub const DEFAULT_PROFICIENCY: u8 = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub personal_info: Option<PersonalInfo>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub network_url: Option<String>,
    pub summary: Option<String>,
    pub photo_url: Option<String>,
}

impl PersonalInfo {
    /// "First Last", skipping whichever half is blank.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True when at least one identifying field (first name, last name, email) is filled in.
    pub fn has_identity(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email]
            .into_iter()
            .any(|field| non_blank(field.as_deref()).is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub id: Option<Uuid>,
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Ignored for display when `is_current` is set.
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: Option<Uuid>,
    pub institution: String,
    pub credential: String,
    pub field_of_study: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    #[default]
    Technical,
    Soft,
    Language,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [Self::Technical, Self::Soft, Self::Language];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "technical" => Some(Self::Technical),
            "soft" => Some(Self::Soft),
            "language" => Some(Self::Language),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Soft => "soft",
            Self::Language => "language",
        }
    }
}

/// Display band for a 0–100 proficiency. Bands are half-open on the right, so the
/// boundaries 25, 50 and 75 belong to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn from_proficiency(proficiency: u8) -> Self {
        match proficiency {
            0..=24 => Self::Beginner,
            25..=49 => Self::Intermediate,
            50..=74 => Self::Advanced,
            _ => Self::Expert,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

/// Human label for a proficiency value, as shown next to skills in the preview.
pub fn skill_level_text(proficiency: u8) -> &'static str {
    SkillLevel::from_proficiency(proficiency).label()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: Option<Uuid>,
    pub name: String,
    pub category: SkillCategory,
    /// Always within 0..=100.
    pub proficiency: u8,
    pub display_order: Option<i32>,
}

impl Skill {
    pub fn level(&self) -> SkillLevel {
        SkillLevel::from_proficiency(self.proficiency)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: Option<Uuid>,
    pub name: String,
    pub issuer: String,
    pub date_earned: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub verified: bool,
    pub certificate_url: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub role: Option<String>,
    pub duration: Option<String>,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Ordering
// ────────────────────────────────────────────────────────────────────────────

/// Section items that carry a client-assigned display position.
pub trait DisplayOrdered {
    fn display_order(&self) -> Option<i32>;
}

macro_rules! impl_display_ordered {
    ($($ty:ty),* $(,)?) => {
        $(impl DisplayOrdered for $ty {
            fn display_order(&self) -> Option<i32> {
                self.display_order
            }
        })*
    };
}

impl_display_ordered!(WorkExperience, Education, Skill, Certification, Project);

/// Stable sort by display order ascending, unordered items last.
pub fn in_display_order<T: DisplayOrdered>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| match item.display_order() {
        Some(order) => (0, order),
        None => (1, 0),
    });
    sorted
}

/// Returns the trimmed value if it has any content.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Row conversions
// ────────────────────────────────────────────────────────────────────────────

impl From<PersonalInfoRow> for PersonalInfo {
    fn from(row: PersonalInfoRow) -> Self {
        Self {
            id: Some(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            network_url: row.linkedin_url,
            summary: row.professional_summary,
            photo_url: row.photo_url,
        }
    }
}

impl From<WorkExperienceRow> for WorkExperience {
    fn from(row: WorkExperienceRow) -> Self {
        Self {
            id: Some(row.id),
            title: row.job_title,
            organization: row.company,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            is_current: row.is_current.unwrap_or(false),
            description: row.description,
            display_order: row.display_order,
        }
    }
}

impl From<EducationRow> for Education {
    fn from(row: EducationRow) -> Self {
        Self {
            id: Some(row.id),
            institution: row.school,
            credential: row.degree,
            field_of_study: row.field_of_study,
            completion_date: row.graduation_date,
            grade: row.gpa,
            display_order: row.display_order,
        }
    }
}

impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        let proficiency = row
            .proficiency_level
            .map(|p| p.clamp(0, 100) as u8)
            .unwrap_or(DEFAULT_PROFICIENCY);
        Self {
            id: Some(row.id),
            name: row.skill_name,
            category: SkillCategory::parse(&row.category).unwrap_or_default(),
            proficiency,
            display_order: row.display_order,
        }
    }
}

impl From<CertificationRow> for Certification {
    fn from(row: CertificationRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.certification_name,
            issuer: row.issuing_organization,
            date_earned: row.date_earned,
            expiration_date: row.expiration_date,
            credential_id: row.credential_id,
            verified: row.is_verified.unwrap_or(false),
            certificate_url: row.certificate_url,
            display_order: row.display_order,
        }
    }
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.project_name,
            description: row.description,
            role: row.role,
            duration: row.duration,
            technologies: row.technologies.unwrap_or_default(),
            live_url: row.live_url,
            source_url: row.github_url,
            image_url: row.image_url,
            display_order: row.display_order,
        }
    }
}
