//! Format-neutral outline of a resume.
//!
//! Section order, omission of empty sections, date formatting and the
//! "Present" rule live here once. Renderers only decide how an outline looks.

use chrono::NaiveDate;
use serde::Serialize;

use crate::document::{
    in_display_order, non_blank, Certification, Education, PersonalInfo, Project, ResumeDocument,
    WorkExperience,
};

pub const PRESENT: &str = "Present";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    WorkExperience,
    Education,
    Skills,
    Certifications,
    Projects,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Summary => "Professional Summary",
            Self::WorkExperience => "Work Experience",
            Self::Education => "Education",
            Self::Skills => "Skills",
            Self::Certifications => "Certifications",
            Self::Projects => "Projects",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// Anchor text in the HTML document.
    pub label: &'static str,
    /// Prefix in the plain-text and word-processor documents.
    pub short_label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryBlock {
    pub title: String,
    pub subtitle: Option<String>,
    pub date: Option<String>,
    pub details: Vec<String>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum SectionBody {
    Paragraphs(Vec<String>),
    Entries(Vec<EntryBlock>),
    Badges(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineSection {
    pub kind: SectionKind,
    pub title: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub full_name: String,
    pub contact: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outline {
    pub header: HeaderBlock,
    pub sections: Vec<OutlineSection>,
}

impl Outline {
    pub fn build(document: &ResumeDocument) -> Self {
        let header = document
            .personal_info
            .as_ref()
            .map(header_block)
            .unwrap_or_default();

        let summary = document
            .personal_info
            .as_ref()
            .map(|info| lines(info.summary.as_deref()))
            .unwrap_or_default();

        let experience = in_display_order(&document.work_experience)
            .into_iter()
            .map(experience_entry)
            .collect();
        let education = in_display_order(&document.education)
            .into_iter()
            .map(education_entry)
            .collect();
        let skills = in_display_order(&document.skills)
            .into_iter()
            .filter_map(|skill| non_blank(Some(skill.name.as_str())).map(str::to_string))
            .collect();
        let certifications = in_display_order(&document.certifications)
            .into_iter()
            .map(certification_entry)
            .collect();
        let projects = in_display_order(&document.projects)
            .into_iter()
            .map(project_entry)
            .collect();

        let candidates = [
            (SectionKind::Summary, SectionBody::Paragraphs(summary)),
            (SectionKind::WorkExperience, SectionBody::Entries(experience)),
            (SectionKind::Education, SectionBody::Entries(education)),
            (SectionKind::Skills, SectionBody::Badges(skills)),
            (SectionKind::Certifications, SectionBody::Entries(certifications)),
            (SectionKind::Projects, SectionBody::Entries(projects)),
        ];

        let sections = candidates
            .into_iter()
            .filter(|(_, body)| !body.is_empty())
            .map(|(kind, body)| OutlineSection {
                kind,
                title: kind.title(),
                body,
            })
            .collect();

        Self { header, sections }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&OutlineSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

impl SectionBody {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Paragraphs(items) | Self::Badges(items) => items.is_empty(),
            Self::Entries(items) => items.is_empty(),
        }
    }
}

/// "Jan 2020" style month-year.
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Start and end joined with " - ". A current entry always ends in "Present",
/// whatever end date is stored.
pub fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>, current: bool) -> Option<String> {
    let start = start.map(format_month_year);
    let end = if current {
        Some(PRESENT.to_string())
    } else {
        end.map(format_month_year)
    };
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{start} - {end}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

fn header_block(info: &PersonalInfo) -> HeaderBlock {
    let contact = [&info.email, &info.phone, &info.address, &info.network_url]
        .into_iter()
        .filter_map(|field| non_blank(field.as_deref()).map(str::to_string))
        .collect();
    HeaderBlock {
        full_name: info.full_name(),
        contact,
    }
}

fn lines(text: Option<&str>) -> Vec<String> {
    text.map(|t| {
        t.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn joined(parts: &[Option<&str>], separator: &str) -> Option<String> {
    let present: Vec<&str> = parts.iter().filter_map(|p| non_blank(*p)).collect();
    (!present.is_empty()).then(|| present.join(separator))
}

/// Only absolute http(s) links make it into an artifact.
fn web_link(label: &'static str, short_label: &'static str, url: Option<&str>) -> Option<Link> {
    let url = non_blank(url)?;
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")).then(|| Link {
        label,
        short_label,
        url: url.to_string(),
    })
}

fn experience_entry(job: &WorkExperience) -> EntryBlock {
    EntryBlock {
        title: job.title.trim().to_string(),
        subtitle: joined(&[Some(job.organization.as_str()), job.location.as_deref()], ", "),
        date: date_range(job.start_date, job.end_date, job.is_current),
        details: lines(job.description.as_deref()),
        links: Vec::new(),
    }
}

fn education_entry(education: &Education) -> EntryBlock {
    let credential = education.credential.trim();
    let title = match non_blank(education.field_of_study.as_deref()) {
        Some(field) if credential.is_empty() => field.to_string(),
        Some(field) => format!("{credential} in {field}"),
        None => credential.to_string(),
    };
    EntryBlock {
        title,
        subtitle: non_blank(Some(education.institution.as_str())).map(str::to_string),
        date: education.completion_date.map(format_month_year),
        details: non_blank(education.grade.as_deref())
            .map(|gpa| vec![format!("GPA: {gpa}")])
            .unwrap_or_default(),
        links: Vec::new(),
    }
}

fn certification_entry(cert: &Certification) -> EntryBlock {
    let mut details = Vec::new();
    if let Some(id) = non_blank(cert.credential_id.as_deref()) {
        details.push(format!("Credential ID: {id}"));
    }
    if let Some(expires) = cert.expiration_date {
        details.push(format!("Expires: {}", format_month_year(expires)));
    }
    let earned = cert.date_earned.map(format_month_year);
    EntryBlock {
        title: cert.name.trim().to_string(),
        subtitle: joined(&[Some(cert.issuer.as_str()), earned.as_deref()], " - "),
        date: None,
        details,
        links: web_link("Certificate", "Certificate", cert.certificate_url.as_deref())
            .into_iter()
            .collect(),
    }
}

fn project_entry(project: &Project) -> EntryBlock {
    let mut details = lines(project.description.as_deref());
    let technologies: Vec<&str> = project
        .technologies
        .iter()
        .filter_map(|t| non_blank(Some(t.as_str())))
        .collect();
    if !technologies.is_empty() {
        details.push(format!("Technologies: {}", technologies.join(", ")));
    }
    EntryBlock {
        title: project.name.trim().to_string(),
        subtitle: joined(&[project.role.as_deref(), project.duration.as_deref()], " | "),
        date: None,
        details,
        links: [
            web_link("Live Demo", "Live", project.live_url.as_deref()),
            web_link("Source", "Source", project.source_url.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}
