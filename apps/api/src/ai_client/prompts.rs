// Prompt construction for each suggestion kind.
// The gateway is model-agnostic; only the wording below decides what comes back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    #[serde(alias = "professional-summary")]
    ProfessionalSummary,
    #[serde(alias = "job-description")]
    JobDescription,
    #[serde(alias = "skill-suggestions")]
    SkillSuggestions,
    #[serde(alias = "resume-optimization")]
    OptimizeResume,
}

/// Free-form context from the editor. Known keys are typed; anything else is
/// kept in `extra` and still reaches the optimize prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Years of experience; clients send either a number or a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub existing_skills: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

pub const SUMMARY_SYSTEM: &str = "You are a professional resume writer. \
    Create compelling professional summaries that highlight key achievements and skills.";

pub const JOB_DESCRIPTION_SYSTEM: &str = "You are a resume expert. \
    Improve job descriptions to be more impactful and ATS-friendly using action verbs \
    and quantifiable achievements.";

pub const SKILLS_SYSTEM: &str = "You are a career advisor. \
    Suggest relevant skills based on job roles and industry trends.";

pub const OPTIMIZE_SYSTEM: &str = "You are an ATS optimization expert. \
    Provide specific recommendations to improve resume ATS compatibility and overall impact.";

fn or_na(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

fn list_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

fn experience_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn build_prompt(
    kind: SuggestionKind,
    context: &SuggestionContext,
) -> Result<Prompt, serde_json::Error> {
    let prompt = match kind {
        SuggestionKind::ProfessionalSummary => Prompt {
            system: SUMMARY_SYSTEM,
            user: format!(
                "Based on the following information, write a professional summary (3-4 sentences):\n\
                 Job Title: {}\n\
                 Years of Experience: {}\n\
                 Key Skills: {}\n\
                 Industry: {}",
                or_na(context.job_title.as_deref()),
                experience_text(context.experience.as_ref()),
                list_or(&context.skills, NOT_AVAILABLE),
                or_na(context.industry.as_deref()),
            ),
        },
        SuggestionKind::JobDescription => Prompt {
            system: JOB_DESCRIPTION_SYSTEM,
            user: format!(
                "Improve this job description to be more impactful and ATS-friendly. \
                 Keep it concise (3-5 bullet points):\n\
                 Job Title: {}\n\
                 Company: {}\n\
                 Current Description: {}",
                or_na(context.job_title.as_deref()),
                or_na(context.company.as_deref()),
                or_na(context.description.as_deref()),
            ),
        },
        SuggestionKind::SkillSuggestions => Prompt {
            system: SKILLS_SYSTEM,
            user: format!(
                "Suggest 8-10 relevant skills for someone with this background:\n\
                 Job Title: {}\n\
                 Industry: {}\n\
                 Current Skills: {}\n\
                 Return only the skill names as a comma-separated list.",
                or_na(context.job_title.as_deref()),
                or_na(context.industry.as_deref()),
                list_or(&context.existing_skills, "None listed"),
            ),
        },
        SuggestionKind::OptimizeResume => Prompt {
            system: OPTIMIZE_SYSTEM,
            user: format!(
                "Review this resume section and provide 3-5 specific improvement suggestions:\n{}",
                serde_json::to_string_pretty(context)?
            ),
        },
    };
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_accepts_both_spellings() {
        let snake: SuggestionKind = serde_json::from_str("\"optimize_resume\"").unwrap();
        let kebab: SuggestionKind = serde_json::from_str("\"resume-optimization\"").unwrap();
        assert_eq!(snake, kebab);
        assert!(serde_json::from_str::<SuggestionKind>("\"haiku\"").is_err());
    }

    #[test]
    fn test_summary_prompt_fills_missing_fields() {
        let context: SuggestionContext =
            serde_json::from_value(json!({ "jobTitle": "SRE", "experience": 7 })).unwrap();
        let prompt = build_prompt(SuggestionKind::ProfessionalSummary, &context).unwrap();
        assert_eq!(prompt.system, SUMMARY_SYSTEM);
        assert!(prompt.user.contains("Job Title: SRE"));
        assert!(prompt.user.contains("Years of Experience: 7"));
        assert!(prompt.user.contains("Key Skills: N/A"));
        assert!(prompt.user.contains("Industry: N/A"));
    }

    #[test]
    fn test_skill_prompt_lists_existing_skills() {
        let context = SuggestionContext {
            existing_skills: vec!["Rust".into(), "SQL".into()],
            ..Default::default()
        };
        let prompt = build_prompt(SuggestionKind::SkillSuggestions, &context).unwrap();
        assert!(prompt.user.contains("Current Skills: Rust, SQL"));

        let empty = build_prompt(SuggestionKind::SkillSuggestions, &SuggestionContext::default())
            .unwrap();
        assert!(empty.user.contains("Current Skills: None listed"));
    }

    #[test]
    fn test_optimize_prompt_embeds_unknown_keys() {
        let context: SuggestionContext = serde_json::from_value(json!({
            "jobTitle": "Designer",
            "section": "summary",
            "content": "Makes things pretty"
        }))
        .unwrap();
        assert_eq!(context.extra.len(), 2);
        let prompt = build_prompt(SuggestionKind::OptimizeResume, &context).unwrap();
        assert!(prompt.user.contains("\"section\": \"summary\""));
        assert!(prompt.user.contains("\"jobTitle\": \"Designer\""));
    }
}
