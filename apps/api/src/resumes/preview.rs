//! Interactive preview bundle.
//!
//! The browser renders the preview itself from screen-style tokens, so this
//! only resolves the template and groups skills the way the preview lays them
//! out.

use serde::Serialize;
use uuid::Uuid;

use crate::document::aggregator::aggregate;
use crate::document::{
    in_display_order, non_blank, skill_level_text, ResumeDocument, Skill, SkillCategory, SkillLevel,
};
use crate::store::{ResumeSource, StoreError};
use crate::templates::registry::{self, Template};
use crate::templates::styles::{resolve_template_styles, ScreenStyle};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillBadge {
    pub name: String,
    pub proficiency: u8,
    pub level: SkillLevel,
    pub level_text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGroup {
    pub category: SkillCategory,
    pub skills: Vec<SkillBadge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewBundle {
    pub template: &'static Template,
    pub screen_style: ScreenStyle,
    pub document: ResumeDocument,
    pub skill_groups: Vec<SkillGroup>,
}

/// Skills partitioned by category in technical, soft, language order. Empty
/// groups are left out; display order is kept within a group.
pub fn group_skills(skills: &[Skill]) -> Vec<SkillGroup> {
    let ordered = in_display_order(skills);
    SkillCategory::ALL
        .iter()
        .filter_map(|&category| {
            let badges: Vec<SkillBadge> = ordered
                .iter()
                .filter(|skill| skill.category == category)
                .map(|skill| SkillBadge {
                    name: skill.name.clone(),
                    proficiency: skill.proficiency,
                    level: skill.level(),
                    level_text: skill_level_text(skill.proficiency),
                })
                .collect();
            (!badges.is_empty()).then_some(SkillGroup {
                category,
                skills: badges,
            })
        })
        .collect()
}

/// `template_override` wins over the resume's stored template when non-blank.
pub async fn preview<S>(
    source: &S,
    user_id: Uuid,
    resume_id: Uuid,
    template_override: Option<&str>,
) -> Result<PreviewBundle, StoreError>
where
    S: ResumeSource + ?Sized,
{
    let aggregated = aggregate(source, user_id, resume_id).await?;
    let template_id = non_blank(template_override).unwrap_or(aggregated.meta.template_id.as_str());
    let template = registry::resolve_or_default(template_id);

    Ok(PreviewBundle {
        template,
        screen_style: resolve_template_styles(template).screen,
        skill_groups: group_skills(&aggregated.document.skills),
        document: aggregated.document,
    })
}
