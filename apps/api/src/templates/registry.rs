//! Template Registry: the fixed catalog of resume templates.
//!
//! Template ids follow `<family>-<variant>`. Only the family drives styling;
//! variants exist for catalog variety. Lookups are exact and case-sensitive.

use serde::{Deserialize, Serialize};

/// Category sentinel that lists the whole catalog.
pub const ALL_CATEGORIES: &str = "All";

pub const TEMPLATE_CATEGORIES: [&str; 6] = [
    ALL_CATEGORIES,
    "Professional",
    "Modern",
    "Simple",
    "Creative",
    "Executive",
];

/// Where unknown template ids land.
pub const DEFAULT_TEMPLATE_ID: &str = "professional-classic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateFamily {
    Professional,
    Modern,
    Simple,
    Creative,
    Executive,
}

impl TemplateFamily {
    pub const DEFAULT: TemplateFamily = TemplateFamily::Professional;

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "professional" => Some(Self::Professional),
            "modern" => Some(Self::Modern),
            "simple" => Some(Self::Simple),
            "creative" => Some(Self::Creative),
            "executive" => Some(Self::Executive),
            _ => None,
        }
    }

    /// Family named by the part of `template_id` before the first `-`.
    /// Anything unrecognized, including empty or malformed ids, is the default family.
    pub fn from_template_id(template_id: &str) -> Self {
        template_id
            .split('-')
            .next()
            .and_then(Self::from_prefix)
            .unwrap_or(Self::DEFAULT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub font_family: &'static str,
}

impl Template {
    pub fn family(&self) -> TemplateFamily {
        TemplateFamily::from_template_id(self.id)
    }
}

macro_rules! template {
    ($id:literal, $name:literal, $category:literal, $description:literal, $color:literal, $font:literal) => {
        Template {
            id: $id,
            name: $name,
            category: $category,
            description: $description,
            color: $color,
            font_family: $font,
        }
    };
}

static TEMPLATES: [Template; 15] = [
    template!("professional-classic", "Classic Professional", "Professional", "Clean, ATS-friendly layout for corporate roles", "blue", "system-ui"),
    template!("professional-formal", "Formal Professional", "Professional", "Traditional layout for conservative industries", "navy", "serif"),
    template!("professional-tech", "Tech Professional", "Professional", "Technical layout for IT and engineering roles", "slate", "monospace"),
    template!("modern-bold", "Bold Modern", "Modern", "Contemporary design with bold typography", "purple", "sans-serif"),
    template!("modern-minimal", "Minimal Modern", "Modern", "Sleek layout with plenty of white space", "teal", "system-ui"),
    template!("modern-gradient", "Gradient Modern", "Modern", "Subtle gradient accents", "indigo", "sans-serif"),
    template!("simple-clean", "Clean Simple", "Simple", "Minimal layout focused on content", "gray", "system-ui"),
    template!("simple-classic", "Classic Simple", "Simple", "No-frills design that lets experience speak", "black", "serif"),
    template!("simple-elegant", "Elegant Simple", "Simple", "Simple but refined", "charcoal", "sans-serif"),
    template!("creative-vibrant", "Vibrant Creative", "Creative", "Bold colors for creative industries", "orange", "sans-serif"),
    template!("creative-artistic", "Artistic Creative", "Creative", "Distinctive layout for designers and artists", "pink", "display"),
    template!("creative-modern", "Modern Creative", "Creative", "Contemporary design with creative flair", "cyan", "sans-serif"),
    template!("executive-premium", "Premium Executive", "Executive", "Polished design for C-level positions", "gold", "serif"),
    template!("executive-elegant", "Elegant Executive", "Executive", "Refined layout for senior leadership", "burgundy", "serif"),
    template!("executive-professional", "Executive Professional", "Executive", "Authoritative design for executive roles", "navy", "system-ui"),
];

pub fn catalog() -> &'static [Template] {
    &TEMPLATES
}

pub fn resolve(template_id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == template_id)
}

/// Fails closed: unknown ids resolve to the default template.
pub fn resolve_or_default(template_id: &str) -> &'static Template {
    resolve(template_id).unwrap_or_else(default_template)
}

pub fn default_template() -> &'static Template {
    TEMPLATES
        .iter()
        .find(|t| t.id == DEFAULT_TEMPLATE_ID)
        .unwrap_or(&TEMPLATES[0])
}

pub fn list_by_category(category: &str) -> Vec<&'static Template> {
    if category == ALL_CATEGORIES {
        return TEMPLATES.iter().collect();
    }
    TEMPLATES.iter().filter(|t| t.category == category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_exact_and_case_sensitive() {
        assert_eq!(resolve("modern-bold").unwrap().name, "Bold Modern");
        assert!(resolve("Modern-Bold").is_none());
        assert!(resolve("modern").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_unknown_id_falls_back_to_default() {
        assert_eq!(resolve_or_default("bogus-unknown").id, DEFAULT_TEMPLATE_ID);
    }

    #[test]
    fn test_list_by_category() {
        assert_eq!(list_by_category(ALL_CATEGORIES).len(), 15);
        let executive = list_by_category("Executive");
        assert_eq!(executive.len(), 3);
        assert!(executive.iter().all(|t| t.family() == TemplateFamily::Executive));
        assert!(list_by_category("executive").is_empty());
    }

    #[test]
    fn test_every_category_has_templates_and_ids_are_unique() {
        for category in TEMPLATE_CATEGORIES.iter().skip(1) {
            assert_eq!(list_by_category(category).len(), 3, "{category}");
        }
        let mut ids: Vec<&str> = catalog().iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_family_from_template_id() {
        assert_eq!(TemplateFamily::from_template_id("creative-modern"), TemplateFamily::Creative);
        assert_eq!(TemplateFamily::from_template_id("simple"), TemplateFamily::Simple);
        assert_eq!(TemplateFamily::from_template_id("bogus-unknown"), TemplateFamily::Professional);
        assert_eq!(TemplateFamily::from_template_id("modernist-x"), TemplateFamily::Professional);
        assert_eq!(TemplateFamily::from_template_id(""), TemplateFamily::Professional);
    }
}
