//! Style Resolver: maps a template family to its presentation bundle.
//!
//! Every bundle carries two parallel descriptions of the same look:
//! `screen` holds utility-class tokens the interactive preview applies, `print`
//! holds literal CSS rules embedded into the standalone HTML artifact (which has
//! no stylesheet cascade to lean on) plus the accent color and heading font the
//! word-processor renderer reuses.
//!
//! Resolution keys on family only. `resolve_template_styles` takes the whole
//! `Template` so per-variant styling can be introduced without changing callers.

use serde::Serialize;

use crate::templates::registry::{Template, TemplateFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderTokens {
    pub wrapper: &'static str,
    pub name: &'static str,
    pub contact: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionTokens {
    pub title: &'static str,
    pub content: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryTokens {
    pub wrapper: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub date: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillTokens {
    pub wrapper: &'static str,
    pub badge: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenStyle {
    pub container: &'static str,
    pub header: HeaderTokens,
    pub section: SectionTokens,
    pub entry: EntryTokens,
    pub skill: SkillTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrintStyle {
    /// Hex RGB without the leading `#`.
    pub accent_color: &'static str,
    pub heading_font: Option<&'static str>,
    /// CSS appended after the base print rules.
    pub rules: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleBundle {
    pub family: TemplateFamily,
    pub screen: ScreenStyle,
    pub print: PrintStyle,
}

/// Styles for an arbitrary template id. Never fails: unknown families get the
/// professional bundle.
pub fn resolve_styles(template_id: &str) -> StyleBundle {
    bundle_for(TemplateFamily::from_template_id(template_id))
}

pub fn resolve_template_styles(template: &Template) -> StyleBundle {
    bundle_for(template.family())
}

pub fn bundle_for(family: TemplateFamily) -> StyleBundle {
    match family {
        TemplateFamily::Professional => PROFESSIONAL,
        TemplateFamily::Modern => MODERN,
        TemplateFamily::Simple => SIMPLE,
        TemplateFamily::Creative => CREATIVE,
        TemplateFamily::Executive => EXECUTIVE,
    }
}

const PROFESSIONAL: StyleBundle = StyleBundle {
    family: TemplateFamily::Professional,
    screen: ScreenStyle {
        container: "space-y-6",
        header: HeaderTokens {
            wrapper: "text-center border-b-2 border-blue-900 pb-6",
            name: "text-4xl font-bold mb-2 text-blue-900",
            contact: "flex flex-wrap justify-center gap-4 mt-2 text-sm text-gray-600",
        },
        section: SectionTokens {
            title: "text-xl font-bold mb-3 text-blue-900 border-b border-gray-300 pb-2",
            content: "space-y-4",
        },
        entry: EntryTokens {
            wrapper: "mb-4",
            title: "font-semibold text-gray-900 text-base",
            subtitle: "text-sm text-gray-600",
            date: "text-sm text-gray-600",
        },
        skill: SkillTokens {
            wrapper: "flex flex-wrap gap-2",
            badge: "px-3 py-1 bg-blue-100 text-blue-900 rounded-md text-sm font-medium",
        },
    },
    print: PrintStyle {
        accent_color: "1E3A8A",
        heading_font: None,
        rules: r#"
.header { text-align: center; border-bottom: 2px solid #1E3A8A; padding-bottom: 12pt; margin-bottom: 16pt; }
.header h1 { font-size: 24pt; color: #1E3A8A; margin-bottom: 6pt; }
.section-title { font-size: 14pt; font-weight: bold; color: #1E3A8A; border-bottom: 1px solid #ddd; padding-bottom: 4pt; margin-bottom: 8pt; }
.skill-item { background: #DBEAFE; color: #1E3A8A; padding: 4pt 8pt; border-radius: 4pt; }
"#,
    },
};

const MODERN: StyleBundle = StyleBundle {
    family: TemplateFamily::Modern,
    screen: ScreenStyle {
        container: "space-y-8",
        header: HeaderTokens {
            wrapper: "bg-gradient-to-r from-purple-600 to-indigo-600 text-white p-8 rounded-xl -m-8 mb-8",
            name: "text-5xl font-bold mb-3 tracking-tight",
            contact: "flex flex-wrap gap-4 mt-3 text-sm opacity-90",
        },
        section: SectionTokens {
            title: "text-2xl font-bold mb-4 text-transparent bg-clip-text bg-gradient-to-r from-purple-600 to-indigo-600",
            content: "space-y-5",
        },
        entry: EntryTokens {
            wrapper: "mb-5 pl-4 border-l-4 border-purple-400",
            title: "font-bold text-gray-900 text-lg",
            subtitle: "text-sm text-gray-600 mt-1",
            date: "text-sm text-purple-600 font-medium",
        },
        skill: SkillTokens {
            wrapper: "flex flex-wrap gap-3",
            badge: "px-4 py-2 bg-gradient-to-r from-purple-500 to-indigo-500 text-white rounded-full text-sm font-semibold shadow-md",
        },
    },
    print: PrintStyle {
        accent_color: "9333EA",
        heading_font: None,
        rules: r#"
.header { background: linear-gradient(135deg, #9333EA 0%, #4F46E5 100%); color: white; padding: 20pt; margin: -0.5in -0.5in 16pt -0.5in; }
.header h1 { font-size: 28pt; font-weight: bold; margin-bottom: 8pt; }
.header .contact-info { color: #EDE9FE; }
.section-title { font-size: 16pt; font-weight: bold; color: #9333EA; margin-bottom: 10pt; }
.entry { border-left: 3pt solid #9333EA; padding-left: 8pt; }
.skill-item { background: linear-gradient(135deg, #9333EA 0%, #4F46E5 100%); color: white; padding: 6pt 12pt; border-radius: 12pt; font-weight: 600; }
"#,
    },
};

const SIMPLE: StyleBundle = StyleBundle {
    family: TemplateFamily::Simple,
    screen: ScreenStyle {
        container: "space-y-6",
        header: HeaderTokens {
            wrapper: "pb-4 border-b border-gray-400",
            name: "text-3xl font-semibold mb-2 text-gray-900",
            contact: "flex flex-wrap gap-3 mt-2 text-sm text-gray-700",
        },
        section: SectionTokens {
            title: "text-lg font-semibold mb-3 text-gray-900 uppercase tracking-wide",
            content: "space-y-3",
        },
        entry: EntryTokens {
            wrapper: "mb-3",
            title: "font-medium text-gray-900",
            subtitle: "text-sm text-gray-600",
            date: "text-sm text-gray-500",
        },
        skill: SkillTokens {
            wrapper: "flex flex-wrap gap-2",
            badge: "px-2 py-1 border border-gray-400 text-gray-800 rounded text-sm",
        },
    },
    print: PrintStyle {
        accent_color: "111111",
        heading_font: None,
        rules: r#"
.header { border-bottom: 1px solid #666; padding-bottom: 12pt; margin-bottom: 16pt; }
.header h1 { font-size: 22pt; color: #111; margin-bottom: 6pt; }
.section-title { font-size: 13pt; font-weight: 600; color: #111; text-transform: uppercase; letter-spacing: 1pt; margin-bottom: 8pt; }
.skill-item { border: 1pt solid #666; color: #333; padding: 4pt 8pt; border-radius: 2pt; }
"#,
    },
};

const CREATIVE: StyleBundle = StyleBundle {
    family: TemplateFamily::Creative,
    screen: ScreenStyle {
        container: "space-y-8",
        header: HeaderTokens {
            wrapper: "text-center pb-6 border-b-4 border-orange-500",
            name: "text-5xl font-extrabold mb-3 text-transparent bg-clip-text bg-gradient-to-r from-orange-500 to-pink-500",
            contact: "flex flex-wrap justify-center gap-4 mt-3 text-sm text-gray-700",
        },
        section: SectionTokens {
            title: "text-2xl font-bold mb-4 text-orange-600 border-b-2 border-pink-500 pb-2",
            content: "space-y-5",
        },
        entry: EntryTokens {
            wrapper: "mb-5 bg-gradient-to-r from-orange-50 to-pink-50 p-4 rounded-lg",
            title: "font-bold text-gray-900 text-lg",
            subtitle: "text-sm text-gray-600 mt-1",
            date: "text-sm text-orange-600 font-semibold",
        },
        skill: SkillTokens {
            wrapper: "flex flex-wrap gap-3",
            badge: "px-4 py-2 bg-gradient-to-r from-orange-400 to-pink-400 text-white rounded-lg text-sm font-bold shadow-lg",
        },
    },
    print: PrintStyle {
        accent_color: "F97316",
        heading_font: None,
        rules: r#"
.header { text-align: center; border-bottom: 4pt solid #F97316; padding-bottom: 12pt; margin-bottom: 16pt; }
.header h1 { font-size: 28pt; font-weight: 800; color: #F97316; margin-bottom: 6pt; }
.section-title { font-size: 16pt; font-weight: bold; color: #F97316; border-bottom: 2pt solid #EC4899; padding-bottom: 4pt; margin-bottom: 10pt; }
.entry { background: #FFF7ED; padding: 10pt; border-radius: 6pt; }
.skill-item { background: linear-gradient(135deg, #FB923C 0%, #F472B6 100%); color: white; padding: 6pt 12pt; border-radius: 6pt; font-weight: 700; }
"#,
    },
};

const EXECUTIVE: StyleBundle = StyleBundle {
    family: TemplateFamily::Executive,
    screen: ScreenStyle {
        container: "space-y-7",
        header: HeaderTokens {
            wrapper: "border-b-4 border-amber-700 pb-6 bg-gradient-to-r from-amber-50 to-slate-50 -m-8 p-8 mb-8",
            name: "text-4xl font-serif font-bold mb-3 text-slate-900 tracking-wide",
            contact: "flex flex-wrap gap-4 mt-3 text-sm text-slate-600",
        },
        section: SectionTokens {
            title: "text-xl font-serif font-bold mb-4 text-amber-900 uppercase tracking-widest border-b-2 border-amber-300 pb-2",
            content: "space-y-5",
        },
        entry: EntryTokens {
            wrapper: "mb-5",
            title: "font-serif font-bold text-slate-900 text-lg",
            subtitle: "text-sm text-slate-600 mt-1",
            date: "text-sm text-amber-700 font-medium",
        },
        skill: SkillTokens {
            wrapper: "flex flex-wrap gap-3",
            badge: "px-4 py-2 bg-amber-100 text-amber-900 border border-amber-300 rounded text-sm font-semibold",
        },
    },
    print: PrintStyle {
        accent_color: "92400E",
        heading_font: Some("Georgia"),
        rules: r#"
.header { border-bottom: 3pt solid #92400E; background: #FFFBEB; padding: 16pt; margin: -0.5in -0.5in 16pt -0.5in; }
.header h1 { font-size: 24pt; font-family: Georgia, serif; font-weight: bold; color: #1E293B; margin-bottom: 8pt; letter-spacing: 1pt; }
.section-title { font-size: 14pt; font-family: Georgia, serif; font-weight: bold; color: #92400E; text-transform: uppercase; letter-spacing: 2pt; border-bottom: 2pt solid #FCD34D; padding-bottom: 4pt; margin-bottom: 10pt; }
.skill-item { background: #FEF3C7; color: #92400E; border: 1pt solid #FCD34D; padding: 6pt 12pt; border-radius: 4pt; font-weight: 600; }
"#,
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::registry::{catalog, resolve};

    #[test]
    fn test_unknown_id_resolves_to_professional_classic_bundle() {
        assert_eq!(resolve_styles("bogus-unknown"), resolve_styles("professional-classic"));
        assert_eq!(resolve_styles(""), PROFESSIONAL);
        assert_eq!(resolve_styles("---"), PROFESSIONAL);
    }

    #[test]
    fn test_variants_share_family_bundle() {
        assert_eq!(resolve_styles("modern-bold"), resolve_styles("modern-minimal"));
        assert_eq!(resolve_styles("executive-premium").family, TemplateFamily::Executive);
        assert_ne!(resolve_styles("creative-vibrant"), resolve_styles("simple-clean"));
    }

    #[test]
    fn test_template_and_id_resolution_agree_for_catalog() {
        for template in catalog() {
            assert_eq!(resolve_template_styles(template), resolve_styles(template.id));
        }
        let executive = resolve("executive-elegant").unwrap();
        assert_eq!(resolve_template_styles(executive).print.heading_font, Some("Georgia"));
    }

    #[test]
    fn test_every_bundle_is_complete() {
        for family in [
            TemplateFamily::Professional,
            TemplateFamily::Modern,
            TemplateFamily::Simple,
            TemplateFamily::Creative,
            TemplateFamily::Executive,
        ] {
            let bundle = bundle_for(family);
            assert_eq!(bundle.family, family);
            assert!(!bundle.screen.header.name.is_empty());
            assert!(!bundle.screen.skill.badge.is_empty());
            assert!(bundle.print.rules.contains(".section-title"));
            assert_eq!(bundle.print.accent_color.len(), 6);
        }
    }
}
