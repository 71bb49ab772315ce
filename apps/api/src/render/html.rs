//! Standalone print-ready HTML. This is the PDF path: the browser's print
//! dialog turns it into the final document.

use minijinja::{context, Environment};

use crate::document::ResumeDocument;
use crate::render::outline::Outline;
use crate::render::RenderError;
use crate::templates::styles::PrintStyle;

const TEMPLATE_NAME: &str = "resume.html";

fn environment() -> Result<Environment<'static>, RenderError> {
    let mut env = Environment::new();
    // `.html` names get HTML auto-escaping, so user text never becomes markup.
    env.add_template(TEMPLATE_NAME, include_str!("templates/resume.html"))?;
    Ok(env)
}

pub fn render_html(document: &ResumeDocument, style: &PrintStyle) -> Result<String, RenderError> {
    let outline = Outline::build(document);
    let env = environment()?;
    let template = env.get_template(TEMPLATE_NAME)?;
    let html = template.render(context! {
        header => outline.header,
        sections => outline.sections,
        family_rules => style.rules,
    })?;
    Ok(html)
}
