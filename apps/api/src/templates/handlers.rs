//! Axum route handlers for the template catalog.

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::templates::registry::{self, Template, ALL_CATEGORIES, TEMPLATE_CATEGORIES};
use crate::templates::styles::{resolve_styles, StyleBundle};

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub categories: &'static [&'static str],
    pub templates: Vec<&'static Template>,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    Query(params): Query<CategoryQuery>,
) -> Json<TemplateListResponse> {
    let category = params.category.as_deref().unwrap_or(ALL_CATEGORIES);
    Json(TemplateListResponse {
        categories: &TEMPLATE_CATEGORIES,
        templates: registry::list_by_category(category),
    })
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    Path(template_id): Path<String>,
) -> Result<Json<&'static Template>, AppError> {
    registry::resolve(&template_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {template_id} not found")))
}

/// GET /api/v1/templates/:id/styles
///
/// Always succeeds; unknown ids get the default family's bundle.
pub async fn handle_get_styles(Path(template_id): Path<String>) -> Json<StyleBundle> {
    Json(resolve_styles(&template_id))
}
