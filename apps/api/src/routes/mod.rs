pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::resumes::handlers as resumes;
use crate::resumes::sections::all_section_routes;
use crate::share::handlers as share;
use crate::state::AppState;
use crate::suggestions::handlers as suggestions;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Template catalog
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/templates/:id", get(templates::handle_get_template))
        .route(
            "/api/v1/templates/:id/styles",
            get(templates::handle_get_styles),
        )
        // Resume lifecycle
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            put(resumes::handle_update_resume).delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/duplicate",
            post(resumes::handle_duplicate_resume),
        )
        .route("/api/v1/activities", get(resumes::handle_activities))
        // Resume reads
        .route(
            "/api/v1/resumes/:id/document",
            get(resumes::handle_get_document),
        )
        .route("/api/v1/resumes/:id/preview", get(resumes::handle_preview))
        // Export
        .route("/api/v1/resumes/:id/export", post(export::handle_export))
        .route(
            "/api/v1/resumes/:id/exports",
            get(export::handle_resume_exports),
        )
        .route("/api/v1/exports", get(export::handle_user_exports))
        // Sharing
        .route(
            "/api/v1/resumes/:id/share/link",
            post(share::handle_share_link),
        )
        .route(
            "/api/v1/resumes/:id/share/email",
            post(share::handle_share_email),
        )
        // AI suggestions
        .route("/api/v1/suggestions", post(suggestions::handle_suggest));

    all_section_routes(router).with_state(state)
}
