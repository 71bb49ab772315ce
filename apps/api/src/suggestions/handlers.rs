//! Axum route handlers for AI content suggestions.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai_client::prompts::{SuggestionContext, SuggestionKind};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    #[serde(alias = "type")]
    pub kind: SuggestionKind,
    #[serde(default)]
    pub context: SuggestionContext,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

/// POST /api/v1/suggestions
///
/// Proxies one suggestion request to the AI gateway. Rate limiting and
/// exhausted credits come back as 429 and 402 with distinct messages.
pub async fn handle_suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestionRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let suggestion = state.ai.suggest(request.kind, &request.context).await?;

    info!("Generated {:?} suggestion ({} chars)", request.kind, suggestion.len());

    Ok(Json(SuggestionResponse { suggestion }))
}
