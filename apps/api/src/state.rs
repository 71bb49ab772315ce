use std::sync::Arc;

use crate::ai_client::AiClient;
use crate::config::Config;
use crate::export::notifier::Notifier;
use crate::render::print::PrintSurface;
use crate::share::email::EmailSender;
use crate::store::changes::ChangeNotifier;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResumeStore>,
    pub changes: ChangeNotifier,
    pub ai: AiClient,
    pub email: Arc<dyn EmailSender>,
    /// `None` when PRINT_SURFACE_ENABLED=false; PDF exports then return the raw HTML only.
    pub print_surface: Option<Arc<dyn PrintSurface>>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}
