mod ai_client;
mod config;
mod db;
mod document;
mod errors;
mod export;
mod models;
mod render;
mod resumes;
mod routes;
mod share;
mod state;
mod store;
mod suggestions;
mod templates;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::AiClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::export::notifier::TracingNotifier;
use crate::render::print::{PrintSurface, S3PrintSurface};
use crate::routes::build_router;
use crate::share::email::ResendClient;
use crate::state::AppState;
use crate::store::changes::ChangeNotifier;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (aborts on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize Redis (change notifications)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let changes = ChangeNotifier::new(redis);
    info!("Redis client initialized");

    // Print surface on S3 / MinIO
    let print_surface: Option<Arc<dyn PrintSurface>> = if config.print_surface_enabled {
        let s3 = build_s3_client(&config).await;
        info!("Print surface enabled (bucket: {})", config.s3_bucket);
        Some(Arc::new(S3PrintSurface::new(s3, config.s3_bucket.clone())))
    } else {
        info!("Print surface disabled");
        None
    };

    // AI gateway
    let ai = AiClient::new(
        &config.ai_gateway_url,
        config.ai_api_key.clone(),
        config.ai_model.clone(),
    )?;
    info!("AI client initialized (model: {})", ai.model());

    // Email delivery
    let email = ResendClient::new(config.resend_api_key.clone(), config.email_from.clone())?;

    let state = AppState {
        store,
        changes,
        ai,
        email: Arc::new(email),
        print_surface,
        notifier: Arc::new(TracingNotifier),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to PUBLIC_BASE_URL once the web app is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "folio-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
