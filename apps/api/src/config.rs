use anyhow::{Context, Result};

pub const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_EMAIL_FROM: &str = "Resume Builder <onboarding@resend.dev>";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables.
/// Startup aborts if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub ai_gateway_url: String,
    pub ai_api_key: String,
    pub ai_model: String,
    pub resend_api_key: String,
    pub email_from: String,
    /// Origin of the web app; shareable links point here.
    pub public_base_url: String,
    pub print_surface_enabled: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            ai_gateway_url: require_env("AI_GATEWAY_URL")?,
            ai_api_key: require_env("AI_API_KEY")?,
            ai_model: optional_env("AI_MODEL", DEFAULT_AI_MODEL),
            resend_api_key: require_env("RESEND_API_KEY")?,
            email_from: optional_env("EMAIL_FROM", DEFAULT_EMAIL_FROM),
            public_base_url: optional_env("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL),
            print_surface_enabled: parse_flag(&optional_env("PRINT_SURFACE_ENABLED", "true"))
                .context("PRINT_SURFACE_ENABLED must be true or false")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
