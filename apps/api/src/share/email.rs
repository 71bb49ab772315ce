//! Email delivery for shared resumes, through a Resend-compatible HTTP API.

use async_trait::async_trait;
use minijinja::{context, Environment};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub const RESEND_API_URL: &str = "https://api.resend.com/emails";
const TEMPLATE_NAME: &str = "share_email.html";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("{0}")]
    InvalidRecipient(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareEmail {
    pub recipient: String,
    pub link: String,
    pub resume_title: String,
    pub sender_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedEmail {
    pub subject: String,
    pub html: String,
}

/// Trimmed address, if it looks deliverable: one `@` with text on both sides
/// and no whitespace.
pub fn validate_recipient(raw: &str) -> Result<String, EmailError> {
    let address = raw.trim();
    if address.is_empty() {
        return Err(EmailError::InvalidRecipient(
            "Please enter an email address.".to_string(),
        ));
    }
    let plausible = match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !address.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !plausible {
        return Err(EmailError::InvalidRecipient(format!(
            "'{address}' is not a valid email address."
        )));
    }
    Ok(address.to_string())
}

pub fn compose(email: &ShareEmail) -> Result<ComposedEmail, EmailError> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, include_str!("templates/share_email.html"))?;
    let html = env.get_template(TEMPLATE_NAME)?.render(context! {
        sender_name => email.sender_name,
        resume_title => email.resume_title,
        link => email.link,
    })?;
    Ok(ComposedEmail {
        subject: format!("{} shared a resume: {}", email.sender_name, email.resume_title),
        html,
    })
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &ShareEmail) -> Result<(), EmailError>;
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Clone)]
pub struct ResendClient {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendClient {
    pub fn new(api_key: String, from: String) -> Result<Self, EmailError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &ShareEmail) -> Result<(), EmailError> {
        let composed = compose(email)?;
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&ResendRequest {
                from: &self.from,
                to: [email.recipient.as_str()],
                subject: &composed.subject,
                html: &composed.html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmailError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        info!("Sent share email for '{}' to {}", email.resume_title, email.recipient);
        Ok(())
    }
}
