pub mod email;
pub mod handlers;

use uuid::Uuid;

/// Public preview link for a resume, on the web app's origin.
pub fn share_link(public_base_url: &str, resume_id: Uuid) -> String {
    format!(
        "{}/resume/preview?resumeId={resume_id}",
        public_base_url.trim_end_matches('/')
    )
}
