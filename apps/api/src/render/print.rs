//! Print surface for the PDF path: the rendered HTML is published somewhere a
//! browser can open it, with a script that raises the print dialog on load.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Print page upload failed: {0}")]
    Upload(String),

    #[error("Print URL signing failed: {0}")]
    Presign(String),
}

const PRINT_TRIGGER: &str =
    "<script>window.addEventListener('load', function () { window.print(); });</script>";

/// How long a published print page stays reachable.
pub const PRINT_URL_TTL: Duration = Duration::from_secs(15 * 60);

#[async_trait]
pub trait PrintSurface: Send + Sync {
    /// Publishes `html` and returns a URL that opens it with the print dialog.
    async fn publish(
        &self,
        resume_id: Uuid,
        file_name: &str,
        html: &str,
    ) -> Result<String, PrintError>;
}

/// Injects the auto-print script just before `</body>`, or appends it when the
/// document has no closing body tag.
pub fn with_print_trigger(html: &str) -> String {
    match html.rfind("</body>") {
        Some(at) => format!("{}{PRINT_TRIGGER}\n{}", &html[..at], &html[at..]),
        None => format!("{html}{PRINT_TRIGGER}"),
    }
}

pub fn print_key(resume_id: Uuid, file_name: &str) -> String {
    format!("prints/{resume_id}/{file_name}")
}

pub struct S3PrintSurface {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3PrintSurface {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl PrintSurface for S3PrintSurface {
    async fn publish(
        &self,
        resume_id: Uuid,
        file_name: &str,
        html: &str,
    ) -> Result<String, PrintError> {
        let key = print_key(resume_id, file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(with_print_trigger(html).into_bytes()))
            .content_type("text/html; charset=utf-8")
            .send()
            .await
            .map_err(|e| PrintError::Upload(e.to_string()))?;

        let presigning = PresigningConfig::expires_in(PRINT_URL_TTL)
            .map_err(|e| PrintError::Presign(e.to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .presigned(presigning)
            .await
            .map_err(|e| PrintError::Presign(e.to_string()))?;

        info!("Published print page to s3://{}/{}", self.bucket, key);
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records published pages; optionally refuses every publish.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub published: Mutex<Vec<(Uuid, String, String)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl PrintSurface for RecordingSurface {
        async fn publish(
            &self,
            resume_id: Uuid,
            file_name: &str,
            html: &str,
        ) -> Result<String, PrintError> {
            if self.fail {
                return Err(PrintError::Upload("print surface offline".to_string()));
            }
            self.published.lock().unwrap().push((
                resume_id,
                file_name.to_string(),
                with_print_trigger(html),
            ));
            Ok(format!("https://prints.test/{}", print_key(resume_id, file_name)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_lands_inside_body() {
        let html = with_print_trigger("<html><body><h1>Jane</h1></body></html>");
        let script = html.find("window.print()").unwrap();
        assert!(script > html.find("<h1>").unwrap());
        assert!(script < html.find("</body>").unwrap());
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn test_trigger_appended_without_body() {
        let html = with_print_trigger("<p>fragment</p>");
        assert!(html.starts_with("<p>fragment</p><script>"));
    }

    #[test]
    fn test_print_key_is_scoped_by_resume() {
        let id = Uuid::nil();
        assert_eq!(
            print_key(id, "Jane_Doe_Resume.html"),
            "prints/00000000-0000-0000-0000-000000000000/Jane_Doe_Resume.html"
        );
    }
}
