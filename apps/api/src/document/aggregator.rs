//! Resume Data Aggregator: assembles a `ResumeDocument` from the store.
//!
//! Ownership is checked first so a foreign or missing resume surfaces as an
//! error instead of an empty document. The six section reads are independent
//! and run concurrently.

use tracing::info;
use uuid::Uuid;

use crate::document::ResumeDocument;
use crate::store::{ResumeMeta, ResumeSource, StoreError};

#[derive(Debug, Clone)]
pub struct AggregatedResume {
    pub meta: ResumeMeta,
    pub document: ResumeDocument,
}

pub async fn aggregate<S>(
    source: &S,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<AggregatedResume, StoreError>
where
    S: ResumeSource + ?Sized,
{
    let meta = source.resume(user_id, resume_id).await?;

    let (personal_info, work_experience, education, skills, certifications, projects) = tokio::try_join!(
        source.personal_info(resume_id),
        source.work_experience(resume_id),
        source.education(resume_id),
        source.skills(resume_id),
        source.certifications(resume_id),
        source.projects(resume_id),
    )?;

    let document = ResumeDocument {
        personal_info,
        work_experience,
        education,
        skills,
        certifications,
        projects,
    };

    info!(
        "Aggregated resume {resume_id}: {} experience, {} education, {} skills, {} certifications, {} projects",
        document.work_experience.len(),
        document.education.len(),
        document.skills.len(),
        document.certifications.len(),
        document.projects.len()
    );

    Ok(AggregatedResume { meta, document })
}
