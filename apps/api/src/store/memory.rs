//! In-memory store for unit tests.
//!
//! Seeded resumes carry a whole `ResumeDocument`. Rows written through
//! `SectionWriter` are kept as JSON per table and show up in section reads
//! after the seeded entries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::document::{
    Certification, Education, PersonalInfo, Project, ResumeDocument, Skill, WorkExperience,
};
use crate::models::sections::{
    CertificationRow, EducationRow, PersonalInfoRow, ProjectRow, SkillRow, WorkExperienceRow,
};
use crate::store::repository::SectionTable;
use crate::store::{
    ActivityLog, ActivityRecord, ExportLog, ExportRecord, NewActivity, NewExportRecord,
    ResumeCatalog, ResumeChanges, ResumeMeta, ResumeRecord, ResumeSource, SectionWriter,
    StoreError,
};

struct StoredResume {
    owner: Uuid,
    record: ResumeRecord,
    document: ResumeDocument,
    /// Insertion order; breaks `updated_at` ties.
    seq: u64,
}

#[derive(Clone)]
struct StoredRow {
    table: &'static str,
    resume_id: Uuid,
    id: Uuid,
    value: Value,
}

#[derive(Default)]
pub struct MemoryStore {
    resumes: Mutex<HashMap<Uuid, StoredResume>>,
    rows: Mutex<Vec<StoredRow>>,
    exports: Mutex<Vec<(Uuid, ExportRecord)>>,
    activities: Mutex<Vec<(Uuid, ActivityRecord)>>,
    fail_export_writes: bool,
    fail_section_reads: bool,
    fail_activity_writes: bool,
    section_reads: AtomicUsize,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resume(self, owner: Uuid, meta: ResumeMeta, document: ResumeDocument) -> Self {
        let now = Utc::now();
        let record = ResumeRecord {
            id: meta.id,
            title: meta.title,
            template_id: meta.template_id,
            created_at: now,
            updated_at: now,
            last_accessed_at: None,
        };
        self.insert_resume(owner, record, document);
        self
    }

    pub fn failing_export_writes(mut self) -> Self {
        self.fail_export_writes = true;
        self
    }

    pub fn failing_section_reads(mut self) -> Self {
        self.fail_section_reads = true;
        self
    }

    pub fn failing_activity_writes(mut self) -> Self {
        self.fail_activity_writes = true;
        self
    }

    pub fn exports(&self) -> Vec<ExportRecord> {
        self.exports
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Oldest first.
    pub fn activities(&self) -> Vec<ActivityRecord> {
        self.activities
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    pub fn section_reads(&self) -> usize {
        self.section_reads.load(Ordering::SeqCst)
    }

    pub fn contains_resume(&self, resume_id: Uuid) -> bool {
        self.resumes.lock().unwrap().contains_key(&resume_id)
    }

    /// Rows written through `SectionWriter<S>` for one resume, oldest first.
    pub fn rows<S: SectionTable>(&self, resume_id: Uuid) -> Vec<S> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.table == S::TABLE && row.resume_id == resume_id)
            .map(|row| serde_json::from_value(row.value.clone()).unwrap())
            .collect()
    }

    fn insert_resume(&self, owner: Uuid, record: ResumeRecord, document: ResumeDocument) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.resumes.lock().unwrap().insert(
            record.id,
            StoredResume {
                owner,
                record,
                document,
                seq,
            },
        );
    }

    fn owned(&self, user_id: Uuid, resume_id: Uuid) -> Result<ResumeRecord, StoreError> {
        let resumes = self.resumes.lock().unwrap();
        let stored = resumes
            .get(&resume_id)
            .ok_or(StoreError::ResumeNotFound(resume_id))?;
        if stored.owner != user_id {
            return Err(StoreError::NotOwner(resume_id));
        }
        Ok(stored.record.clone())
    }

    fn document(&self, resume_id: Uuid) -> Result<ResumeDocument, StoreError> {
        self.section_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_section_reads {
            return Err(StoreError::Unavailable("section read failed".to_string()));
        }
        self.resumes
            .lock()
            .unwrap()
            .get(&resume_id)
            .map(|stored| stored.document.clone())
            .ok_or(StoreError::ResumeNotFound(resume_id))
    }

    /// Seeded entries followed by written rows, converted to the domain type.
    fn section<S, T>(&self, seeded: Vec<T>, resume_id: Uuid) -> Vec<T>
    where
        S: SectionTable + Into<T>,
    {
        seeded
            .into_iter()
            .chain(self.rows::<S>(resume_id).into_iter().map(Into::into))
            .collect()
    }

    /// Builds a full row from the input: the JSON of an input carries the
    /// same field names as the row's writable columns.
    fn materialize<S: SectionTable>(
        resume_id: Uuid,
        row_id: Uuid,
        created_at: Value,
        input: &S::Input,
    ) -> Result<(S, Value), StoreError> {
        let mut value =
            serde_json::to_value(input).map_err(|e| StoreError::Invalid(e.to_string()))?;
        let fields = value
            .as_object_mut()
            .ok_or_else(|| StoreError::Invalid(format!("{} input is not an object", S::TABLE)))?;
        fields.insert("id".into(), Value::String(row_id.to_string()));
        fields.insert("resume_id".into(), Value::String(resume_id.to_string()));
        fields.insert("created_at".into(), created_at);
        fields.insert("updated_at".into(), Value::String(Utc::now().to_rfc3339()));

        let row: S = serde_json::from_value(value.clone())
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        Ok((row, value))
    }
}

#[async_trait]
impl ResumeSource for MemoryStore {
    async fn resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<ResumeMeta, StoreError> {
        let record = self.owned(user_id, resume_id)?;
        Ok(ResumeMeta {
            id: record.id,
            title: record.title,
            template_id: record.template_id,
        })
    }

    async fn personal_info(&self, resume_id: Uuid) -> Result<Option<PersonalInfo>, StoreError> {
        let seeded = self.document(resume_id)?.personal_info;
        Ok(seeded.or_else(|| {
            self.rows::<PersonalInfoRow>(resume_id)
                .into_iter()
                .next()
                .map(Into::into)
        }))
    }

    async fn work_experience(&self, resume_id: Uuid) -> Result<Vec<WorkExperience>, StoreError> {
        let seeded = self.document(resume_id)?.work_experience;
        Ok(self.section::<WorkExperienceRow, _>(seeded, resume_id))
    }

    async fn education(&self, resume_id: Uuid) -> Result<Vec<Education>, StoreError> {
        let seeded = self.document(resume_id)?.education;
        Ok(self.section::<EducationRow, _>(seeded, resume_id))
    }

    async fn skills(&self, resume_id: Uuid) -> Result<Vec<Skill>, StoreError> {
        let seeded = self.document(resume_id)?.skills;
        Ok(self.section::<SkillRow, _>(seeded, resume_id))
    }

    async fn certifications(&self, resume_id: Uuid) -> Result<Vec<Certification>, StoreError> {
        let seeded = self.document(resume_id)?.certifications;
        Ok(self.section::<CertificationRow, _>(seeded, resume_id))
    }

    async fn projects(&self, resume_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let seeded = self.document(resume_id)?.projects;
        Ok(self.section::<ProjectRow, _>(seeded, resume_id))
    }
}

#[async_trait]
impl ExportLog for MemoryStore {
    async fn record_export(
        &self,
        user_id: Uuid,
        record: &NewExportRecord,
    ) -> Result<ExportRecord, StoreError> {
        if self.fail_export_writes {
            return Err(StoreError::Unavailable("export_history is read-only".to_string()));
        }
        let stored = ExportRecord {
            id: Uuid::new_v4(),
            resume_id: record.resume_id,
            resume_title: record.resume_title.clone(),
            export_format: record.export_format.clone(),
            file_name: record.file_name.clone(),
            created_at: Utc::now(),
        };
        self.exports.lock().unwrap().push((user_id, stored.clone()));
        Ok(stored)
    }

    async fn recent_exports(
        &self,
        user_id: Uuid,
        resume_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<ExportRecord>, StoreError> {
        let exports = self.exports.lock().unwrap();
        Ok(exports
            .iter()
            .rev()
            .filter(|(owner, record)| {
                *owner == user_id && resume_id.map_or(true, |id| record.resume_id == id)
            })
            .take(limit.max(0) as usize)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[async_trait]
impl ResumeCatalog for MemoryStore {
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<ResumeRecord>, StoreError> {
        let resumes = self.resumes.lock().unwrap();
        let mut owned: Vec<&StoredResume> = resumes
            .values()
            .filter(|stored| stored.owner == user_id)
            .collect();
        owned.sort_by(|a, b| {
            (b.record.updated_at, b.seq).cmp(&(a.record.updated_at, a.seq))
        });
        Ok(owned.into_iter().map(|stored| stored.record.clone()).collect())
    }

    async fn create_resume(
        &self,
        user_id: Uuid,
        title: &str,
        template_id: &str,
    ) -> Result<ResumeRecord, StoreError> {
        let now = Utc::now();
        let record = ResumeRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            template_id: template_id.to_string(),
            created_at: now,
            updated_at: now,
            last_accessed_at: None,
        };
        self.insert_resume(user_id, record.clone(), ResumeDocument::default());
        Ok(record)
    }

    async fn update_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        changes: &ResumeChanges,
    ) -> Result<ResumeRecord, StoreError> {
        self.owned(user_id, resume_id)?;
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let mut resumes = self.resumes.lock().unwrap();
        let stored = resumes
            .get_mut(&resume_id)
            .ok_or(StoreError::ResumeNotFound(resume_id))?;
        if let Some(title) = &changes.title {
            stored.record.title = title.clone();
        }
        if let Some(template_id) = &changes.template_id {
            stored.record.template_id = template_id.clone();
        }
        stored.record.updated_at = Utc::now();
        stored.seq = seq;
        Ok(stored.record.clone())
    }

    async fn delete_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<(), StoreError> {
        self.owned(user_id, resume_id)?;
        self.resumes.lock().unwrap().remove(&resume_id);
        self.rows
            .lock()
            .unwrap()
            .retain(|row| row.resume_id != resume_id);
        Ok(())
    }

    async fn duplicate_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
        title: &str,
    ) -> Result<ResumeRecord, StoreError> {
        let source = self.owned(user_id, resume_id)?;
        let document = self
            .resumes
            .lock()
            .unwrap()
            .get(&resume_id)
            .map(|stored| stored.document.clone())
            .ok_or(StoreError::ResumeNotFound(resume_id))?;

        let now = Utc::now();
        let copy = ResumeRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            template_id: source.template_id,
            created_at: now,
            updated_at: now,
            last_accessed_at: None,
        };

        let mut rows = self.rows.lock().unwrap();
        let copied: Vec<StoredRow> = rows
            .iter()
            .filter(|row| row.resume_id == resume_id)
            .map(|row| {
                let id = Uuid::new_v4();
                let mut value = row.value.clone();
                if let Some(fields) = value.as_object_mut() {
                    fields.insert("id".into(), Value::String(id.to_string()));
                    fields.insert("resume_id".into(), Value::String(copy.id.to_string()));
                }
                StoredRow {
                    table: row.table,
                    resume_id: copy.id,
                    id,
                    value,
                }
            })
            .collect();
        rows.extend(copied);
        drop(rows);

        self.insert_resume(user_id, copy.clone(), document);
        Ok(copy)
    }
}

#[async_trait]
impl ActivityLog for MemoryStore {
    async fn record_activity(
        &self,
        user_id: Uuid,
        activity: &NewActivity,
    ) -> Result<ActivityRecord, StoreError> {
        if self.fail_activity_writes {
            return Err(StoreError::Unavailable("activities is read-only".to_string()));
        }
        let stored = ActivityRecord {
            id: Uuid::new_v4(),
            resume_id: activity.resume_id,
            activity_type: activity.activity_type,
            resume_title: activity.resume_title.clone(),
            created_at: Utc::now(),
        };
        self.activities
            .lock()
            .unwrap()
            .push((user_id, stored.clone()));
        Ok(stored)
    }

    async fn recent_activities(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityRecord>, StoreError> {
        let activities = self.activities.lock().unwrap();
        Ok(activities
            .iter()
            .rev()
            .filter(|(owner, _)| *owner == user_id)
            .take(limit.max(0) as usize)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[async_trait]
impl<S: SectionTable> SectionWriter<S> for MemoryStore {
    async fn create_row(&self, resume_id: Uuid, input: &S::Input) -> Result<S, StoreError> {
        S::validate(input).map_err(StoreError::Invalid)?;
        if S::SINGLETON {
            let seeded = self
                .resumes
                .lock()
                .unwrap()
                .get(&resume_id)
                .map_or(false, |stored| stored.document.personal_info.is_some());
            if seeded || !self.rows::<S>(resume_id).is_empty() {
                return Err(StoreError::Invalid(format!(
                    "{} already exists for resume {resume_id}; update it instead",
                    S::TABLE
                )));
            }
        }

        let id = Uuid::new_v4();
        let created_at = Value::String(Utc::now().to_rfc3339());
        let (row, value) = Self::materialize::<S>(resume_id, id, created_at, input)?;
        self.rows.lock().unwrap().push(StoredRow {
            table: S::TABLE,
            resume_id,
            id,
            value,
        });
        Ok(row)
    }

    async fn update_row(
        &self,
        resume_id: Uuid,
        row_id: Uuid,
        input: &S::Input,
    ) -> Result<S, StoreError> {
        S::validate(input).map_err(StoreError::Invalid)?;

        let mut rows = self.rows.lock().unwrap();
        let stored = rows
            .iter_mut()
            .find(|row| row.table == S::TABLE && row.resume_id == resume_id && row.id == row_id)
            .ok_or(StoreError::RowNotFound(row_id))?;
        let created_at = stored.value["created_at"].clone();
        let (row, value) = Self::materialize::<S>(resume_id, row_id, created_at, input)?;
        stored.value = value;
        Ok(row)
    }

    async fn delete_row(&self, resume_id: Uuid, row_id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !(row.table == S::TABLE && row.resume_id == resume_id && row.id == row_id));
        if rows.len() == before {
            return Err(StoreError::RowNotFound(row_id));
        }
        Ok(())
    }
}
