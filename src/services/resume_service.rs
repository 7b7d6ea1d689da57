use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::database::Store;
use crate::error::{Error, Result};
use crate::models::resume::{Resume, ResumeExtraction};
use crate::services::ai_service::ContentGenerator;
use crate::services::storage_service::{ObjectStorage, StoredObject};

#[derive(Clone)]
pub struct ResumeService {
    store: Arc<dyn Store>,
    storage: Arc<dyn ObjectStorage>,
    generator: Arc<dyn ContentGenerator>,
}

impl ResumeService {
    pub fn new(
        store: Arc<dyn Store>,
        storage: Arc<dyn ObjectStorage>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            store,
            storage,
            generator,
        }
    }

    pub async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        data: Bytes,
    ) -> Result<(Resume, StoredObject)> {
        if data.is_empty() {
            return Err(Error::BadRequest("No file uploaded".to_string()));
        }

        let stored = self.storage.put_object(file_name, data).await?;
        let resume = self.store.create_resume(user_id, &stored.key).await?;

        tracing::info!(resume_id = %resume.id, key = %stored.key, %user_id, "Resume uploaded");
        Ok((resume, stored))
    }

    pub async fn parse(&self, resume_id: Uuid) -> Result<ResumeExtraction> {
        let resume = self.get(resume_id).await?;
        let document = self.storage.get_object(&resume.object_key).await?;

        let extraction = self.generator.extract_resume(&document).await?;
        self.store.update_parsed_data(resume_id, &extraction).await?;

        tracing::info!(
            %resume_id,
            skills = extraction.skills.len(),
            roles = extraction.recommended_roles.len(),
            "Resume parsed"
        );
        Ok(extraction)
    }

    pub async fn select_role(&self, resume_id: Uuid, role: &str) -> Result<Resume> {
        let resume = self.store.update_selected_role(resume_id, role).await?;
        tracing::info!(%resume_id, %role, "Role selected");
        Ok(resume)
    }

    pub async fn get(&self, resume_id: Uuid) -> Result<Resume> {
        self.store
            .get_resume(resume_id)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::services::ai_service::MockContentGenerator;
    use crate::services::storage_service::LocalObjectStorage;

    fn service(dir: &std::path::Path, generator: MockContentGenerator) -> ResumeService {
        ResumeService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LocalObjectStorage::new(dir, "resumes", "http://localhost:3001")),
            Arc::new(generator),
        )
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), MockContentGenerator::new());
        assert!(matches!(
            svc.upload("u1", "cv.pdf", Bytes::new()).await,
            Err(Error::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn parse_reads_stored_bytes_and_persists_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = MockContentGenerator::new();
        generator
            .expect_extract_resume()
            .withf(|doc: &[u8]| doc == b"Rust developer")
            .times(1)
            .returning(|_| {
                Ok(ResumeExtraction {
                    skills: vec!["Rust".into()],
                    projects: vec!["Compiler".into()],
                    recommended_roles: vec!["Backend Engineer".into()],
                })
            });
        let svc = service(dir.path(), generator);

        let (resume, stored) = svc
            .upload("u1", "cv.txt", Bytes::from_static(b"Rust developer"))
            .await
            .unwrap();
        assert_eq!(resume.object_key, stored.key);
        assert_eq!(resume.user_id, "u1");

        let extraction = svc.parse(resume.id).await.unwrap();
        assert_eq!(extraction.skills, vec!["Rust"]);

        let reloaded = svc.get(resume.id).await.unwrap();
        assert_eq!(reloaded.parsed_projects, vec!["Compiler"]);
        assert_eq!(reloaded.recommended_roles, vec!["Backend Engineer"]);
    }

    #[tokio::test]
    async fn unknown_resume_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), MockContentGenerator::new());
        assert!(matches!(svc.parse(Uuid::new_v4()).await, Err(Error::NotFound(_))));
        assert!(matches!(
            svc.select_role(Uuid::new_v4(), "Dev").await,
            Err(Error::NotFound(_))
        ));
    }
}
