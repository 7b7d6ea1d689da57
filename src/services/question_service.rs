use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::Store;
use crate::error::{Error, Result};
use crate::models::question::{NewQuestion, PublicQuestion, Question};
use crate::services::ai_service::{ContentGenerator, GeneratedQuestion, QuestionBatchRequest};
use crate::services::question_cache::QuestionCache;

#[derive(Clone)]
pub struct QuestionService {
    store: Arc<dyn Store>,
    generator: Arc<dyn ContentGenerator>,
    cache: QuestionCache,
}

impl QuestionService {
    pub fn new(
        store: Arc<dyn Store>,
        generator: Arc<dyn ContentGenerator>,
        cache: QuestionCache,
    ) -> Self {
        Self {
            store,
            generator,
            cache,
        }
    }

    /// Generates the question batch for a round once. Later calls return the
    /// stored questions without contacting the generator.
    pub async fn generate_questions(&self, interview_id: Uuid, round_id: Uuid) -> Result<Vec<Question>> {
        let interview = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        let round = self
            .store
            .get_rounds(interview_id)
            .await?
            .into_iter()
            .find(|r| r.id == round_id)
            .ok_or_else(|| Error::NotFound("Round not found".to_string()))?;

        let existing = self.store.get_questions(interview_id, round_id).await?;
        if !existing.is_empty() {
            tracing::debug!(%interview_id, %round_id, "Questions already generated for round");
            return Ok(existing);
        }

        let resume = self
            .store
            .get_resume(interview.resume_id)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;

        let mut seen: HashSet<String> = self
            .store
            .get_all_questions(interview_id)
            .await?
            .into_iter()
            .map(|q| q.question_text)
            .collect();

        let request = QuestionBatchRequest {
            context: resume.generation_context(),
            role: interview.job_role.clone(),
            round_type: round.round_type,
            exclude_texts: seen.iter().cloned().collect(),
        };
        let candidates = self.generator.generate_questions(&request).await?;
        let fresh = filter_new_questions(candidates, &mut seen);

        let mut created = Vec::with_capacity(fresh.len());
        for candidate in fresh {
            let new = NewQuestion {
                interview_id,
                round_id,
                question_text: candidate.text,
                question_type: candidate.question_type,
                options: candidate.options,
                correct_answer: candidate.correct_answer,
            };
            match self.store.insert_question(new).await? {
                Some(question) => created.push(question),
                None => tracing::warn!(%interview_id, %round_id, "Skipped duplicate question text"),
            }
        }

        self.cache.invalidate(interview_id, round_id);

        tracing::info!(
            %interview_id,
            %round_id,
            round_type = %round.round_type,
            count = created.len(),
            "Generated questions for round"
        );
        Ok(created)
    }

    /// Sanitized questions of a round, served from the cache when possible.
    pub async fn fetch_questions(&self, interview_id: Uuid, round_id: Uuid) -> Result<Vec<PublicQuestion>> {
        if let Some(cached) = self.cache.get(interview_id, round_id) {
            return Ok(cached.as_ref().clone());
        }

        let questions: Vec<PublicQuestion> = self
            .store
            .get_questions(interview_id, round_id)
            .await?
            .into_iter()
            .map(PublicQuestion::from)
            .collect();

        // Not generated yet; caching an empty list would hide the batch later.
        if !questions.is_empty() {
            self.cache.insert(interview_id, round_id, questions.clone());
        }
        Ok(questions)
    }
}

/// Drops candidates with no text or with text already in `seen` (exact,
/// case-sensitive). Accepted texts are added to `seen` so a batch cannot
/// repeat itself either.
pub fn filter_new_questions(
    candidates: Vec<GeneratedQuestion>,
    seen: &mut HashSet<String>,
) -> Vec<GeneratedQuestion> {
    candidates
        .into_iter()
        .filter(|q| {
            if q.text.is_empty() {
                return false;
            }
            if !seen.insert(q.text.clone()) {
                tracing::warn!(text = %q.text, "Dropped duplicate question text");
                return false;
            }
            true
        })
        .collect()
}
