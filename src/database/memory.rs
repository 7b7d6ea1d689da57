use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::store::{InterviewStore, QuestionStore, ResumeStore};
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::interview::{Interview, InterviewStatus, NewInterview};
use crate::models::question::{NewQuestion, Question};
use crate::models::resume::{Resume, ResumeExtraction};
use crate::models::round::{Round, RoundPlan, RoundStatus};
use crate::utils::time::now;

#[derive(Default)]
struct Tables {
    resumes: HashMap<Uuid, Resume>,
    interviews: HashMap<Uuid, Interview>,
    rounds: Vec<Round>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
}

/// Process-local store used when no database is configured, and by tests.
///
/// Every operation runs under one lock, so conditional transitions are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn create_resume(&self, user_id: &str, object_key: &str) -> Result<Resume> {
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            object_key: object_key.to_string(),
            parsed_skills: Vec::new(),
            parsed_projects: Vec::new(),
            recommended_roles: Vec::new(),
            selected_role: None,
            uploaded_at: now(),
        };
        self.tables
            .write()
            .await
            .resumes
            .insert(resume.id, resume.clone());
        Ok(resume)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        Ok(self.tables.read().await.resumes.get(&id).cloned())
    }

    async fn update_parsed_data(&self, id: Uuid, extraction: &ResumeExtraction) -> Result<Resume> {
        let mut tables = self.tables.write().await;
        let resume = tables
            .resumes
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;
        resume.parsed_skills = extraction.skills.clone();
        resume.parsed_projects = extraction.projects.clone();
        resume.recommended_roles = extraction.recommended_roles.clone();
        Ok(resume.clone())
    }

    async fn update_selected_role(&self, id: Uuid, role: &str) -> Result<Resume> {
        let mut tables = self.tables.write().await;
        let resume = tables
            .resumes
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;
        resume.selected_role = Some(role.to_string());
        Ok(resume.clone())
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn create_interview(
        &self,
        new: NewInterview,
        plan: &[RoundPlan],
    ) -> Result<(Interview, Vec<Round>)> {
        let interview = Interview {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            resume_id: new.resume_id,
            job_role: new.job_role,
            status: InterviewStatus::Started,
            final_score: None,
            feedback: None,
            created_at: now(),
            completed_at: None,
        };
        let rounds: Vec<Round> = plan
            .iter()
            .enumerate()
            .map(|(position, entry)| Round {
                id: Uuid::new_v4(),
                interview_id: interview.id,
                position: position as i32,
                round_type: entry.round_type,
                status: RoundStatus::Pending,
                duration_minutes: entry.duration_minutes,
                started_at: None,
                completed_at: None,
            })
            .collect();

        let mut tables = self.tables.write().await;
        tables.interviews.insert(interview.id, interview.clone());
        tables.rounds.extend(rounds.iter().cloned());
        Ok((interview, rounds))
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        Ok(self.tables.read().await.interviews.get(&id).cloned())
    }

    async fn get_rounds(&self, interview_id: Uuid) -> Result<Vec<Round>> {
        let tables = self.tables.read().await;
        let mut rounds: Vec<Round> = tables
            .rounds
            .iter()
            .filter(|r| r.interview_id == interview_id)
            .cloned()
            .collect();
        rounds.sort_by_key(|r| r.position);
        Ok(rounds)
    }

    async fn activate_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(interview_id) = tables
            .rounds
            .iter()
            .find(|r| r.id == round_id)
            .map(|r| r.interview_id)
        else {
            return Ok(false);
        };

        let another_active = tables
            .rounds
            .iter()
            .any(|r| r.interview_id == interview_id && r.status == RoundStatus::Active);
        if another_active {
            return Ok(false);
        }

        match tables
            .rounds
            .iter_mut()
            .find(|r| r.id == round_id && r.status == RoundStatus::Pending)
        {
            Some(round) => {
                round.status = RoundStatus::Active;
                round.started_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn complete_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .rounds
            .iter_mut()
            .find(|r| r.id == round_id && r.status == RoundStatus::Active)
        {
            Some(round) => {
                round.status = RoundStatus::Completed;
                round.completed_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn finalize_interview(
        &self,
        id: Uuid,
        final_score: Decimal,
        feedback: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.interviews.get_mut(&id) {
            Some(interview) if !interview.is_completed() => {
                interview.status = InterviewStatus::Completed;
                interview.final_score = Some(final_score);
                interview.feedback = Some(feedback.to_string());
                interview.completed_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn insert_question(&self, new: NewQuestion) -> Result<Option<Question>> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .questions
            .iter()
            .any(|q| q.interview_id == new.interview_id && q.question_text == new.question_text);
        if duplicate {
            return Ok(None);
        }

        let question = Question {
            id: Uuid::new_v4(),
            interview_id: new.interview_id,
            round_id: new.round_id,
            question_text: new.question_text,
            question_type: new.question_type,
            options: new.options,
            correct_answer: new.correct_answer,
            created_at: now(),
        };
        tables.questions.push(question.clone());
        Ok(Some(question))
    }

    async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn get_questions(&self, interview_id: Uuid, round_id: Uuid) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.interview_id == interview_id && q.round_id == round_id)
            .cloned()
            .collect())
    }

    async fn get_all_questions(&self, interview_id: Uuid) -> Result<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.interview_id == interview_id)
            .cloned()
            .collect())
    }

    async fn save_answer(&self, new: NewAnswer) -> Result<Answer> {
        let mut tables = self.tables.write().await;
        let submitted_at = now();

        if let Some(existing) = tables
            .answers
            .iter_mut()
            .find(|a| a.question_id == new.question_id)
        {
            existing.user_answer = new.user_answer;
            existing.score = new.score;
            existing.feedback = new.feedback;
            existing.submitted_at = submitted_at;
            return Ok(existing.clone());
        }

        let answer = Answer {
            id: Uuid::new_v4(),
            interview_id: new.interview_id,
            round_id: new.round_id,
            question_id: new.question_id,
            user_answer: new.user_answer,
            score: new.score,
            feedback: new.feedback,
            submitted_at,
        };
        tables.answers.push(answer.clone());
        Ok(answer)
    }

    async fn get_answers(&self, interview_id: Uuid) -> Result<Vec<Answer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| a.interview_id == interview_id)
            .cloned()
            .collect())
    }
}
