use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::{InterviewStore, QuestionStore, ResumeStore};
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::interview::{Interview, InterviewStatus, NewInterview};
use crate::models::question::{NewQuestion, Question};
use crate::models::resume::{Resume, ResumeExtraction};
use crate::models::round::{Round, RoundPlan, RoundStatus};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn create_resume(&self, user_id: &str, object_key: &str) -> Result<Resume> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (id, user_id, object_key)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(object_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(resume)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        let resume = sqlx::query_as::<_, Resume>(r#"SELECT * FROM resumes WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(resume)
    }

    async fn update_parsed_data(&self, id: Uuid, extraction: &ResumeExtraction) -> Result<Resume> {
        sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
            SET parsed_skills = $2, parsed_projects = $3, recommended_roles = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&extraction.skills)
        .bind(&extraction.projects)
        .bind(&extraction.recommended_roles)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Resume not found".to_string()))
    }

    async fn update_selected_role(&self, id: Uuid, role: &str) -> Result<Resume> {
        sqlx::query_as::<_, Resume>(
            r#"UPDATE resumes SET selected_role = $2 WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Resume not found".to_string()))
    }
}

#[async_trait]
impl InterviewStore for PgStore {
    async fn create_interview(
        &self,
        new: NewInterview,
        plan: &[RoundPlan],
    ) -> Result<(Interview, Vec<Round>)> {
        let mut tx = self.pool.begin().await?;

        let interview = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews (id, user_id, resume_id, job_role, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.user_id)
        .bind(new.resume_id)
        .bind(&new.job_role)
        .bind(InterviewStatus::Started)
        .fetch_one(&mut *tx)
        .await?;

        let mut rounds = Vec::with_capacity(plan.len());
        for (position, entry) in plan.iter().enumerate() {
            let round = sqlx::query_as::<_, Round>(
                r#"
                INSERT INTO interview_rounds (id, interview_id, position, round_type, status, duration_minutes)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(interview.id)
            .bind(position as i32)
            .bind(entry.round_type)
            .bind(RoundStatus::Pending)
            .bind(entry.duration_minutes)
            .fetch_one(&mut *tx)
            .await?;
            rounds.push(round);
        }

        tx.commit().await?;
        Ok((interview, rounds))
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let interview =
            sqlx::query_as::<_, Interview>(r#"SELECT * FROM interviews WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(interview)
    }

    async fn get_rounds(&self, interview_id: Uuid) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>(
            r#"SELECT * FROM interview_rounds WHERE interview_id = $1 ORDER BY position ASC"#,
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rounds)
    }

    async fn activate_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE interview_rounds
            SET status = 'ACTIVE', started_at = $2
            WHERE id = $1
              AND status = 'PENDING'
              AND NOT EXISTS (
                  SELECT 1 FROM interview_rounds other
                  WHERE other.interview_id = interview_rounds.interview_id
                    AND other.status = 'ACTIVE'
              )
            "#,
        )
        .bind(round_id)
        .bind(at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() == 1),
            // Lost the race against a concurrent activation in the same interview.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn complete_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let done = sqlx::query(
            r#"
            UPDATE interview_rounds
            SET status = 'COMPLETED', completed_at = $2
            WHERE id = $1 AND status = 'ACTIVE'
            "#,
        )
        .bind(round_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(done.rows_affected() == 1)
    }

    async fn finalize_interview(
        &self,
        id: Uuid,
        final_score: Decimal,
        feedback: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let done = sqlx::query(
            r#"
            UPDATE interviews
            SET status = 'COMPLETED', final_score = $2, feedback = $3, completed_at = $4
            WHERE id = $1 AND status <> 'COMPLETED'
            "#,
        )
        .bind(id)
        .bind(final_score)
        .bind(feedback)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(done.rows_affected() == 1)
    }
}

#[async_trait]
impl QuestionStore for PgStore {
    async fn insert_question(&self, new: NewQuestion) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (id, interview_id, round_id, question_text, question_type, options, correct_answer)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (interview_id, question_text) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.interview_id)
        .bind(new.round_id)
        .bind(&new.question_text)
        .bind(new.question_type)
        .bind(&new.options)
        .bind(&new.correct_answer)
        .fetch_optional(&self.pool)
        .await?;
        Ok(question)
    }

    async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(r#"SELECT * FROM questions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(question)
    }

    async fn get_questions(&self, interview_id: Uuid, round_id: Uuid) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT * FROM questions
            WHERE interview_id = $1 AND round_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(interview_id)
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn get_all_questions(&self, interview_id: Uuid) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE interview_id = $1 ORDER BY created_at ASC, id ASC"#,
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn save_answer(&self, new: NewAnswer) -> Result<Answer> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (id, interview_id, round_id, question_id, user_answer, score, feedback)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (question_id) DO UPDATE
            SET user_answer = EXCLUDED.user_answer,
                score = EXCLUDED.score,
                feedback = EXCLUDED.feedback,
                submitted_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.interview_id)
        .bind(new.round_id)
        .bind(new.question_id)
        .bind(&new.user_answer)
        .bind(new.score)
        .bind(&new.feedback)
        .fetch_one(&self.pool)
        .await?;
        Ok(answer)
    }

    async fn get_answers(&self, interview_id: Uuid) -> Result<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"SELECT * FROM answers WHERE interview_id = $1 ORDER BY submitted_at ASC"#,
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(answers)
    }
}
