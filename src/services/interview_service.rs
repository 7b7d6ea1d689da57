//! The interview session engine.
//!
//! Rounds move `PENDING -> ACTIVE -> COMPLETED` through conditional store
//! updates. Status reads drive the machine forward; answer submission shares
//! the same completion check.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::database::Store;
use crate::error::{Error, Result};
use crate::models::answer::{Answer, NewAnswer};
use crate::models::interview::{Interview, InterviewStatus, NewInterview};
use crate::models::round::{Round, RoundPlan, RoundStatus};
use crate::services::ai_service::{AnswerEvaluationRequest, ContentGenerator, FeedbackRequest};
use crate::services::grading_service::{GradingService, Grade};
use crate::utils::time::Clock;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub interview_id: Uuid,
    pub status: InterviewStatus,
    pub active_round: Option<Round>,
    pub rounds: Vec<Round>,
    #[serde(rename = "total_score")]
    pub total_score: Option<Decimal>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AnswerSubmission {
    pub round_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub score: Decimal,
    pub feedback: String,
    pub round_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    AllAnswered,
    TimerExpired,
}

/// Per-interview finalization locks shared by every service built from the
/// same state. Only one caller at a time summarizes a given interview.
#[derive(Clone, Default)]
pub struct FinalizeLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl FinalizeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn acquire(&self, interview_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(interview_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drops the entry once the interview is final. Waiters still holding the
    /// old lock re-read the interview and find it completed.
    fn release(&self, interview_id: Uuid) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&interview_id);
    }
}

#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn Store>,
    generator: Arc<dyn ContentGenerator>,
    clock: Arc<dyn Clock>,
    round_plan: Arc<Vec<RoundPlan>>,
    finalize_locks: FinalizeLocks,
}

impl InterviewService {
    pub fn new(
        store: Arc<dyn Store>,
        generator: Arc<dyn ContentGenerator>,
        clock: Arc<dyn Clock>,
        round_plan: Arc<Vec<RoundPlan>>,
        finalize_locks: FinalizeLocks,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
            round_plan,
            finalize_locks,
        }
    }

    pub async fn start_interview(
        &self,
        user_id: &str,
        resume_id: Uuid,
        job_role: &str,
    ) -> Result<(Interview, Vec<Round>)> {
        if self.store.get_resume(resume_id).await?.is_none() {
            return Err(Error::NotFound("Resume not found".to_string()));
        }

        let (interview, rounds) = self
            .store
            .create_interview(
                NewInterview {
                    user_id: user_id.to_string(),
                    resume_id,
                    job_role: job_role.to_string(),
                },
                &self.round_plan,
            )
            .await?;

        tracing::info!(
            interview_id = %interview.id,
            rounds = rounds.len(),
            job_role = %interview.job_role,
            "Interview session created"
        );
        Ok((interview, rounds))
    }

    /// Returns the session snapshot, advancing the state machine by at most
    /// one completion, one activation and one finalization.
    pub async fn status(&self, interview_id: Uuid) -> Result<SessionSnapshot> {
        let mut interview = self.load_interview(interview_id).await?;
        let mut rounds = self.store.get_rounds(interview_id).await?;
        let now = self.clock.now();

        let mut active = rounds.iter().find(|r| r.status == RoundStatus::Active).cloned();

        let due = match &active {
            Some(round) => self
                .completion_due(round, now)
                .await?
                .map(|reason| (round.clone(), reason)),
            None => None,
        };
        if let Some((round, reason)) = due {
            self.complete(&round, reason, now).await?;
            // Even when another caller completed it first, the snapshot read
            // above is stale.
            rounds = self.store.get_rounds(interview_id).await?;
            active = rounds.iter().find(|r| r.status == RoundStatus::Active).cloned();
        }

        if active.is_none() {
            let next = rounds.iter().find(|r| r.status == RoundStatus::Pending).map(|r| r.id);
            if let Some(pending_id) = next {
                if self.store.activate_round(pending_id, now).await? {
                    tracing::info!(%interview_id, round_id = %pending_id, "Round activated");
                }
                // Winner or loser, the stored state is authoritative.
                rounds = self.store.get_rounds(interview_id).await?;
                active = rounds.iter().find(|r| r.status == RoundStatus::Active).cloned();
            }
        }

        let pending_left = rounds.iter().any(|r| r.status == RoundStatus::Pending);
        if active.is_none() && !pending_left && !interview.is_completed() {
            interview = self.finalize(&interview, &rounds).await?;
        }

        Ok(SessionSnapshot {
            interview_id: interview.id,
            status: interview.status,
            active_round: active,
            rounds,
            total_score: interview.final_score,
            feedback: interview.feedback,
        })
    }

    /// Completes an `ACTIVE` round when every question is answered or its
    /// timer ran out. Returns the reason when this call moved the round.
    pub async fn try_complete_round(
        &self,
        round: &Round,
        now: DateTime<Utc>,
    ) -> Result<Option<CompletionReason>> {
        match self.completion_due(round, now).await? {
            Some(reason) if self.complete(round, reason, now).await? => Ok(Some(reason)),
            _ => Ok(None),
        }
    }

    async fn completion_due(
        &self,
        round: &Round,
        now: DateTime<Utc>,
    ) -> Result<Option<CompletionReason>> {
        if round.status != RoundStatus::Active {
            return Ok(None);
        }
        if self.all_answered(round).await? {
            Ok(Some(CompletionReason::AllAnswered))
        } else if round.timer_expired(now) {
            Ok(Some(CompletionReason::TimerExpired))
        } else {
            Ok(None)
        }
    }

    async fn complete(
        &self,
        round: &Round,
        reason: CompletionReason,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let completed = self.store.complete_round(round.id, now).await?;
        if completed {
            tracing::info!(
                interview_id = %round.interview_id,
                round_id = %round.id,
                ?reason,
                "Round completed"
            );
        }
        Ok(completed)
    }

    async fn all_answered(&self, round: &Round) -> Result<bool> {
        let questions = self.store.get_questions(round.interview_id, round.id).await?;
        if questions.is_empty() {
            return Ok(false);
        }
        let answered = self
            .store
            .get_answers(round.interview_id)
            .await?
            .into_iter()
            .filter(|a| a.round_id == round.id)
            .count();
        Ok(answered >= questions.len())
    }

    async fn finalize(&self, interview: &Interview, rounds: &[Round]) -> Result<Interview> {
        let _guard = self.finalize_locks.acquire(interview.id).await;
        let current = self.load_interview(interview.id).await?;
        if current.is_completed() {
            return Ok(current);
        }

        let answers = self.store.get_answers(interview.id).await?;
        let summary = GradingService::aggregate(rounds, &answers);

        let feedback = self
            .generator
            .summarize_feedback(&FeedbackRequest {
                role: interview.job_role.clone(),
                round_scores: summary.round_scores.clone(),
                final_score: summary.final_score,
            })
            .await?;

        let finalized = self
            .store
            .finalize_interview(interview.id, summary.final_score, &feedback, self.clock.now())
            .await?;
        if finalized {
            tracing::info!(
                interview_id = %interview.id,
                final_score = %summary.final_score,
                "Interview finalized"
            );
        }
        self.finalize_locks.release(interview.id);

        self.load_interview(interview.id).await
    }

    pub async fn submit_answer(
        &self,
        interview_id: Uuid,
        submission: AnswerSubmission,
    ) -> Result<SubmissionResult> {
        self.load_interview(interview_id).await?;

        let question = self
            .store
            .get_question(submission.question_id)
            .await?
            .filter(|q| q.interview_id == interview_id && q.round_id == submission.round_id)
            .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        let round = self
            .store
            .get_rounds(interview_id)
            .await?
            .into_iter()
            .find(|r| r.id == submission.round_id)
            .ok_or_else(|| Error::NotFound("Round not found".to_string()))?;
        if round.status == RoundStatus::Completed {
            return Err(Error::BadRequest("Round is already completed".to_string()));
        }

        let grade = if question.question_type.is_choice() {
            GradingService::grade_choice(question.correct_answer.as_deref(), &submission.answer)
        } else {
            let evaluation = self
                .generator
                .evaluate_answer(&AnswerEvaluationRequest {
                    question_text: question.question_text.clone(),
                    answer: submission.answer.clone(),
                    question_type: question.question_type,
                })
                .await?;
            Grade {
                score: GradingService::normalize_score(evaluation.score),
                feedback: evaluation.feedback,
            }
        };

        let saved = self
            .store
            .save_answer(NewAnswer {
                interview_id,
                round_id: round.id,
                question_id: question.id,
                user_answer: submission.answer,
                score: grade.score,
                feedback: grade.feedback,
            })
            .await?;

        let round_completed = self
            .try_complete_round(&round, self.clock.now())
            .await?
            .is_some();

        Ok(SubmissionResult {
            score: saved.score,
            feedback: saved.feedback,
            round_completed,
        })
    }

    pub async fn list_answers(&self, interview_id: Uuid, round_id: Option<Uuid>) -> Result<Vec<Answer>> {
        let answers = self.store.get_answers(interview_id).await?;
        Ok(match round_id {
            Some(round_id) => answers.into_iter().filter(|a| a.round_id == round_id).collect(),
            None => answers,
        })
    }

    async fn load_interview(&self, interview_id: Uuid) -> Result<Interview> {
        self.store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InterviewStore, MemoryStore, QuestionStore, ResumeStore};
    use crate::models::interview::NewInterview;
    use crate::models::question::{NewQuestion, Question, QuestionType};
    use crate::models::resume::{Resume, ResumeExtraction};
    use crate::models::round::RoundType;
    use crate::services::ai_service::{
        Evaluation, GeneratedQuestion, MockContentGenerator, QuestionBatchRequest,
    };
    use crate::utils::time::ManualClock;
    use chrono::Duration;
    use std::collections::BTreeMap;
    use tokio_test::{assert_err, assert_ok};

    struct Harness {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        service: InterviewService,
        interview_id: Uuid,
        round_ids: Vec<Uuid>,
    }

    fn plan(types: &[RoundType]) -> Vec<RoundPlan> {
        types
            .iter()
            .map(|&round_type| RoundPlan {
                round_type,
                duration_minutes: 10,
            })
            .collect()
    }

    async fn harness(types: &[RoundType], generator: MockContentGenerator) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = InterviewService::new(
            store.clone(),
            Arc::new(generator),
            clock.clone(),
            Arc::new(plan(types)),
            FinalizeLocks::new(),
        );
        let resume = store.create_resume("demo-user-123", "key").await.unwrap();
        let (interview, rounds) = service
            .start_interview("demo-user-123", resume.id, "Backend Engineer")
            .await
            .unwrap();
        Harness {
            store,
            clock,
            service,
            interview_id: interview.id,
            round_ids: rounds.iter().map(|r| r.id).collect(),
        }
    }

    async fn add_question(h: &Harness, round: usize, text: &str, qtype: QuestionType) -> Question {
        let (options, correct_answer) = match qtype {
            QuestionType::Mcq => (vec!["A".to_string(), "B".to_string()], Some("B".to_string())),
            _ => (vec![], None),
        };
        h.store
            .insert_question(NewQuestion {
                interview_id: h.interview_id,
                round_id: h.round_ids[round],
                question_text: text.into(),
                question_type: qtype,
                options,
                correct_answer,
            })
            .await
            .unwrap()
            .unwrap()
    }

    fn submission(q: &Question, answer: &str) -> AnswerSubmission {
        AnswerSubmission {
            round_id: q.round_id,
            question_id: q.id,
            answer: answer.into(),
        }
    }

    fn statuses(snapshot: &SessionSnapshot) -> Vec<RoundStatus> {
        snapshot.rounds.iter().map(|r| r.status).collect()
    }

    #[tokio::test]
    async fn unknown_interview_is_not_found() {
        let h = harness(&[RoundType::Technical], MockContentGenerator::new()).await;
        assert!(matches!(
            h.service.status(Uuid::new_v4()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn start_requires_existing_resume() {
        let h = harness(&[RoundType::Technical], MockContentGenerator::new()).await;
        assert!(matches!(
            h.service.start_interview("u", Uuid::new_v4(), "Dev").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rounds_activate_in_order_one_at_a_time() {
        let h = harness(
            &[RoundType::Technical, RoundType::Behavioral, RoundType::Coding],
            MockContentGenerator::new(),
        )
        .await;

        let first = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(
            statuses(&first),
            vec![RoundStatus::Active, RoundStatus::Pending, RoundStatus::Pending]
        );
        assert_eq!(first.active_round.as_ref().map(|r| r.id), Some(h.round_ids[0]));

        // Without answers or elapsed time nothing moves.
        let again = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(statuses(&again), statuses(&first));
        assert_eq!(
            again.rounds.iter().filter(|r| r.status == RoundStatus::Active).count(),
            1
        );
    }

    #[tokio::test]
    async fn answered_round_completes_and_next_one_activates() {
        let h = harness(&[RoundType::Behavioral, RoundType::Coding], MockContentGenerator::new()).await;
        assert_ok!(h.service.status(h.interview_id).await);

        let q1 = add_question(&h, 0, "Q1", QuestionType::OpenEnded).await;
        let q2 = add_question(&h, 0, "Q2", QuestionType::OpenEnded).await;
        h.store
            .save_answer(NewAnswer {
                interview_id: h.interview_id,
                round_id: q1.round_id,
                question_id: q1.id,
                user_answer: "a".into(),
                score: Decimal::from(5),
                feedback: String::new(),
            })
            .await
            .unwrap();
        h.store
            .save_answer(NewAnswer {
                interview_id: h.interview_id,
                round_id: q2.round_id,
                question_id: q2.id,
                user_answer: "b".into(),
                score: Decimal::from(5),
                feedback: String::new(),
            })
            .await
            .unwrap();

        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(statuses(&snapshot), vec![RoundStatus::Completed, RoundStatus::Active]);

        // A completed round is never re-opened.
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(snapshot.rounds[0].status, RoundStatus::Completed);
    }

    #[tokio::test]
    async fn expired_timer_completes_round_without_answers() {
        let h = harness(&[RoundType::Technical, RoundType::Coding], MockContentGenerator::new()).await;
        assert_ok!(h.service.status(h.interview_id).await);

        h.clock.advance(Duration::minutes(10));
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(snapshot.rounds[0].status, RoundStatus::Active);

        h.clock.advance(Duration::seconds(1));
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(statuses(&snapshot), vec![RoundStatus::Completed, RoundStatus::Active]);
    }

    #[tokio::test]
    async fn round_without_questions_only_completes_by_timer() {
        let h = harness(&[RoundType::Technical], MockContentGenerator::new()).await;
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        let active = snapshot.active_round.unwrap();

        let reason = assert_ok!(h.service.try_complete_round(&active, h.clock.now()).await);
        assert_eq!(reason, None);

        h.clock.advance(Duration::minutes(11));
        let reason = assert_ok!(h.service.try_complete_round(&active, h.clock.now()).await);
        assert_eq!(reason, Some(CompletionReason::TimerExpired));

        // Second attempt is a no-op.
        let reason = assert_ok!(h.service.try_complete_round(&active, h.clock.now()).await);
        assert_eq!(reason, None);
    }

    #[tokio::test]
    async fn full_session_aggregates_scores_and_summarizes_once() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_evaluate_answer()
            .withf(|req| req.answer == "first")
            .returning(|_| {
                Ok(Evaluation {
                    score: 8.0,
                    feedback: "good".into(),
                })
            });
        generator
            .expect_evaluate_answer()
            .withf(|req| req.answer == "second")
            .returning(|_| {
                Ok(Evaluation {
                    score: 6.0,
                    feedback: "fine".into(),
                })
            });
        generator
            .expect_summarize_feedback()
            .withf(|req| {
                let mut expected = BTreeMap::new();
                expected.insert("TECHNICAL".to_string(), "7.0".to_string());
                req.round_scores == expected
                    && req.final_score == Decimal::new(70, 1)
                    && req.role == "Backend Engineer"
            })
            .times(1)
            .returning(|_| Ok("Well done".into()));

        let h = harness(
            &[RoundType::Technical, RoundType::Behavioral, RoundType::Coding],
            generator,
        )
        .await;

        assert_ok!(h.service.status(h.interview_id).await);
        let q1 = add_question(&h, 0, "Explain borrowing", QuestionType::OpenEnded).await;
        let q2 = add_question(&h, 0, "Explain lifetimes", QuestionType::OpenEnded).await;

        let r1 = assert_ok!(h.service.submit_answer(h.interview_id, submission(&q1, "first")).await);
        assert!(!r1.round_completed);
        let r2 = assert_ok!(h.service.submit_answer(h.interview_id, submission(&q2, "second")).await);
        assert!(r2.round_completed);

        // Activates round 2.
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(snapshot.active_round.as_ref().map(|r| r.id), Some(h.round_ids[1]));

        // Round 2 times out, round 3 activates.
        h.clock.advance(Duration::minutes(11));
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(snapshot.active_round.as_ref().map(|r| r.id), Some(h.round_ids[2]));
        assert_eq!(snapshot.status, InterviewStatus::Started);

        // Round 3 times out, interview finalizes.
        h.clock.advance(Duration::minutes(11));
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(snapshot.status, InterviewStatus::Completed);
        assert!(snapshot.active_round.is_none());
        assert_eq!(snapshot.total_score.map(|s| s.to_string()), Some("7.0".to_string()));
        assert_eq!(snapshot.feedback.as_deref(), Some("Well done"));

        // Further reads do not summarize again.
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);
        assert_eq!(snapshot.status, InterviewStatus::Completed);
    }

    #[tokio::test]
    async fn no_answers_at_all_finalizes_with_zero() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_summarize_feedback()
            .withf(|req| req.round_scores.is_empty() && req.final_score == Decimal::ZERO)
            .times(1)
            .returning(|_| Ok("No data".into()));
        let h = harness(&[RoundType::Technical], generator).await;

        assert_ok!(h.service.status(h.interview_id).await);
        h.clock.advance(Duration::minutes(11));
        let snapshot = assert_ok!(h.service.status(h.interview_id).await);

        assert_eq!(snapshot.status, InterviewStatus::Completed);
        assert_eq!(snapshot.total_score, Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn mcq_is_graded_against_stored_answer_without_the_model() {
        // No evaluate_answer expectation: a model call would panic.
        let h = harness(&[RoundType::Technical], MockContentGenerator::new()).await;
        assert_ok!(h.service.status(h.interview_id).await);
        let q = add_question(&h, 0, "Pick", QuestionType::Mcq).await;
        add_question(&h, 0, "Other", QuestionType::Mcq).await;

        let wrong = assert_ok!(h.service.submit_answer(h.interview_id, submission(&q, "A")).await);
        assert_eq!(wrong.score, Decimal::ZERO);
        assert!(wrong.feedback.contains('B'));

        let right = assert_ok!(h.service.submit_answer(h.interview_id, submission(&q, "B")).await);
        assert_eq!(right.score, Decimal::from(10));
        assert_eq!(right.feedback, "Correct");

        // Resubmission replaced the earlier answer.
        let answers = assert_ok!(h.service.list_answers(h.interview_id, None).await);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].user_answer, "B");
    }

    #[tokio::test]
    async fn submission_to_completed_round_is_rejected() {
        let h = harness(&[RoundType::Technical, RoundType::Coding], MockContentGenerator::new()).await;
        assert_ok!(h.service.status(h.interview_id).await);
        let q = add_question(&h, 0, "Pick", QuestionType::Mcq).await;

        assert_ok!(h.service.submit_answer(h.interview_id, submission(&q, "B")).await);

        let err = assert_err!(h.service.submit_answer(h.interview_id, submission(&q, "A")).await);
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn question_from_another_round_is_not_found() {
        let h = harness(&[RoundType::Technical, RoundType::Coding], MockContentGenerator::new()).await;
        let q = add_question(&h, 0, "Pick", QuestionType::Mcq).await;

        let mut wrong_round = submission(&q, "B");
        wrong_round.round_id = h.round_ids[1];
        let err = assert_err!(h.service.submit_answer(h.interview_id, wrong_round).await);
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn listing_answers_filters_by_round() {
        let h = harness(&[RoundType::Technical, RoundType::Coding], MockContentGenerator::new()).await;
        let q1 = add_question(&h, 0, "One", QuestionType::Mcq).await;
        let q2 = add_question(&h, 1, "Two", QuestionType::Mcq).await;
        add_question(&h, 0, "Spare", QuestionType::Mcq).await;
        add_question(&h, 1, "Spare two", QuestionType::Mcq).await;

        assert_ok!(h.service.submit_answer(h.interview_id, submission(&q1, "B")).await);
        assert_ok!(h.service.submit_answer(h.interview_id, submission(&q2, "A")).await);

        let round_one = assert_ok!(h.service.list_answers(h.interview_id, Some(h.round_ids[0])).await);
        assert_eq!(round_one.len(), 1);
        assert_eq!(round_one[0].question_id, q1.id);
        assert_eq!(assert_ok!(h.service.list_answers(h.interview_id, None).await).len(), 2);
    }

    /// Delegates to a memory store, but every `complete_round` is won by a
    /// concurrent caller: the round is completed and this caller sees `false`.
    struct LosingCompletionStore(Arc<MemoryStore>);

    #[async_trait::async_trait]
    impl ResumeStore for LosingCompletionStore {
        async fn create_resume(&self, user_id: &str, object_key: &str) -> Result<Resume> {
            self.0.create_resume(user_id, object_key).await
        }

        async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>> {
            self.0.get_resume(id).await
        }

        async fn update_parsed_data(&self, id: Uuid, extraction: &ResumeExtraction) -> Result<Resume> {
            self.0.update_parsed_data(id, extraction).await
        }

        async fn update_selected_role(&self, id: Uuid, role: &str) -> Result<Resume> {
            self.0.update_selected_role(id, role).await
        }
    }

    #[async_trait::async_trait]
    impl InterviewStore for LosingCompletionStore {
        async fn create_interview(
            &self,
            new: NewInterview,
            plan: &[RoundPlan],
        ) -> Result<(Interview, Vec<Round>)> {
            self.0.create_interview(new, plan).await
        }

        async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
            self.0.get_interview(id).await
        }

        async fn get_rounds(&self, interview_id: Uuid) -> Result<Vec<Round>> {
            self.0.get_rounds(interview_id).await
        }

        async fn activate_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool> {
            self.0.activate_round(round_id, at).await
        }

        async fn complete_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool> {
            self.0.complete_round(round_id, at).await?;
            Ok(false)
        }

        async fn finalize_interview(
            &self,
            id: Uuid,
            final_score: Decimal,
            feedback: &str,
            at: DateTime<Utc>,
        ) -> Result<bool> {
            self.0.finalize_interview(id, final_score, feedback, at).await
        }
    }

    #[async_trait::async_trait]
    impl QuestionStore for LosingCompletionStore {
        async fn insert_question(&self, new: NewQuestion) -> Result<Option<Question>> {
            self.0.insert_question(new).await
        }

        async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
            self.0.get_question(id).await
        }

        async fn get_questions(&self, interview_id: Uuid, round_id: Uuid) -> Result<Vec<Question>> {
            self.0.get_questions(interview_id, round_id).await
        }

        async fn get_all_questions(&self, interview_id: Uuid) -> Result<Vec<Question>> {
            self.0.get_all_questions(interview_id).await
        }

        async fn save_answer(&self, new: NewAnswer) -> Result<Answer> {
            self.0.save_answer(new).await
        }

        async fn get_answers(&self, interview_id: Uuid) -> Result<Vec<Answer>> {
            self.0.get_answers(interview_id).await
        }
    }

    /// Yields to the scheduler before summarizing so concurrent callers
    /// interleave inside finalization.
    struct YieldingGenerator(MockContentGenerator);

    #[async_trait::async_trait]
    impl ContentGenerator for YieldingGenerator {
        async fn extract_resume(&self, document: &[u8]) -> Result<ResumeExtraction> {
            self.0.extract_resume(document).await
        }

        async fn generate_questions(
            &self,
            request: &QuestionBatchRequest,
        ) -> Result<Vec<GeneratedQuestion>> {
            self.0.generate_questions(request).await
        }

        async fn evaluate_answer(&self, request: &AnswerEvaluationRequest) -> Result<Evaluation> {
            self.0.evaluate_answer(request).await
        }

        async fn summarize_feedback(&self, request: &FeedbackRequest) -> Result<String> {
            tokio::task::yield_now().await;
            self.0.summarize_feedback(request).await
        }
    }

    #[tokio::test]
    async fn status_rereads_rounds_after_losing_a_completion() {
        let h = harness(&[RoundType::Technical, RoundType::Coding], MockContentGenerator::new()).await;
        assert_ok!(h.service.status(h.interview_id).await);

        let losing = InterviewService::new(
            Arc::new(LosingCompletionStore(h.store.clone())),
            Arc::new(MockContentGenerator::new()),
            h.clock.clone(),
            Arc::new(plan(&[RoundType::Technical, RoundType::Coding])),
            FinalizeLocks::new(),
        );

        h.clock.advance(Duration::minutes(11));
        let snapshot = assert_ok!(losing.status(h.interview_id).await);
        assert_eq!(statuses(&snapshot), vec![RoundStatus::Completed, RoundStatus::Active]);
        assert_eq!(snapshot.active_round.as_ref().map(|r| r.id), Some(h.round_ids[1]));
    }

    #[tokio::test]
    async fn concurrent_status_reads_summarize_once() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_summarize_feedback()
            .times(1)
            .returning(|_| Ok("Once".into()));

        let h = harness(&[RoundType::Technical], MockContentGenerator::new()).await;
        let service = InterviewService::new(
            h.store.clone(),
            Arc::new(YieldingGenerator(generator)),
            h.clock.clone(),
            Arc::new(plan(&[RoundType::Technical])),
            FinalizeLocks::new(),
        );
        assert_ok!(service.status(h.interview_id).await);
        h.clock.advance(Duration::minutes(11));

        let (first, second) = tokio::join!(service.status(h.interview_id), service.status(h.interview_id));
        let first = assert_ok!(first);
        let second = assert_ok!(second);

        for snapshot in [first, second] {
            assert_eq!(snapshot.status, InterviewStatus::Completed);
            assert_eq!(snapshot.feedback.as_deref(), Some("Once"));
        }
    }
}
