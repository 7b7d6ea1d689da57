use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;
use uuid::Uuid;

use crate::models::question::PublicQuestion;

type CacheKey = (Uuid, Uuid);

/// Sanitized question lists keyed by `(interview_id, round_id)`.
///
/// Bounded and time-limited; a miss only costs a store read, so entries may be
/// evicted at any time.
#[derive(Clone)]
pub struct QuestionCache {
    inner: Cache<CacheKey, Arc<Vec<PublicQuestion>>>,
}

impl QuestionCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn get(&self, interview_id: Uuid, round_id: Uuid) -> Option<Arc<Vec<PublicQuestion>>> {
        self.inner.get(&(interview_id, round_id))
    }

    pub fn insert(&self, interview_id: Uuid, round_id: Uuid, questions: Vec<PublicQuestion>) {
        self.inner.insert((interview_id, round_id), Arc::new(questions));
    }

    pub fn invalidate(&self, interview_id: Uuid, round_id: Uuid) {
        self.inner.invalidate(&(interview_id, round_id));
    }
}
