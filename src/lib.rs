pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::database::pool::{create_pool, run_migrations};
use crate::database::{MemoryStore, PgStore, Store};
use crate::models::round::RoundPlan;
use crate::services::{
    ai_service::{ContentGenerator, HeuristicGenerator},
    interview_service::{FinalizeLocks, InterviewService},
    question_cache::QuestionCache,
    question_service::QuestionService,
    resume_service::ResumeService,
    storage_service::{LocalObjectStorage, ObjectStorage},
};
use crate::utils::time::{Clock, SystemClock};

/// Process-scoped state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub storage: Arc<dyn ObjectStorage>,
    pub generator: Arc<dyn ContentGenerator>,
    pub question_cache: QuestionCache,
    pub clock: Arc<dyn Clock>,
    pub round_plan: Arc<Vec<RoundPlan>>,
    pub finalize_locks: FinalizeLocks,
    pub default_user_id: String,
}

impl AppState {
    /// Postgres when `DATABASE_URL` is set, otherwise the in-memory store.
    pub async fn from_config(config: &Config) -> crate::error::Result<Self> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let pool = create_pool(url).await?;
                run_migrations(&pool).await?;
                tracing::info!("Using Postgres store");
                Arc::new(PgStore::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let storage = LocalObjectStorage::new(
            &config.storage_dir,
            &config.storage_bucket,
            &config.public_base_url,
        );

        Ok(Self {
            store,
            storage: Arc::new(storage),
            generator: Arc::new(HeuristicGenerator::new(config.questions_per_round)),
            question_cache: QuestionCache::new(
                config.question_cache_capacity,
                Duration::from_secs(config.question_cache_ttl_secs),
            ),
            clock: Arc::new(SystemClock),
            round_plan: Arc::new(config.round_plan.clone()),
            finalize_locks: FinalizeLocks::new(),
            default_user_id: config.demo_user_id.clone(),
        })
    }

    pub fn resume_service(&self) -> ResumeService {
        ResumeService::new(self.store.clone(), self.storage.clone(), self.generator.clone())
    }

    pub fn question_service(&self) -> QuestionService {
        QuestionService::new(
            self.store.clone(),
            self.generator.clone(),
            self.question_cache.clone(),
        )
    }

    pub fn interview_service(&self) -> InterviewService {
        InterviewService::new(
            self.store.clone(),
            self.generator.clone(),
            self.clock.clone(),
            self.round_plan.clone(),
            self.finalize_locks.clone(),
        )
    }
}
