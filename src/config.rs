use crate::error::{Error, Result};
use crate::models::round::{RoundPlan, RoundType};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub storage_dir: String,
    pub storage_bucket: String,
    pub public_base_url: String,
    pub demo_user_id: String,
    pub questions_per_round: usize,
    pub question_cache_capacity: u64,
    pub question_cache_ttl_secs: u64,
    pub round_plan: Vec<RoundPlan>,
    pub max_upload_bytes: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

const DEFAULT_ROUND_PLAN: &str = "TECHNICAL:15,BEHAVIORAL:10,CODING:20";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:3001"),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            storage_dir: get_env_or("STORAGE_DIR", "local_storage"),
            storage_bucket: get_env_or("STORAGE_BUCKET", "ai-interview-resumes"),
            public_base_url: get_env_or("PUBLIC_BASE_URL", "http://localhost:3001"),
            demo_user_id: get_env_or("DEMO_USER_ID", "demo-user-123"),
            questions_per_round: get_env_parse_or("QUESTIONS_PER_ROUND", 5)?,
            question_cache_capacity: get_env_parse_or("QUESTION_CACHE_CAPACITY", 1000)?,
            question_cache_ttl_secs: get_env_parse_or("QUESTION_CACHE_TTL_SECS", 3600)?,
            round_plan: parse_round_plan(&get_env_or("ROUND_PLAN", DEFAULT_ROUND_PLAN))?,
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

/// Parses `TYPE:MINUTES` pairs separated by commas, keeping their order.
pub fn parse_round_plan(raw: &str) -> Result<Vec<RoundPlan>> {
    let mut plan = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (kind, minutes) = entry
            .split_once(':')
            .ok_or_else(|| Error::Config(format!("Invalid round plan entry: {}", entry)))?;
        let round_type: RoundType = kind
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid round plan entry {}: {}", entry, e)))?;
        let duration_minutes: i32 = minutes
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid duration in {}: {}", entry, e)))?;
        if duration_minutes <= 0 {
            return Err(Error::Config(format!(
                "Round duration must be positive: {}",
                entry
            )));
        }
        plan.push(RoundPlan {
            round_type,
            duration_minutes,
        });
    }

    if plan.is_empty() {
        return Err(Error::Config("Round plan must contain at least one round".to_string()));
    }
    Ok(plan)
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_plan_keeps_order() {
        let plan = parse_round_plan(DEFAULT_ROUND_PLAN).unwrap();
        let types: Vec<RoundType> = plan.iter().map(|p| p.round_type).collect();
        assert_eq!(
            types,
            vec![RoundType::Technical, RoundType::Behavioral, RoundType::Coding]
        );
        assert_eq!(plan[2].duration_minutes, 20);
    }

    #[test]
    fn round_plan_rejects_bad_entries() {
        assert!(parse_round_plan("TECHNICAL").is_err());
        assert!(parse_round_plan("TECHNICAL:0").is_err());
        assert!(parse_round_plan("SINGING:10").is_err());
        assert!(parse_round_plan(" , ").is_err());
    }

    #[test]
    fn round_plan_accepts_lowercase_and_spaces() {
        let plan = parse_round_plan("coding: 30 , technical:5").unwrap();
        assert_eq!(plan[0].round_type, RoundType::Coding);
        assert_eq!(plan[0].duration_minutes, 30);
        assert_eq!(plan[1].round_type, RoundType::Technical);
    }
}
