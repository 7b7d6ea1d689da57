use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "round_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundType {
    Technical,
    Behavioral,
    Coding,
}

impl RoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Technical => "TECHNICAL",
            RoundType::Behavioral => "BEHAVIORAL",
            RoundType::Coding => "CODING",
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TECHNICAL" => Ok(RoundType::Technical),
            "BEHAVIORAL" => Ok(RoundType::Behavioral),
            "CODING" => Ok(RoundType::Coding),
            other => Err(format!("unknown round type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "round_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Round {
    #[serde(rename = "round_id")]
    pub id: Uuid,
    pub interview_id: Uuid,
    pub position: i32,
    pub round_type: RoundType,
    pub status: RoundStatus,
    pub duration_minutes: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Round {
    /// True once more than `duration_minutes` have elapsed since activation.
    pub fn timer_expired(&self, now: DateTime<Utc>) -> bool {
        match self.started_at {
            Some(started) => {
                let elapsed_ms = (now - started).num_milliseconds();
                elapsed_ms > i64::from(self.duration_minutes) * 60_000
            }
            None => false,
        }
    }
}

/// One entry of the ordered round layout an interview is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPlan {
    pub round_type: RoundType,
    pub duration_minutes: i32,
}
