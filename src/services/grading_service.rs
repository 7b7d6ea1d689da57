use std::collections::{BTreeMap, HashMap};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::models::answer::Answer;
use crate::models::round::Round;

pub const MAX_SCORE: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub score: Decimal,
    pub feedback: String,
}

/// Per-round averages (one decimal, keyed by round label) and the overall score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub round_scores: BTreeMap<String, String>,
    pub final_score: Decimal,
}

pub struct GradingService;

impl GradingService {
    /// Exact-match grading for fixed-choice questions. No model call involved.
    pub fn grade_choice(correct_answer: Option<&str>, submitted: &str) -> Grade {
        match correct_answer {
            Some(correct) if correct == submitted => Grade {
                score: Decimal::from(MAX_SCORE),
                feedback: "Correct".to_string(),
            },
            Some(correct) => Grade {
                score: Decimal::ZERO,
                feedback: format!("Correct was: {}", correct),
            },
            None => Grade {
                score: Decimal::ZERO,
                feedback: "No answer key recorded for this question".to_string(),
            },
        }
    }

    /// Clamps a model-produced score into `[0, 10]`. Non-finite input becomes 0.
    pub fn normalize_score(raw: f64) -> Decimal {
        let clamped = if raw.is_finite() {
            raw.clamp(0.0, MAX_SCORE as f64)
        } else {
            0.0
        };
        Decimal::from_f64(clamped)
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Rounds with no answers are left out; the final score is the mean of
    /// the remaining round means, or 0 when nothing was answered.
    pub fn aggregate(rounds: &[Round], answers: &[Answer]) -> ScoreSummary {
        let mut by_round: HashMap<Uuid, Vec<Decimal>> = HashMap::new();
        for answer in answers {
            by_round.entry(answer.round_id).or_default().push(answer.score);
        }

        let mut round_scores = BTreeMap::new();
        let mut means = Vec::new();

        for round in rounds {
            let Some(scores) = by_round.get(&round.id).filter(|s| !s.is_empty()) else {
                continue;
            };
            let mean = scores.iter().copied().sum::<Decimal>() / Decimal::from(scores.len());
            means.push(mean);

            let mut label = round.round_type.as_str().to_string();
            if round_scores.contains_key(&label) {
                label = format!("{}_{}", label, round.position + 1);
            }
            round_scores.insert(label, one_decimal(mean).to_string());
        }

        let final_score = if means.is_empty() {
            one_decimal(Decimal::ZERO)
        } else {
            one_decimal(means.iter().copied().sum::<Decimal>() / Decimal::from(means.len()))
        };

        ScoreSummary {
            round_scores,
            final_score,
        }
    }
}

/// Half-up to one decimal place, always carrying the decimal digit ("7.0").
pub fn one_decimal(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded
}
