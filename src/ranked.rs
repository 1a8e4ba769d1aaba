//! Ranked-mode scoring: accuracy and time efficiency weighted by difficulty.
//!
//! Independent of the psychometric engine. The intro stage (index 0) is never
//! scored.

use serde::{Deserialize, Serialize};

use crate::config::RankedConfig;
use crate::responses::{Accuracy, ResponseData};
use crate::stages::{stage_at, StageDefinition, StageType};

/// Floor on the measured response time, in ms.
pub const MIN_ACTUAL_TIME_MS: u64 = 1000;
pub const MAX_EFFICIENCY: f64 = 150.0;
/// Difficulty assumed when a response has no stage definition.
const FALLBACK_DIFFICULTY: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn for_score(total: f64) -> Self {
        if total >= 95.0 {
            Grade::S
        } else if total >= 85.0 {
            Grade::A
        } else if total >= 75.0 {
            Grade::B
        } else if total >= 60.0 {
            Grade::C
        } else if total >= 40.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStageScore {
    pub stage: usize,
    pub stage_type: Option<StageType>,
    pub accuracy: f64,
    pub efficiency: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScore {
    pub total_score: f64,
    pub accuracy_score: f64,
    pub efficiency_score: f64,
    pub grade: Grade,
    pub elo_input: u32,
    pub stages: Vec<RankedStageScore>,
}

/// Accuracy on 0..=100: booleans map to 100/0, graded values are clamped,
/// anything else scores 50.
pub fn normalize_accuracy(accuracy: Accuracy) -> f64 {
    match accuracy {
        Accuracy::Flag(true) => 100.0,
        Accuracy::Flag(false) => 0.0,
        Accuracy::Graded(v) if v.is_finite() => v.clamp(0.0, 100.0),
        Accuracy::Graded(_) | Accuracy::Unknown => 50.0,
    }
}

/// `50 + 50 * log2(expected / actual + 0.5)`, clamped to 0..=150.
pub fn time_efficiency(expected_ms: u64, latency_ms: u64) -> f64 {
    let actual = latency_ms.max(MIN_ACTUAL_TIME_MS) as f64;
    let ratio = expected_ms as f64 / actual;
    (50.0 + 50.0 * (ratio + 0.5).log2()).clamp(0.0, MAX_EFFICIENCY)
}

pub fn calculate_ranked_score(
    responses: &[ResponseData],
    stages: &[StageDefinition],
) -> RankedScore {
    calculate_ranked_score_with(responses, stages, &RankedConfig::default())
}

pub fn calculate_ranked_score_with(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    cfg: &RankedConfig,
) -> RankedScore {
    let mut per_stage = Vec::new();
    let mut weight_sum = 0.0;
    let mut accuracy_acc = 0.0;
    let mut efficiency_acc = 0.0;

    for r in responses.iter().filter(|r| r.stage > 0) {
        let stage = stage_at(stages, r.stage);
        let stage_type = stage.map(|s| s.stage_type);
        let difficulty = stage.map_or(FALLBACK_DIFFICULTY, |s| s.difficulty);

        let accuracy = normalize_accuracy(r.accuracy);
        let efficiency = time_efficiency(cfg.expected_time_for(stage_type), r.latency_ms);
        let weight = cfg.difficulty_weight(difficulty);

        weight_sum += weight;
        accuracy_acc += accuracy * weight;
        efficiency_acc += efficiency * weight;

        per_stage.push(RankedStageScore {
            stage: r.stage,
            stage_type,
            accuracy,
            efficiency,
            weight,
            weighted_score: accuracy * cfg.accuracy_share + efficiency * cfg.efficiency_share,
        });
    }

    let (accuracy_score, efficiency_score) = if weight_sum > 0.0 {
        (accuracy_acc / weight_sum, efficiency_acc / weight_sum)
    } else {
        (0.0, 0.0)
    };
    let total_score = accuracy_score * cfg.accuracy_share + efficiency_score * cfg.efficiency_share;

    RankedScore {
        total_score,
        accuracy_score,
        efficiency_score,
        grade: Grade::for_score(total_score),
        elo_input: total_score.clamp(0.0, 100.0).round() as u32,
        stages: per_stage,
    }
}
