//! Validation engine: integrity score and flags for a finished session.
//!
//! Four independent sub-scores (each 0..=100) are combined with fixed weights:
//!
//! | sub-score   | weight | measures |
//! |-------------|--------|----------|
//! | speed       | 0.25   | share of responses faster than their stage type allows |
//! | pattern     | 0.30   | degenerate answer sequences (all same, A-B-A-B, 4-cycles) |
//! | consistency | 0.20   | agreement between repeated presentations of one item |
//! | attention   | 0.25   | attention-check items answered as instructed |
//!
//! A session is valid iff the overall score reaches the threshold (60) and no
//! critical flag was raised.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::responses::{Choice, ResponseData};
use crate::stages::{stage_at, StageDefinition};

/// Minimum number of responses before pattern detection runs.
pub const PATTERN_MIN_RESPONSES: usize = 5;
/// `all_same` needs strictly more responses than this.
pub const ALL_SAME_MIN_RESPONSES: usize = 10;
pub const ALTERNATING_RATE: f64 = 0.8;
pub const SEQUENTIAL_RATE: f64 = 0.9;
/// More inconsistent groups than this raise a warning.
pub const INCONSISTENCY_WARNING_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFlag {
    #[serde(rename = "type")]
    pub severity: FlagSeverity,
    pub code: String,
    pub message: String,
}

impl ValidationFlag {
    fn new(severity: FlagSeverity, code: &str, message: String) -> Self {
        tracing::info!(?severity, code, %message, "validation flag raised");
        Self {
            severity,
            code: code.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    AllSame,
    Alternating,
    Sequential,
}

impl PatternKind {
    pub fn code(self) -> &'static str {
        match self {
            PatternKind::AllSame => "all_same",
            PatternKind::Alternating => "alternating",
            PatternKind::Sequential => "sequential",
        }
    }

    /// Pattern sub-score when this pattern is detected.
    pub fn score(self) -> f64 {
        match self {
            PatternKind::AllSame => 20.0,
            PatternKind::Alternating => 30.0,
            PatternKind::Sequential => 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetails {
    pub speed_score: f64,
    pub speed_violations: usize,
    pub pattern_score: f64,
    pub pattern_detected: Option<PatternKind>,
    pub consistency_score: f64,
    pub inconsistent_groups: usize,
    pub attention_score: f64,
    pub attention_failures: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub overall_score: u32,
    pub flags: Vec<ValidationFlag>,
    pub is_valid: bool,
    pub details: ValidationDetails,
}

impl ValidationResult {
    pub fn has_critical(&self) -> bool {
        self.flags
            .iter()
            .any(|f| f.severity == FlagSeverity::Critical)
    }
}

// ---------------------------------------------------------------------
//  Entry points
// ---------------------------------------------------------------------

pub fn validate_test_session(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    attention_check_ids: &[String],
) -> ValidationResult {
    validate_test_session_with(
        responses,
        stages,
        attention_check_ids,
        &ValidationConfig::default(),
    )
}

pub fn validate_test_session_with(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    attention_check_ids: &[String],
    cfg: &ValidationConfig,
) -> ValidationResult {
    let mut flags = Vec::new();

    let speed = check_speed(responses, stages, cfg, &mut flags);
    let pattern = check_pattern(responses, &mut flags);
    let consistency = check_consistency(responses, stages, &mut flags);
    let attention = check_attention(responses, stages, attention_check_ids, &mut flags);

    let w = &cfg.weights;
    let overall = speed.score * w.speed
        + pattern.score * w.pattern
        + consistency.score * w.consistency
        + attention.score * w.attention;
    let overall_score = overall.round().clamp(0.0, 100.0) as u32;

    let has_critical = flags.iter().any(|f| f.severity == FlagSeverity::Critical);
    let is_valid = f64::from(overall_score) >= cfg.validity_threshold && !has_critical;

    tracing::debug!(
        speed = speed.score,
        pattern = pattern.score,
        consistency = consistency.score,
        attention = attention.score,
        overall_score,
        "validation sub-scores"
    );
    if !is_valid {
        tracing::warn!(overall_score, flags = flags.len(), "session failed validation");
    }

    ValidationResult {
        overall_score,
        flags,
        is_valid,
        details: ValidationDetails {
            speed_score: speed.score,
            speed_violations: speed.count,
            pattern_score: pattern.score,
            pattern_detected: pattern.kind,
            consistency_score: consistency.score,
            inconsistent_groups: consistency.count,
            attention_score: attention.score,
            attention_failures: attention.count,
        },
    }
}

struct SubScore {
    score: f64,
    count: usize,
}

// ---------------------------------------------------------------------
//  Speed
// ---------------------------------------------------------------------

fn check_speed(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    cfg: &ValidationConfig,
    flags: &mut Vec<ValidationFlag>,
) -> SubScore {
    if responses.is_empty() {
        return SubScore {
            score: 100.0,
            count: 0,
        };
    }

    let violations = responses
        .iter()
        .filter(|r| {
            let min = match stage_at(stages, r.stage) {
                Some(stage) => cfg.min_latency_for(stage.stage_type),
                None => cfg.default_min_latency_ms,
            };
            r.latency_ms < min
        })
        .count();

    let rate = violations as f64 / responses.len() as f64;
    if rate > cfg.speed_critical_rate {
        flags.push(ValidationFlag::new(
            FlagSeverity::Critical,
            "speed_critical",
            format!(
                "{violations} of {} responses were faster than humanly plausible",
                responses.len()
            ),
        ));
    } else if rate > cfg.speed_warning_rate {
        flags.push(ValidationFlag::new(
            FlagSeverity::Warning,
            "speed_warning",
            format!(
                "{violations} of {} responses were unusually fast",
                responses.len()
            ),
        ));
    }

    SubScore {
        score: (1.0 - rate) * 100.0,
        count: violations,
    }
}

// ---------------------------------------------------------------------
//  Pattern
// ---------------------------------------------------------------------

struct PatternScore {
    score: f64,
    kind: Option<PatternKind>,
}

/// Detect a degenerate choice sequence. Checked in order: all same,
/// alternating, sequential.
pub fn detect_pattern(choices: &[&Choice]) -> Option<PatternKind> {
    let n = choices.len();
    if n < PATTERN_MIN_RESPONSES {
        return None;
    }

    if n > ALL_SAME_MIN_RESPONSES && choices.iter().all(|c| *c == choices[0]) {
        return Some(PatternKind::AllSame);
    }

    let alternating = (2..n)
        .filter(|&i| choices[i] == choices[i - 2] && choices[i] != choices[i - 1])
        .count();
    if alternating as f64 / (n - 2) as f64 > ALTERNATING_RATE {
        return Some(PatternKind::Alternating);
    }

    let cyclic = (4..n).filter(|&i| choices[i] == choices[i - 4]).count();
    if cyclic as f64 / (n - 4) as f64 > SEQUENTIAL_RATE {
        return Some(PatternKind::Sequential);
    }

    None
}

fn check_pattern(responses: &[ResponseData], flags: &mut Vec<ValidationFlag>) -> PatternScore {
    let choices: Vec<&Choice> = responses.iter().map(|r| &r.choice).collect();
    match detect_pattern(&choices) {
        Some(kind) => {
            flags.push(ValidationFlag::new(
                FlagSeverity::Critical,
                kind.code(),
                format!("response sequence follows a {} pattern", kind.code()),
            ));
            PatternScore {
                score: kind.score(),
                kind: Some(kind),
            }
        }
        None => PatternScore {
            score: 100.0,
            kind: None,
        },
    }
}

// ---------------------------------------------------------------------
//  Consistency
// ---------------------------------------------------------------------

fn check_consistency(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    flags: &mut Vec<ValidationFlag>,
) -> SubScore {
    let mut groups: BTreeMap<&str, Vec<&Choice>> = BTreeMap::new();
    for r in responses {
        if let Some(id) = stage_at(stages, r.stage).and_then(|s| s.content_id.as_deref()) {
            groups.entry(id).or_default().push(&r.choice);
        }
    }

    let repeated: Vec<&Vec<&Choice>> = groups.values().filter(|g| g.len() > 1).collect();
    if repeated.is_empty() {
        return SubScore {
            score: 100.0,
            count: 0,
        };
    }

    let consistent = repeated
        .iter()
        .filter(|g| g.iter().all(|c| *c == g[0]))
        .count();
    let inconsistent = repeated.len() - consistent;

    if inconsistent > INCONSISTENCY_WARNING_COUNT {
        flags.push(ValidationFlag::new(
            FlagSeverity::Warning,
            "inconsistent_answers",
            format!("{inconsistent} repeated items were answered differently"),
        ));
    }

    SubScore {
        score: consistent as f64 / repeated.len() as f64 * 100.0,
        count: inconsistent,
    }
}

// ---------------------------------------------------------------------
//  Attention
// ---------------------------------------------------------------------

fn check_attention(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    attention_check_ids: &[String],
    flags: &mut Vec<ValidationFlag>,
) -> SubScore {
    let ids: HashSet<&str> = attention_check_ids.iter().map(String::as_str).collect();
    let checks: Vec<&ResponseData> = responses
        .iter()
        .filter(|r| {
            stage_at(stages, r.stage)
                .and_then(|s| s.content_id.as_deref())
                .is_some_and(|id| ids.contains(id))
        })
        .collect();

    if checks.is_empty() {
        return SubScore {
            score: 100.0,
            count: 0,
        };
    }

    let passed = checks.iter().filter(|r| r.accuracy.is_correct()).count();
    let failed = checks.len() - passed;

    match failed {
        0 => {}
        1 => flags.push(ValidationFlag::new(
            FlagSeverity::Warning,
            "attention_check_failed",
            "one attention check was answered incorrectly".to_string(),
        )),
        n => flags.push(ValidationFlag::new(
            FlagSeverity::Critical,
            "attention_checks_failed",
            format!("{n} attention checks were answered incorrectly"),
        )),
    }

    SubScore {
        score: passed as f64 / checks.len() as f64 * 100.0,
        count: failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(values: &[i64]) -> Vec<Choice> {
        values.iter().map(|v| Choice::Index(*v)).collect()
    }

    fn detect(values: &[i64]) -> Option<PatternKind> {
        let choices = idx(values);
        let refs: Vec<&Choice> = choices.iter().collect();
        detect_pattern(&refs)
    }

    #[test]
    fn short_sequences_are_never_patterns() {
        assert_eq!(detect(&[1, 1, 1, 1]), None);
    }

    #[test]
    fn all_same_needs_more_than_ten() {
        assert_eq!(detect(&[3; 11]), Some(PatternKind::AllSame));
        // ten identical answers fall through to the 4-cycle check
        assert_eq!(detect(&[3; 10]), Some(PatternKind::Sequential));
    }

    #[test]
    fn alternating_and_cycles() {
        assert_eq!(
            detect(&[1, 2, 1, 2, 1, 2, 1, 2, 1, 2]),
            Some(PatternKind::Alternating)
        );
        assert_eq!(
            detect(&[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]),
            Some(PatternKind::Sequential)
        );
        assert_eq!(detect(&[1, 4, 2, 2, 3, 1, 4, 4, 2, 3, 1, 1]), None);
    }
}
