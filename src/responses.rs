//! Recorded responses and the append-only response log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user picked. Numeric for puzzle options, Likert values and pump
/// counts; a token for colour names and emotion labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    Index(i64),
    Number(f64),
    Token(String),
}

impl Choice {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Choice::Index(i) => Some(*i as f64),
            Choice::Number(n) if n.is_finite() => Some(*n),
            Choice::Number(_) | Choice::Token(_) => None,
        }
    }

    /// Option index; fractional or negative numbers don't count.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Choice::Index(i) => usize::try_from(*i).ok(),
            Choice::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Some(*n as usize),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Choice::Token(t) => Some(t),
            _ => None,
        }
    }
}

impl From<i64> for Choice {
    fn from(v: i64) -> Self {
        Choice::Index(v)
    }
}

impl From<usize> for Choice {
    fn from(v: usize) -> Self {
        Choice::Index(v as i64)
    }
}

impl From<f64> for Choice {
    fn from(v: f64) -> Self {
        Choice::Number(v)
    }
}

impl From<&str> for Choice {
    fn from(v: &str) -> Self {
        Choice::Token(v.to_string())
    }
}

impl From<String> for Choice {
    fn from(v: String) -> Self {
        Choice::Token(v)
    }
}

/// Correctness signal. Stored sessions normally hold a boolean, but older
/// ranked sessions carry a graded 0..=100 value or nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Accuracy {
    Flag(bool),
    Graded(f64),
    #[default]
    Unknown,
}

impl Accuracy {
    /// Strictly `true`; graded and unknown values never pass.
    pub fn is_correct(&self) -> bool {
        matches!(self, Accuracy::Flag(true))
    }
}

impl From<bool> for Accuracy {
    fn from(v: bool) -> Self {
        Accuracy::Flag(v)
    }
}

/// One recorded answer. Created once per stage, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    pub stage: usize,
    pub choice: Choice,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub accuracy: Accuracy,
}

impl ResponseData {
    pub fn new(
        stage: usize,
        choice: impl Into<Choice>,
        latency_ms: u64,
        accuracy: impl Into<Accuracy>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            stage,
            choice: choice.into(),
            latency_ms,
            timestamp,
            accuracy: accuracy.into(),
        }
    }
}

/// Append-only, stage-ordered log. The stage index of each new entry is the
/// number of entries already recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseLog {
    responses: Vec<ResponseData>,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from stored responses (e.g. a persisted session's `rawResponses`).
    pub fn from_responses(responses: Vec<ResponseData>) -> Self {
        Self { responses }
    }

    /// Stage index the next response will be recorded against.
    pub fn next_stage(&self) -> usize {
        self.responses.len()
    }

    pub fn record_response(
        &mut self,
        choice: impl Into<Choice>,
        latency_ms: u64,
        accuracy: impl Into<Accuracy>,
    ) -> &ResponseData {
        self.record_response_at(choice, latency_ms, accuracy, Utc::now())
    }

    pub fn record_response_at(
        &mut self,
        choice: impl Into<Choice>,
        latency_ms: u64,
        accuracy: impl Into<Accuracy>,
        timestamp: DateTime<Utc>,
    ) -> &ResponseData {
        let stage = self.next_stage();
        self.responses
            .push(ResponseData::new(stage, choice, latency_ms, accuracy, timestamp));
        tracing::debug!(stage, latency_ms, "response recorded");
        &self.responses[stage]
    }

    pub fn responses(&self) -> &[ResponseData] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Full session reset; the only way entries are ever removed.
    pub fn reset(&mut self) {
        self.responses.clear();
    }

    pub fn into_inner(self) -> Vec<ResponseData> {
        self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_assigns_stage_in_order() {
        let mut log = ResponseLog::new();
        log.record_response(0_i64, 900, true);
        log.record_response(2_i64, 4200, false);
        let last = log.record_response("red", 700, true).clone();

        assert_eq!(last.stage, 2);
        assert_eq!(log.next_stage(), 3);
        let stages: Vec<usize> = log.responses().iter().map(|r| r.stage).collect();
        assert_eq!(stages, vec![0, 1, 2]);

        log.reset();
        assert!(log.is_empty());
        assert_eq!(log.next_stage(), 0);
    }

    #[test]
    fn choice_deserializes_polymorphically() {
        let c: Vec<Choice> = serde_json::from_str(r#"[3, 2.5, "blue"]"#).unwrap();
        assert_eq!(c[0], Choice::Index(3));
        assert_eq!(c[1], Choice::Number(2.5));
        assert_eq!(c[2], Choice::Token("blue".to_string()));
        assert_eq!(c[0].as_index(), Some(3));
        assert_eq!(c[1].as_index(), None);
        assert_eq!(c[2].as_f64(), None);
    }

    #[test]
    fn accuracy_accepts_bool_number_or_missing() {
        let raw = r#"[
            {"stage":0,"choice":0,"latency_ms":10,"timestamp":"2024-01-01T00:00:00Z","accuracy":true},
            {"stage":1,"choice":1,"latency_ms":10,"timestamp":"2024-01-01T00:00:01Z","accuracy":72.5},
            {"stage":2,"choice":1,"latency_ms":10,"timestamp":"2024-01-01T00:00:02Z"}
        ]"#;
        let rs: Vec<ResponseData> = serde_json::from_str(raw).unwrap();
        assert_eq!(rs[0].accuracy, Accuracy::Flag(true));
        assert_eq!(rs[1].accuracy, Accuracy::Graded(72.5));
        assert_eq!(rs[2].accuracy, Accuracy::Unknown);
        assert!(rs[0].accuracy.is_correct());
        assert!(!rs[1].accuracy.is_correct());
    }
}
