//! Persisted session record: the durable unit scoring and validation run over.
//!
//! Storage lives with the caller; this module only knows the JSON layout and
//! how to load, save and complete a record.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::SessionError;
use crate::responses::{Accuracy, Choice, ResponseData, ResponseLog};
use crate::scoring::{calculate_final_scores, FinalScores};
use crate::stages::StageDefinition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub raw_responses: ResponseLog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_scores: Option<FinalScores>,
    #[serde(default)]
    pub completed: bool,
}

impl SessionRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            timestamp: Utc::now(),
            raw_responses: ResponseLog::new(),
            final_scores: None,
            completed: false,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn responses(&self) -> &[ResponseData] {
        self.raw_responses.responses()
    }

    /// Append the answer for the current stage.
    pub fn record_response(
        &mut self,
        choice: impl Into<Choice>,
        latency_ms: u64,
        accuracy: impl Into<Accuracy>,
    ) -> &ResponseData {
        self.raw_responses.record_response(choice, latency_ms, accuracy)
    }

    /// Score the session and mark it completed. Recomputes on every call.
    pub fn complete(&mut self, stages: &[StageDefinition], catalog: &Catalog) -> &FinalScores {
        let scores = calculate_final_scores(self.responses(), stages, catalog);
        self.completed = true;
        tracing::debug!(session_id = %self.session_id, "session completed");
        self.final_scores.insert(scores)
    }

    /// Drop every response and any computed scores.
    pub fn reset(&mut self) {
        self.raw_responses.reset();
        self.final_scores = None;
        self.completed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::generate_stages;

    #[test]
    fn new_sessions_are_empty_and_incomplete() {
        let s = SessionRecord::new("user-1");
        assert!(s.responses().is_empty());
        assert!(!s.completed);
        assert!(Uuid::parse_str(&s.session_id).is_ok());
    }

    #[test]
    fn complete_then_reset() {
        let catalog = Catalog::builtin();
        let stages = generate_stages(&catalog);
        let mut s = SessionRecord::new("user-1");
        s.record_response(0_i64, 1200, true);
        s.record_response(1_i64, 8000, true);

        let iq = s.complete(&stages, &catalog).iq;
        assert!(iq > 70);
        assert!(s.completed);
        assert!(s.final_scores.is_some());

        s.reset();
        assert!(s.responses().is_empty());
        assert!(s.final_scores.is_none());
        assert!(!s.completed);
    }

    #[test]
    fn json_layout_uses_camel_case() {
        let s = SessionRecord::new("user-1");
        let v = serde_json::to_value(&s).unwrap();
        assert!(v.get("sessionId").is_some());
        assert!(v.get("rawResponses").unwrap().is_array());
        assert!(v.get("finalScores").is_none());
        assert_eq!(v["completed"], false);
    }
}
