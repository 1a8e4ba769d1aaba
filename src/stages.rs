//! Stage sequencer: expands the catalog into the fixed assessment program.
//!
//! Blocks, in order:
//!
//! 1. one `intro` stage (difficulty 1)
//! 2. one `matrix` stage per logic puzzle then visual puzzle,
//!    difficulty `min(10, index / 3 + 1)`
//! 3. one `scenario` stage per scenario (difficulty 5)
//! 4. exactly one `bart` stage (difficulty 5)
//! 5. one `personality` stage per personality item (difficulty 3)
//!
//! Block sizes follow the catalog, so stage indices shift whenever content does.
//! Everything downstream filters on `stage_type`, never on index ranges.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageType {
    Intro,
    Matrix,
    Scenario,
    Bart,
    Personality,
    Debug,
    Outro,
}

impl StageType {
    pub fn as_str(self) -> &'static str {
        match self {
            StageType::Intro => "intro",
            StageType::Matrix => "matrix",
            StageType::Scenario => "scenario",
            StageType::Bart => "bart",
            StageType::Personality => "personality",
            StageType::Debug => "debug",
            StageType::Outro => "outro",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDefinition {
    pub stage: usize,
    #[serde(rename = "type")]
    pub stage_type: StageType,
    pub difficulty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

/// Optional extra blocks appended after the fixed program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOptions {
    /// Re-present the first N scenarios as `debug` stages (consistency probes).
    #[serde(default)]
    pub debug_repeats: usize,
}

pub const SCENARIO_DIFFICULTY: u8 = 5;
pub const BART_DIFFICULTY: u8 = 5;
pub const PERSONALITY_DIFFICULTY: u8 = 3;
pub const DEBUG_DIFFICULTY: u8 = 5;

/// Difficulty for the `index`-th puzzle of the matrix block.
pub fn matrix_difficulty(index: usize) -> u8 {
    (index / 3 + 1).min(10) as u8
}

/// The fixed assessment program for `catalog`.
pub fn generate_stages(catalog: &Catalog) -> Vec<StageDefinition> {
    generate_stages_with(catalog, &SequenceOptions::default())
}

pub fn generate_stages_with(catalog: &Catalog, options: &SequenceOptions) -> Vec<StageDefinition> {
    let mut stages = Vec::new();
    let mut push = |stage_type: StageType, difficulty: u8, content_id: Option<String>| {
        let stage = stages.len();
        stages.push(StageDefinition {
            stage,
            stage_type,
            difficulty,
            content_id,
        });
    };

    push(StageType::Intro, 1, None);

    for (index, puzzle) in catalog.puzzles().enumerate() {
        push(
            StageType::Matrix,
            matrix_difficulty(index),
            Some(puzzle.id().to_string()),
        );
    }

    for scenario in &catalog.scenarios {
        push(
            StageType::Scenario,
            SCENARIO_DIFFICULTY,
            Some(scenario.id.clone()),
        );
    }

    push(StageType::Bart, BART_DIFFICULTY, None);

    for item in &catalog.personality_items {
        push(
            StageType::Personality,
            PERSONALITY_DIFFICULTY,
            Some(item.id.clone()),
        );
    }

    for scenario in catalog.scenarios.iter().take(options.debug_repeats) {
        push(StageType::Debug, DEBUG_DIFFICULTY, Some(scenario.id.clone()));
    }

    stages
}

/// Stage definition for `index`, tolerating programs that break the
/// `stages[i].stage == i` invariant.
pub fn stage_at(stages: &[StageDefinition], index: usize) -> Option<&StageDefinition> {
    match stages.get(index) {
        Some(s) if s.stage == index => Some(s),
        _ => stages.iter().find(|s| s.stage == index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_blocks_follow_catalog_sizes() {
        let catalog = Catalog::builtin();
        let stages = generate_stages(&catalog);

        let puzzles = catalog.puzzles().count();
        let expected = 1 + puzzles + catalog.scenarios.len() + 1 + catalog.personality_items.len();
        assert_eq!(stages.len(), expected);

        assert_eq!(stages[0].stage_type, StageType::Intro);
        assert!(stages[1..=puzzles]
            .iter()
            .all(|s| s.stage_type == StageType::Matrix));
        let bart: Vec<_> = stages
            .iter()
            .filter(|s| s.stage_type == StageType::Bart)
            .collect();
        assert_eq!(bart.len(), 1);
        assert_eq!(bart[0].content_id, None);
        assert_eq!(bart[0].difficulty, 5);
        assert_eq!(stages.last().unwrap().stage_type, StageType::Personality);
    }

    #[test]
    fn indices_are_contiguous() {
        let stages = generate_stages_with(
            &Catalog::builtin(),
            &SequenceOptions { debug_repeats: 3 },
        );
        for (i, s) in stages.iter().enumerate() {
            assert_eq!(s.stage, i);
        }
    }

    #[test]
    fn matrix_difficulty_ramps_and_caps() {
        assert_eq!(matrix_difficulty(0), 1);
        assert_eq!(matrix_difficulty(2), 1);
        assert_eq!(matrix_difficulty(3), 2);
        assert_eq!(matrix_difficulty(17), 6);
        assert_eq!(matrix_difficulty(27), 10);
        assert_eq!(matrix_difficulty(90), 10);
    }

    #[test]
    fn debug_repeats_reuse_scenario_ids() {
        let catalog = Catalog::builtin();
        let stages = generate_stages_with(&catalog, &SequenceOptions { debug_repeats: 2 });
        let debug: Vec<_> = stages
            .iter()
            .filter(|s| s.stage_type == StageType::Debug)
            .collect();
        assert_eq!(debug.len(), 2);
        assert_eq!(debug[0].content_id.as_deref(), Some("eq-01"));
        assert_eq!(debug[1].content_id.as_deref(), Some("eq-02"));
    }

    #[test]
    fn stage_definition_json_shape() {
        let stages = generate_stages(&Catalog::builtin());
        let json = serde_json::to_value(&stages[1]).unwrap();
        assert_eq!(json["type"], "matrix");
        assert_eq!(json["contentId"], "logic-01");
        assert!(serde_json::to_value(&stages[0]).unwrap().get("contentId").is_none());
    }
}
