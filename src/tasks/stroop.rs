//! Emotional Stroop task generator.
//!
//! A word is drawn from the positive, negative or neutral bank and painted in
//! a colour chosen independently of its meaning. The correct answer is always
//! the ink colour. Difficulty raises both the share of emotional words
//! (from 3) and the share of interfering, negative words (from 5).

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

pub const POSITIVE_WORDS: &[&str] = &["JOY", "LOVE", "PEACE", "HOPE", "PROUD", "CALM"];
pub const NEGATIVE_WORDS: &[&str] = &["FEAR", "ANGER", "GRIEF", "SHAME", "PANIC", "HATE"];
pub const NEUTRAL_WORDS: &[&str] = &["TABLE", "CHAIR", "PAPER", "WINDOW", "PENCIL", "DOOR"];
pub const STROOP_COLORS: &[&str] = &["red", "blue", "green", "yellow"];

/// Latency above which an emotional word counts as a regulation failure.
pub const EMOTIONAL_FAILURE_MS: u64 = 1500;
/// Latency above which a neutral word counts as a regulation failure.
pub const NEUTRAL_FAILURE_MS: u64 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Valence {
    Positive,
    Negative,
    Neutral,
}

impl Valence {
    pub fn is_emotional(self) -> bool {
        !matches!(self, Valence::Neutral)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StroopTask {
    pub word: String,
    pub display_color: String,
    pub correct_answer: String,
    pub valence: Valence,
    pub interference: bool,
    pub difficulty: u8,
}

impl StroopTask {
    /// Case-insensitive match against the ink colour.
    pub fn grade(&self, answer: &str) -> bool {
        answer.trim().eq_ignore_ascii_case(&self.correct_answer)
    }

    /// Diagnostic only; never affects grading.
    pub fn is_regulation_failure(&self, latency_ms: u64) -> bool {
        let limit = if self.valence.is_emotional() {
            EMOTIONAL_FAILURE_MS
        } else {
            NEUTRAL_FAILURE_MS
        };
        latency_ms > limit
    }
}

fn emotional_probability(difficulty: u8) -> f64 {
    if difficulty >= 3 {
        0.7
    } else {
        0.4
    }
}

fn interference_probability(difficulty: u8) -> f64 {
    if difficulty >= 5 {
        0.6
    } else {
        0.3
    }
}

/// One task instance. Consumes four draws: emotional roll, interference roll,
/// word index, colour index.
pub fn generate_stroop_task(difficulty: u8, rng: &mut dyn RandomSource) -> StroopTask {
    let difficulty = difficulty.clamp(1, 10);

    let emotional = rng.chance(emotional_probability(difficulty));
    let interference_roll = rng.chance(interference_probability(difficulty));

    let (valence, interference) = if emotional {
        if interference_roll {
            (Valence::Negative, true)
        } else {
            (Valence::Positive, false)
        }
    } else {
        (Valence::Neutral, false)
    };

    let bank = match valence {
        Valence::Positive => POSITIVE_WORDS,
        Valence::Negative => NEGATIVE_WORDS,
        Valence::Neutral => NEUTRAL_WORDS,
    };
    let word = bank[rng.next_index(bank.len())];
    let color = STROOP_COLORS[rng.next_index(STROOP_COLORS.len())];

    StroopTask {
        word: word.to_string(),
        display_color: color.to_string(),
        correct_answer: color.to_string(),
        valence,
        interference,
        difficulty,
    }
}
