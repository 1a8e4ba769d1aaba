#![forbid(unsafe_code)]

//! # neuralsync
//!
//! Scoring and anti-gaming validation core for the NeuralSync assessment.
//!
//! A session walks a fixed stage program (intro, matrix puzzles, emotional
//! scenarios, one balloon risk task, personality items). Every answer lands in
//! an append-only response log. When the session ends, three independent pure
//! reducers run over that log:
//!
//! - [`calculate_final_scores`]: IQ, EQ, risk tolerance, OCEAN and HEXACO
//!   traits plus the top-three "apex" traits.
//! - [`validate_test_session`]: a 0..=100 integrity score with warning and
//!   critical flags; scores from an invalid session should not be trusted.
//! - [`calculate_ranked_score`]: the competitive-mode accuracy/speed grade.
//!
//! The task generators in [`tasks`] take an injectable
//! [`RandomSource`](random::RandomSource), so every instance can be replayed
//! from a seed.

pub mod catalog;
pub mod config;
pub mod error;
pub mod normal;
pub mod random;
pub mod ranked;
pub mod responses;
pub mod scoring;
pub mod session;
pub mod stages;
pub mod tasks;
pub mod validation;

pub use catalog::{Catalog, Content, OceanDimension, Puzzle};
pub use config::{EngineConfig, RankedConfig, ValidationConfig};
pub use error::{CatalogError, ConfigError, SessionError};
pub use random::{FixedSequence, RandomSource, StdRandom};
pub use ranked::{calculate_ranked_score, calculate_ranked_score_with, Grade, RankedScore};
pub use responses::{Accuracy, Choice, ResponseData, ResponseLog};
pub use scoring::{calculate_final_scores, FinalScores};
pub use session::SessionRecord;
pub use stages::{
    generate_stages, generate_stages_with, SequenceOptions, StageDefinition, StageType,
};
pub use validation::{
    validate_test_session, validate_test_session_with, FlagSeverity, ValidationFlag,
    ValidationResult,
};
