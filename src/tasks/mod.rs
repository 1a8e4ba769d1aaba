//! Per-stage task generators.
//!
//! Each generator is a function of a difficulty level (1..=10) and a
//! [`RandomSource`](crate::random::RandomSource); nothing else is consumed.

pub mod bart;
pub mod matrix;
pub mod stroop;

pub use bart::{burst_probability, max_pumps_for, BartState, BartStatus, BartTrial};
pub use matrix::{
    cells_match, generate_matrix_problem, Cell, MatrixProblem, RuleTier, Shape, GRID_SIZE,
    OPTION_COUNT,
};
pub use stroop::{generate_stroop_task, StroopTask, Valence};
