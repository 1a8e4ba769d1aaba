//! Matrix-reasoning problem generator.
//!
//! Builds a 3x3 grid whose bottom-right cell is blank, following one of three
//! rule tiers:
//!
//! | tier    | difficulty | rule |
//! |---------|------------|------|
//! | simple  | 1..=3      | rotation = `(row*3 + col) * 45` |
//! | medium  | 4..=6      | size = `30 + row*15`, colour cycles by column |
//! | complex | 7..=10     | shape cycles by row, colour by column, rotation = `(row + col) * 30` |
//!
//! Five distractors perturb the answer, then all six options are shuffled.
//! Grading compares shape and colour exactly and rotation/size within
//! [`MATCH_TOLERANCE`].

use serde::{Deserialize, Serialize};

use crate::random::{shuffle, RandomSource};

/// Rotation (degrees) and size (px) tolerance when grading an option.
pub const MATCH_TOLERANCE: f64 = 5.0;

pub const GRID_SIZE: usize = 3;
pub const OPTION_COUNT: usize = 6;
const BASE_SIZE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Hexagon,
    Star,
}

pub const SHAPES: [Shape; 6] = [
    Shape::Circle,
    Shape::Square,
    Shape::Triangle,
    Shape::Diamond,
    Shape::Hexagon,
    Shape::Star,
];

pub const COLORS: [&str; 6] = ["red", "blue", "green", "orange", "purple", "teal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTier {
    Simple,
    Medium,
    Complex,
}

impl RuleTier {
    pub fn for_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=3 => RuleTier::Simple,
            4..=6 => RuleTier::Medium,
            _ => RuleTier::Complex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub shape: Shape,
    pub color: String,
    pub rotation: f64,
    pub size: f64,
}

impl Cell {
    fn new(shape: Shape, color: &str, rotation: f64, size: f64) -> Self {
        Self {
            shape,
            color: color.to_string(),
            rotation,
            size,
        }
    }
}

/// Exact shape and colour; rotation and size within [`MATCH_TOLERANCE`].
pub fn cells_match(a: &Cell, b: &Cell) -> bool {
    a.shape == b.shape
        && a.color == b.color
        && (a.rotation - b.rotation).abs() <= MATCH_TOLERANCE
        && (a.size - b.size).abs() <= MATCH_TOLERANCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixProblem {
    pub difficulty: u8,
    pub tier: RuleTier,
    /// Rows of cells; `None` marks the blank.
    pub grid: Vec<Vec<Option<Cell>>>,
    pub options: Vec<Cell>,
    pub correct_index: usize,
    pub answer: Cell,
}

impl MatrixProblem {
    pub fn grade(&self, option_index: usize) -> bool {
        self.options
            .get(option_index)
            .is_some_and(|o| cells_match(o, &self.answer))
    }
}

fn pick<'a, T>(items: &'a [T], offset: usize, step: usize) -> &'a T {
    &items[(offset + step) % items.len()]
}

/// One problem instance for `difficulty` (clamped to 1..=10).
pub fn generate_matrix_problem(difficulty: u8, rng: &mut dyn RandomSource) -> MatrixProblem {
    let difficulty = difficulty.clamp(1, 10);
    let tier = RuleTier::for_difficulty(difficulty);

    let shape_offset = rng.next_index(SHAPES.len());
    let color_offset = rng.next_index(COLORS.len());

    let cell_at = |row: usize, col: usize| -> Cell {
        match tier {
            RuleTier::Simple => Cell::new(
                SHAPES[shape_offset],
                COLORS[color_offset],
                ((row * GRID_SIZE + col) * 45) as f64,
                BASE_SIZE,
            ),
            RuleTier::Medium => Cell::new(
                SHAPES[shape_offset],
                *pick(&COLORS, color_offset, col),
                0.0,
                30.0 + row as f64 * 15.0,
            ),
            RuleTier::Complex => Cell::new(
                *pick(&SHAPES, shape_offset, row),
                *pick(&COLORS, color_offset, col),
                ((row + col) * 30) as f64,
                BASE_SIZE,
            ),
        }
    };

    let last = GRID_SIZE - 1;
    let grid: Vec<Vec<Option<Cell>>> = (0..GRID_SIZE)
        .map(|row| {
            (0..GRID_SIZE)
                .map(|col| (row != last || col != last).then(|| cell_at(row, col)))
                .collect()
        })
        .collect();
    let answer = cell_at(last, last);

    let distractors = distractors(tier, &answer, shape_offset, color_offset);

    let mut tagged: Vec<(bool, Cell)> = Vec::with_capacity(OPTION_COUNT);
    tagged.push((true, answer.clone()));
    tagged.extend(distractors.into_iter().map(|c| (false, c)));
    shuffle(&mut tagged, rng);

    let correct_index = tagged.iter().position(|(is_answer, _)| *is_answer).unwrap_or(0);
    let options = tagged.into_iter().map(|(_, c)| c).collect();

    MatrixProblem {
        difficulty,
        tier,
        grid,
        options,
        correct_index,
        answer,
    }
}

fn distractors(
    tier: RuleTier,
    answer: &Cell,
    shape_offset: usize,
    color_offset: usize,
) -> Vec<Cell> {
    let with = |shape: Shape, color: &str, rotation: f64, size: f64| {
        Cell::new(shape, color, rotation, size)
    };
    let (shape, color, rot, size) = (
        answer.shape,
        answer.color.as_str(),
        answer.rotation,
        answer.size,
    );

    match tier {
        RuleTier::Simple => [45.0, -45.0, 90.0, -90.0, 180.0]
            .iter()
            .map(|offset| with(shape, color, rot + offset, size))
            .collect(),
        RuleTier::Medium => {
            let col0 = *pick(&COLORS, color_offset, 0);
            let col1 = *pick(&COLORS, color_offset, 1);
            vec![
                with(shape, col0, rot, size),
                with(shape, col1, rot, size),
                with(shape, color, rot, 30.0),
                with(shape, color, rot, 45.0),
                with(shape, col0, rot, 45.0),
            ]
        }
        RuleTier::Complex => {
            let row0 = *pick(&SHAPES, shape_offset, 0);
            let row1 = *pick(&SHAPES, shape_offset, 1);
            let col0 = *pick(&COLORS, color_offset, 0);
            let col1 = *pick(&COLORS, color_offset, 1);
            vec![
                with(row1, color, rot, size),
                with(shape, col1, rot, size),
                with(shape, color, rot + 30.0, size),
                with(row0, col0, rot, size),
                with(shape, col0, rot - 30.0, size),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSequence, StdRandom};

    fn cell(rotation: f64, size: f64) -> Cell {
        Cell::new(Shape::Square, "red", rotation, size)
    }

    #[test]
    fn tolerance_boundaries() {
        let answer = cell(120.0, 50.0);
        assert!(cells_match(&cell(124.0, 50.0), &answer));
        assert!(!cells_match(&cell(126.0, 50.0), &answer));
        assert!(cells_match(&cell(120.0, 46.0), &answer));
        assert!(!cells_match(&cell(120.0, 56.0), &answer));
        assert!(!cells_match(&Cell::new(Shape::Circle, "red", 120.0, 50.0), &answer));
        assert!(!cells_match(&Cell::new(Shape::Square, "blue", 120.0, 50.0), &answer));
    }

    #[test]
    fn tiers_follow_difficulty() {
        assert_eq!(RuleTier::for_difficulty(3), RuleTier::Simple);
        assert_eq!(RuleTier::for_difficulty(4), RuleTier::Medium);
        assert_eq!(RuleTier::for_difficulty(6), RuleTier::Medium);
        assert_eq!(RuleTier::for_difficulty(7), RuleTier::Complex);
    }

    #[test]
    fn simple_grid_rotates_by_45() {
        let problem = generate_matrix_problem(2, &mut FixedSequence::constant(0.0));
        assert_eq!(problem.tier, RuleTier::Simple);
        let middle = problem.grid[1][1].as_ref().unwrap();
        assert_eq!(middle.rotation, 180.0);
        assert!(problem.grid[2][2].is_none());
        assert_eq!(problem.answer.rotation, 360.0);
    }

    #[test]
    fn medium_grid_grows_by_row_and_cycles_colour() {
        let problem = generate_matrix_problem(5, &mut FixedSequence::constant(0.0));
        let g = &problem.grid;
        assert_eq!(g[0][0].as_ref().unwrap().size, 30.0);
        assert_eq!(g[1][0].as_ref().unwrap().size, 45.0);
        assert_eq!(g[0][1].as_ref().unwrap().color, "blue");
        assert_eq!(problem.answer.size, 60.0);
        assert_eq!(problem.answer.color, "green");
    }

    #[test]
    fn complex_grid_cycles_shape_by_row() {
        let problem = generate_matrix_problem(9, &mut FixedSequence::constant(0.0));
        let g = &problem.grid;
        assert_eq!(g[0][2].as_ref().unwrap().shape, Shape::Circle);
        assert_eq!(g[1][0].as_ref().unwrap().shape, Shape::Square);
        assert_eq!(g[1][2].as_ref().unwrap().rotation, 90.0);
        assert_eq!(problem.answer.shape, Shape::Triangle);
        assert_eq!(problem.answer.rotation, 120.0);
    }

    #[test]
    fn exactly_one_option_is_correct() {
        let mut rng = StdRandom::seeded(99);
        for difficulty in 1..=10 {
            let problem = generate_matrix_problem(difficulty, &mut rng);
            assert_eq!(problem.options.len(), OPTION_COUNT);
            let correct: Vec<usize> = (0..OPTION_COUNT).filter(|&i| problem.grade(i)).collect();
            assert_eq!(correct, vec![problem.correct_index]);
        }
        let problem = generate_matrix_problem(5, &mut rng);
        assert!(!problem.grade(OPTION_COUNT));
    }
}
