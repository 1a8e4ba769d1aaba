//! Content catalog: the static pools every stage draws its item from.
//!
//! Five pools, keyed by string id:
//!
//! - **Logic puzzles** and **visual puzzles**: objective items graded against
//!   `correct_index`. Both feed `matrix` stages and are looked up through the
//!   single [`Puzzle`] variant.
//! - **Scenarios**: situational-judgement items whose options carry a fixed
//!   1..=5 quality score.
//! - **Personality items**: 7-point Likert statements keyed to an OCEAN
//!   dimension, optionally reverse-coded. Attention checks live in the same
//!   pool and carry the instructed answer instead of a scored dimension.
//! - **Trait pairs**: forced-choice statement pairs, lookup only.
//!
//! The catalog is pure data. `Catalog::builtin()` is the shipped assessment;
//! `Catalog::load()` reads an alternative set from JSON.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// =============================================================================
// Item types
// =============================================================================

/// The five OCEAN personality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OceanDimension {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl OceanDimension {
    pub const ALL: [OceanDimension; 5] = [
        OceanDimension::Openness,
        OceanDimension::Conscientiousness,
        OceanDimension::Extraversion,
        OceanDimension::Agreeableness,
        OceanDimension::Neuroticism,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OceanDimension::Openness => "openness",
            OceanDimension::Conscientiousness => "conscientiousness",
            OceanDimension::Extraversion => "extraversion",
            OceanDimension::Agreeableness => "agreeableness",
            OceanDimension::Neuroticism => "neuroticism",
        }
    }
}

/// Text-based reasoning item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicPuzzle {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// Figure-sequence item; `sequence` describes the frames shown before the gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualPuzzle {
    pub id: String,
    pub prompt: String,
    pub sequence: Vec<String>,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOption {
    pub text: String,
    /// Emotional-response quality, 1 (poor) ..= 5 (ideal).
    pub score: u8,
}

/// Situational-judgement item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub situation: String,
    pub options: Vec<ScenarioOption>,
}

impl Scenario {
    /// Highest option score available. 5 for every shipped scenario.
    pub fn max_score(&self) -> u8 {
        self.options.iter().map(|o| o.score).max().unwrap_or(0)
    }
}

/// Likert statement (1 = strongly disagree ..= 7 = strongly agree).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityItem {
    pub id: String,
    pub statement: String,
    pub dimension: OceanDimension,
    #[serde(default)]
    pub reverse: bool,
    /// Instructed answer when the item is an attention check.
    #[serde(default)]
    pub attention_check: Option<u8>,
}

impl PersonalityItem {
    pub fn is_attention_check(&self) -> bool {
        self.attention_check.is_some()
    }

    /// Accuracy flag a caller records for this item. Attention checks pass only on
    /// the instructed value; every other item has no wrong answer.
    pub fn grade(&self, choice: i64) -> bool {
        match self.attention_check {
            Some(expected) => choice == i64::from(expected),
            None => true,
        }
    }

    /// Likert value after reverse-coding (`8 - choice` for reverse items).
    pub fn keyed_value(&self, choice: f64) -> f64 {
        if self.reverse {
            8.0 - choice
        } else {
            choice
        }
    }
}

/// Forced-choice pair; picking `left` leans toward `dimension`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitPair {
    pub id: String,
    pub left: String,
    pub right: String,
    pub dimension: OceanDimension,
}

// =============================================================================
// Tagged lookups
// =============================================================================

/// A puzzle referenced by a `matrix` stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Puzzle<'a> {
    Logic(&'a LogicPuzzle),
    Visual(&'a VisualPuzzle),
}

impl<'a> Puzzle<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            Puzzle::Logic(p) => &p.id,
            Puzzle::Visual(p) => &p.id,
        }
    }

    pub fn correct_index(&self) -> usize {
        match self {
            Puzzle::Logic(p) => p.correct_index,
            Puzzle::Visual(p) => p.correct_index,
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            Puzzle::Logic(p) => p.options.len(),
            Puzzle::Visual(p) => p.options.len(),
        }
    }
}

/// Any catalog item, by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Content<'a> {
    Puzzle(Puzzle<'a>),
    Scenario(&'a Scenario),
    Personality(&'a PersonalityItem),
    TraitPair(&'a TraitPair),
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub logic_puzzles: Vec<LogicPuzzle>,
    pub visual_puzzles: Vec<VisualPuzzle>,
    pub scenarios: Vec<Scenario>,
    pub personality_items: Vec<PersonalityItem>,
    #[serde(default)]
    pub trait_pairs: Vec<TraitPair>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The shipped assessment content.
    pub fn builtin() -> Self {
        Self {
            logic_puzzles: logic_puzzles(),
            visual_puzzles: visual_puzzles(),
            scenarios: scenarios(),
            personality_items: personality_items(),
            trait_pairs: trait_pairs(),
        }
    }

    /// Read and validate a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Well-formedness: non-empty pools, unique ids, answer keys in range.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.logic_puzzles.is_empty() && self.visual_puzzles.is_empty() {
            return Err(CatalogError::Invalid("no puzzles".to_string()));
        }
        if self.scenarios.is_empty() {
            return Err(CatalogError::Invalid("no scenarios".to_string()));
        }
        if self.personality_items.is_empty() {
            return Err(CatalogError::Invalid("no personality items".to_string()));
        }

        let mut seen = HashSet::new();
        let ids = self
            .logic_puzzles
            .iter()
            .map(|p| p.id.as_str())
            .chain(self.visual_puzzles.iter().map(|p| p.id.as_str()))
            .chain(self.scenarios.iter().map(|s| s.id.as_str()))
            .chain(self.personality_items.iter().map(|p| p.id.as_str()))
            .chain(self.trait_pairs.iter().map(|t| t.id.as_str()));
        for id in ids {
            if !seen.insert(id) {
                return Err(CatalogError::DuplicateId(id.to_string()));
            }
        }

        for puzzle in self.puzzles() {
            if puzzle.correct_index() >= puzzle.option_count() {
                return Err(CatalogError::Invalid(format!(
                    "puzzle {} answer key {} out of range",
                    puzzle.id(),
                    puzzle.correct_index()
                )));
            }
        }
        for scenario in &self.scenarios {
            if scenario.options.iter().any(|o| !(1..=5).contains(&o.score)) {
                return Err(CatalogError::Invalid(format!(
                    "scenario {} has an option score outside 1..=5",
                    scenario.id
                )));
            }
        }
        for item in &self.personality_items {
            if let Some(expected) = item.attention_check {
                if !(1..=7).contains(&expected) {
                    return Err(CatalogError::Invalid(format!(
                        "attention check {} expects {expected}, outside 1..=7",
                        item.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Logic puzzles followed by visual puzzles, the order `matrix` stages use.
    pub fn puzzles(&self) -> impl Iterator<Item = Puzzle<'_>> {
        self.logic_puzzles
            .iter()
            .map(Puzzle::Logic)
            .chain(self.visual_puzzles.iter().map(Puzzle::Visual))
    }

    pub fn puzzle(&self, id: &str) -> Option<Puzzle<'_>> {
        self.puzzles().find(|p| p.id() == id)
    }

    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn personality_item(&self, id: &str) -> Option<&PersonalityItem> {
        self.personality_items.iter().find(|p| p.id == id)
    }

    pub fn trait_pair(&self, id: &str) -> Option<&TraitPair> {
        self.trait_pairs.iter().find(|t| t.id == id)
    }

    pub fn lookup(&self, id: &str) -> Option<Content<'_>> {
        if let Some(p) = self.puzzle(id) {
            return Some(Content::Puzzle(p));
        }
        if let Some(s) = self.scenario(id) {
            return Some(Content::Scenario(s));
        }
        if let Some(p) = self.personality_item(id) {
            return Some(Content::Personality(p));
        }
        self.trait_pair(id).map(Content::TraitPair)
    }

    /// Ids of every attention-check item, in catalog order.
    pub fn attention_check_ids(&self) -> Vec<String> {
        self.personality_items
            .iter()
            .filter(|p| p.is_attention_check())
            .map(|p| p.id.clone())
            .collect()
    }
}

// =============================================================================
// Built-in content
// =============================================================================

fn logic(id: &str, question: &str, options: &[&str], correct_index: usize) -> LogicPuzzle {
    LogicPuzzle {
        id: id.into(),
        question: question.into(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_index,
    }
}

fn visual(
    id: &str,
    prompt: &str,
    sequence: &[&str],
    options: &[&str],
    correct_index: usize,
) -> VisualPuzzle {
    VisualPuzzle {
        id: id.into(),
        prompt: prompt.into(),
        sequence: sequence.iter().map(|s| s.to_string()).collect(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_index,
    }
}

fn scenario(id: &str, situation: &str, options: &[(&str, u8)]) -> Scenario {
    Scenario {
        id: id.into(),
        situation: situation.into(),
        options: options
            .iter()
            .map(|(text, score)| ScenarioOption {
                text: text.to_string(),
                score: *score,
            })
            .collect(),
    }
}

fn item(id: &str, statement: &str, dimension: OceanDimension, reverse: bool) -> PersonalityItem {
    PersonalityItem {
        id: id.into(),
        statement: statement.into(),
        dimension,
        reverse,
        attention_check: None,
    }
}

fn attention(id: &str, statement: &str, expected: u8) -> PersonalityItem {
    PersonalityItem {
        id: id.into(),
        statement: statement.into(),
        // Unused for scoring; attention checks are excluded from trait sums.
        dimension: OceanDimension::Conscientiousness,
        reverse: false,
        attention_check: Some(expected),
    }
}

fn logic_puzzles() -> Vec<LogicPuzzle> {
    vec![
        logic(
            "logic-01",
            "What comes next: 2, 4, 6, 8, ?",
            &["9", "10", "12", "16"],
            1,
        ),
        logic(
            "logic-02",
            "If all bloops are razzies and all razzies are lazzies, are all bloops lazzies?",
            &["Yes", "No", "Cannot be determined"],
            0,
        ),
        logic(
            "logic-03",
            "What comes next: 3, 6, 12, 24, ?",
            &["36", "48", "30", "72"],
            1,
        ),
        logic(
            "logic-04",
            "BOOK is to READ as FORK is to ?",
            &["Kitchen", "Eat", "Spoon", "Metal"],
            1,
        ),
        logic(
            "logic-05",
            "What comes next: 1, 1, 2, 3, 5, 8, ?",
            &["11", "12", "13", "15"],
            2,
        ),
        logic(
            "logic-06",
            "A bat and a ball cost 1.10 in total. The bat costs 1.00 more than the ball. What does the ball cost?",
            &["0.10", "0.05", "0.15", "0.01"],
            1,
        ),
        logic(
            "logic-07",
            "Which word does not belong: apple, banana, carrot, cherry?",
            &["apple", "banana", "carrot", "cherry"],
            2,
        ),
        logic(
            "logic-08",
            "What comes next: 2, 3, 5, 7, 11, ?",
            &["12", "13", "14", "15"],
            1,
        ),
        logic(
            "logic-09",
            "If it takes 5 machines 5 minutes to make 5 widgets, how long do 100 machines take to make 100 widgets?",
            &["100 minutes", "5 minutes", "20 minutes", "1 minute"],
            1,
        ),
        logic(
            "logic-10",
            "What comes next: 1, 4, 9, 16, 25, ?",
            &["30", "36", "49", "35"],
            1,
        ),
        logic(
            "logic-11",
            "A lily pad patch doubles daily and covers the lake on day 48. On which day did it cover half the lake?",
            &["24", "47", "46", "12"],
            1,
        ),
        logic(
            "logic-12",
            "What comes next: 1, 3, 7, 15, 31, ?",
            &["47", "62", "63", "64"],
            2,
        ),
    ]
}

fn visual_puzzles() -> Vec<VisualPuzzle> {
    vec![
        visual(
            "visual-01",
            "Which figure completes the rotation?",
            &["arrow 0deg", "arrow 90deg", "arrow 180deg"],
            &["arrow 45deg", "arrow 270deg", "arrow 360deg", "arrow 135deg"],
            1,
        ),
        visual(
            "visual-02",
            "Which figure continues the growth?",
            &["small circle", "medium circle", "large circle"],
            &["small circle", "extra-large circle", "medium square", "large circle"],
            1,
        ),
        visual(
            "visual-03",
            "Which figure has the next number of sides?",
            &["triangle", "square", "pentagon"],
            &["circle", "triangle", "hexagon", "octagon"],
            2,
        ),
        visual(
            "visual-04",
            "Which figure continues the colour cycle?",
            &["red square", "blue square", "green square", "red square", "blue square"],
            &["green square", "red square", "blue circle", "yellow square"],
            0,
        ),
        visual(
            "visual-05",
            "Which figure continues the alternation?",
            &["filled circle", "hollow square", "filled circle", "hollow square"],
            &["hollow circle", "filled square", "filled circle", "hollow square"],
            2,
        ),
        visual(
            "visual-06",
            "Which figure combines both progressions?",
            &["1 dot at 0deg", "2 dots at 45deg", "3 dots at 90deg"],
            &["4 dots at 90deg", "3 dots at 135deg", "4 dots at 135deg", "4 dots at 180deg"],
            2,
        ),
    ]
}

fn scenarios() -> Vec<Scenario> {
    vec![
        scenario(
            "eq-01",
            "A colleague takes credit for your idea in a meeting.",
            &[
                ("Confront them loudly in front of everyone", 1),
                ("Say nothing and quietly resent them", 2),
                ("Mention your contribution calmly during the meeting", 4),
                ("Talk to them privately afterwards about what happened", 5),
            ],
        ),
        scenario(
            "eq-02",
            "A close friend cancels plans with you for the third time this month.",
            &[
                ("Stop inviting them", 2),
                ("Tell them you feel let down and ask if something is going on", 5),
                ("Pretend it does not bother you", 1),
                ("Suggest a plan that is easier for them to keep", 4),
            ],
        ),
        scenario(
            "eq-03",
            "You receive harsh critical feedback on a project you worked hard on.",
            &[
                ("Defend every decision point by point", 2),
                ("Ask for specific examples so you can improve", 5),
                ("Accept it but feel discouraged for days", 3),
                ("Dismiss the feedback as unfair", 1),
            ],
        ),
        scenario(
            "eq-04",
            "A team member seems withdrawn and is missing deadlines.",
            &[
                ("Report them to your manager", 2),
                ("Check in privately to ask how they are doing", 5),
                ("Pick up their work without saying anything", 3),
                ("Point out the missed deadlines in the team channel", 1),
            ],
        ),
        scenario(
            "eq-05",
            "You are stuck in traffic and will be late for an important interview.",
            &[
                ("Call ahead, explain, and ask whether to reschedule", 5),
                ("Drive aggressively to make up time", 1),
                ("Arrive late and apologise briefly", 3),
                ("Skip the interview entirely", 1),
            ],
        ),
        scenario(
            "eq-06",
            "Two friends ask you to take sides in their argument.",
            &[
                ("Pick the friend you are closer to", 1),
                ("Listen to both and encourage them to talk directly", 5),
                ("Avoid both of them until it blows over", 2),
                ("Tell each what the other said about them", 1),
            ],
        ),
        scenario(
            "eq-07",
            "You make a mistake that costs your team a client.",
            &[
                ("Own the mistake and propose how to prevent it", 5),
                ("Point out others who also contributed", 2),
                ("Hope nobody notices it was you", 1),
                ("Apologise repeatedly without a plan", 3),
            ],
        ),
        scenario(
            "eq-08",
            "A stranger is rude to you at a coffee shop.",
            &[
                ("Snap back at them", 1),
                ("Assume they are having a bad day and move on", 5),
                ("Complain about them on social media", 2),
                ("Ask calmly whether something is wrong", 4),
            ],
        ),
    ]
}

fn personality_items() -> Vec<PersonalityItem> {
    use OceanDimension::*;
    vec![
        item("p-o-01", "I enjoy exploring unfamiliar ideas.", Openness, false),
        item("p-c-01", "I finish tasks well before they are due.", Conscientiousness, false),
        item("p-e-01", "I feel energised after spending time with groups.", Extraversion, false),
        item("p-a-01", "I go out of my way to help others.", Agreeableness, false),
        item("p-n-01", "I worry about things that might go wrong.", Neuroticism, false),
        item("p-o-02", "I prefer routine over variety.", Openness, true),
        item("p-c-02", "I often leave my belongings lying around.", Conscientiousness, true),
        item("p-e-02", "I prefer to stay in the background.", Extraversion, true),
        item("p-a-02", "I find it hard to forgive people.", Agreeableness, true),
        item("p-n-02", "I stay calm under pressure.", Neuroticism, true),
        attention(
            "attn-01",
            "To show you are reading carefully, select 'Strongly agree' for this statement.",
            7,
        ),
        item("p-o-03", "I am moved by art and music.", Openness, false),
        item("p-c-03", "I make plans and stick to them.", Conscientiousness, false),
        item("p-e-03", "I start conversations with strangers.", Extraversion, false),
        item("p-a-03", "I trust that people mean well.", Agreeableness, false),
        item("p-n-03", "My mood changes often.", Neuroticism, false),
        item("p-o-04", "I avoid philosophical discussions.", Openness, true),
        item("p-c-04", "I act on impulse.", Conscientiousness, true),
        item("p-e-04", "I keep my thoughts to myself.", Extraversion, true),
        item("p-a-04", "I put my needs ahead of others'.", Agreeableness, true),
        item("p-n-04", "I rarely feel anxious.", Neuroticism, true),
        attention(
            "attn-02",
            "Please select 'Strongly disagree' for this statement.",
            1,
        ),
    ]
}

fn trait_pairs() -> Vec<TraitPair> {
    use OceanDimension::*;
    vec![
        TraitPair {
            id: "tp-01".into(),
            left: "I chase new experiences".into(),
            right: "I stick with what I know".into(),
            dimension: Openness,
        },
        TraitPair {
            id: "tp-02".into(),
            left: "I plan every detail".into(),
            right: "I improvise as I go".into(),
            dimension: Conscientiousness,
        },
        TraitPair {
            id: "tp-03".into(),
            left: "I recharge around people".into(),
            right: "I recharge alone".into(),
            dimension: Extraversion,
        },
        TraitPair {
            id: "tp-04".into(),
            left: "I look for compromise".into(),
            right: "I argue my position".into(),
            dimension: Agreeableness,
        },
        TraitPair {
            id: "tp-05".into(),
            left: "I dwell on setbacks".into(),
            right: "I shrug off setbacks".into(),
            dimension: Neuroticism,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_well_formed() {
        let catalog = Catalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.puzzles().count(), 18);
        assert_eq!(catalog.attention_check_ids(), vec!["attn-01", "attn-02"]);
    }

    #[test]
    fn lookup_resolves_each_pool() {
        let catalog = Catalog::builtin();
        assert!(matches!(
            catalog.lookup("logic-03"),
            Some(Content::Puzzle(Puzzle::Logic(_)))
        ));
        assert!(matches!(
            catalog.lookup("visual-02"),
            Some(Content::Puzzle(Puzzle::Visual(_)))
        ));
        assert!(matches!(catalog.lookup("eq-04"), Some(Content::Scenario(_))));
        assert!(matches!(catalog.lookup("p-n-02"), Some(Content::Personality(_))));
        assert!(matches!(catalog.lookup("tp-03"), Some(Content::TraitPair(_))));
        assert!(catalog.lookup("missing").is_none());
    }

    #[test]
    fn reverse_keying_and_attention_grading() {
        let catalog = Catalog::builtin();
        let reverse = catalog.personality_item("p-o-02").unwrap();
        assert_eq!(reverse.keyed_value(2.0), 6.0);

        let check = catalog.personality_item("attn-01").unwrap();
        assert!(check.grade(7));
        assert!(!check.grade(4));
        assert!(catalog.personality_item("p-o-01").unwrap().grade(1));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut catalog = Catalog::builtin();
        catalog.scenarios[1].id = "eq-01".to_string();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateId(id)) if id == "eq-01"
        ));
    }

    #[test]
    fn json_round_trip_preserves_catalog() {
        let catalog = Catalog::builtin();
        let raw = serde_json::to_string(&catalog).unwrap();
        assert_eq!(Catalog::from_json(&raw).unwrap(), catalog);
    }
}
