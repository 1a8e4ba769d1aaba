//! Scoring engine: reduces a response log to final trait scores.
//!
//! Every reducer here is total. Missing stages, unknown content ids and empty
//! inputs are skipped or replaced by the documented defaults:
//!
//! - no `matrix` responses: IQ 100, percentile 50
//! - no `scenario` responses: EQ 100, percentile 50
//! - no `bart` response: risk tolerance 50, percentile 50
//! - an OCEAN dimension with no responses: 50
//!
//! Responses are selected by the *type* of the stage they answer, never by a
//! numeric stage range, so catalog changes can't shift them into the wrong
//! reducer.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, OceanDimension};
use crate::normal::percentile;
use crate::responses::ResponseData;
use crate::stages::{stage_at, StageDefinition, StageType};

/// Latency under which a correct matrix answer earns the speed bonus.
pub const SPEED_BONUS_LATENCY_MS: u64 = 10_000;
/// Speed bonus as a fraction of the item weight.
pub const SPEED_BONUS_FRACTION: f64 = 0.2;
/// Pump count treated as maximal risk taking.
pub const RISK_MAX_PUMPS: f64 = 30.0;
/// Highest option score a scenario can award.
pub const SCENARIO_MAX_POINTS: f64 = 5.0;

const LIKERT_MIN: f64 = 1.0;
const LIKERT_MAX: f64 = 7.0;

// ---------------------------------------------------------------------
//  Output types
// ---------------------------------------------------------------------

/// A standardized score and its population percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardScore {
    pub score: u32,
    pub percentile: u32,
}

impl StandardScore {
    pub const DEFAULT: StandardScore = StandardScore {
        score: 100,
        percentile: 50,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OceanScores {
    pub openness: u32,
    pub conscientiousness: u32,
    pub extraversion: u32,
    pub agreeableness: u32,
    pub neuroticism: u32,
}

impl OceanScores {
    pub fn get(&self, dimension: OceanDimension) -> u32 {
        match dimension {
            OceanDimension::Openness => self.openness,
            OceanDimension::Conscientiousness => self.conscientiousness,
            OceanDimension::Extraversion => self.extraversion,
            OceanDimension::Agreeableness => self.agreeableness,
            OceanDimension::Neuroticism => self.neuroticism,
        }
    }
}

/// HEXACO approximated from OCEAN: honesty-humility reuses agreeableness,
/// emotionality reuses neuroticism, the rest map one to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexacoScores {
    pub honesty_humility: u32,
    pub emotionality: u32,
    pub extraversion: u32,
    pub agreeableness: u32,
    pub conscientiousness: u32,
    pub openness: u32,
}

impl From<OceanScores> for HexacoScores {
    fn from(o: OceanScores) -> Self {
        Self {
            honesty_humility: o.agreeableness,
            emotionality: o.neuroticism,
            extraversion: o.extraversion,
            agreeableness: o.agreeableness,
            conscientiousness: o.conscientiousness,
            openness: o.openness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApexTrait {
    pub key: String,
    pub name: String,
    pub score: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScores {
    pub iq: u32,
    pub iq_percentile: u32,
    pub eq: u32,
    pub eq_percentile: u32,
    pub risk_tolerance: u32,
    pub risk_percentile: u32,
    pub hexaco: HexacoScores,
    pub ocean: OceanScores,
    pub apex_traits: Vec<ApexTrait>,
}

// ---------------------------------------------------------------------
//  Entry point
// ---------------------------------------------------------------------

/// Recompute every trait score from scratch.
pub fn calculate_final_scores(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    catalog: &Catalog,
) -> FinalScores {
    let iq = iq_score(responses, stages, catalog);
    let eq = eq_score(responses, stages, catalog);
    let risk = risk_score(responses, stages);
    let ocean = ocean_scores(responses, stages, catalog);

    tracing::debug!(
        iq = iq.score,
        eq = eq.score,
        risk = risk.score,
        "final scores computed"
    );

    FinalScores {
        iq: iq.score,
        iq_percentile: iq.percentile,
        eq: eq.score,
        eq_percentile: eq.percentile,
        risk_tolerance: risk.score,
        risk_percentile: risk.percentile,
        hexaco: HexacoScores::from(ocean),
        ocean,
        apex_traits: apex_traits(iq.percentile, eq.percentile, risk.percentile, &ocean),
    }
}

/// Responses answering stages of `stage_type`, paired with their stage.
fn responses_of_type<'a>(
    responses: &'a [ResponseData],
    stages: &'a [StageDefinition],
    stage_type: StageType,
) -> impl Iterator<Item = (&'a ResponseData, &'a StageDefinition)> {
    responses.iter().filter_map(move |r| match stage_at(stages, r.stage) {
        Some(stage) if stage.stage_type == stage_type => Some((r, stage)),
        Some(_) => None,
        None => {
            tracing::debug!(stage = r.stage, "response has no stage definition");
            None
        }
    })
}

// ---------------------------------------------------------------------
//  IQ
// ---------------------------------------------------------------------

/// Difficulty-weighted matrix score on a 70..=145 scale.
pub fn iq_score(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    catalog: &Catalog,
) -> StandardScore {
    let mut seen = 0usize;
    let mut raw = 0.0;
    let mut max_possible = 0.0;

    for (response, stage) in responses_of_type(responses, stages, StageType::Matrix) {
        seen += 1;
        let Some(puzzle) = stage.content_id.as_deref().and_then(|id| catalog.puzzle(id)) else {
            tracing::debug!(stage = stage.stage, "matrix stage without a known puzzle");
            continue;
        };

        let weight = f64::from(stage.difficulty) / 10.0;
        if response.choice.as_index() == Some(puzzle.correct_index()) {
            raw += weight;
            if response.latency_ms < SPEED_BONUS_LATENCY_MS {
                raw += weight * SPEED_BONUS_FRACTION;
            }
        }
        max_possible += weight * (1.0 + SPEED_BONUS_FRACTION);
    }

    if seen == 0 {
        return StandardScore::DEFAULT;
    }

    let fraction = if max_possible > 0.0 {
        raw / max_possible
    } else {
        0.0
    };
    let score = (70.0 + fraction * 75.0).round();
    StandardScore {
        score: score as u32,
        percentile: percentile(score),
    }
}

// ---------------------------------------------------------------------
//  EQ
// ---------------------------------------------------------------------

/// Scenario option quality on a 70..=140 scale.
pub fn eq_score(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    catalog: &Catalog,
) -> StandardScore {
    let mut seen = 0usize;
    let mut points = 0.0;
    let mut max_points = 0.0;

    for (response, stage) in responses_of_type(responses, stages, StageType::Scenario) {
        seen += 1;
        let Some(scenario) = stage.content_id.as_deref().and_then(|id| catalog.scenario(id)) else {
            tracing::debug!(stage = stage.stage, "scenario stage without a known scenario");
            continue;
        };
        max_points += SCENARIO_MAX_POINTS;
        if let Some(option) = response
            .choice
            .as_index()
            .and_then(|i| scenario.options.get(i))
        {
            points += f64::from(option.score);
        }
    }

    if seen == 0 {
        return StandardScore::DEFAULT;
    }

    let fraction = if max_points > 0.0 {
        points / max_points
    } else {
        0.0
    };
    let score = (70.0 + fraction * 70.0).round();
    StandardScore {
        score: score as u32,
        percentile: percentile(score),
    }
}

// ---------------------------------------------------------------------
//  Risk tolerance
// ---------------------------------------------------------------------

/// Convex transform of the pump count: `10 + 85 * (pumps / 30)^1.5`.
pub fn risk_tolerance_for_pumps(pumps: f64) -> u32 {
    let ratio = (pumps / RISK_MAX_PUMPS).clamp(0.0, 1.0);
    (10.0 + 85.0 * ratio.powf(1.5)).round() as u32
}

/// Risk tolerance from the single `bart` response. The percentile is the
/// tolerance itself; the scale is already population-relative.
pub fn risk_score(responses: &[ResponseData], stages: &[StageDefinition]) -> StandardScore {
    let pumps = responses_of_type(responses, stages, StageType::Bart)
        .find_map(|(r, _)| r.choice.as_f64());

    match pumps {
        Some(pumps) => {
            let tolerance = risk_tolerance_for_pumps(pumps);
            StandardScore {
                score: tolerance,
                percentile: tolerance,
            }
        }
        None => StandardScore {
            score: 50,
            percentile: 50,
        },
    }
}

// ---------------------------------------------------------------------
//  Personality
// ---------------------------------------------------------------------

/// Normalize a Likert sum over `count` items to 0..=100. Empty groups score 50.
pub fn normalize_likert(sum: f64, count: usize) -> u32 {
    if count == 0 {
        return 50;
    }
    let n = count as f64;
    let span = n * LIKERT_MAX - n * LIKERT_MIN;
    ((sum - n * LIKERT_MIN) / span * 100.0).round() as u32
}

pub fn ocean_scores(
    responses: &[ResponseData],
    stages: &[StageDefinition],
    catalog: &Catalog,
) -> OceanScores {
    let mut sums = [0.0f64; 5];
    let mut counts = [0usize; 5];

    for (response, stage) in responses_of_type(responses, stages, StageType::Personality) {
        let Some(item) = stage
            .content_id
            .as_deref()
            .and_then(|id| catalog.personality_item(id))
        else {
            tracing::debug!(stage = stage.stage, "personality stage without a known item");
            continue;
        };
        if item.is_attention_check() {
            continue;
        }
        let Some(value) = response.choice.as_f64() else {
            continue;
        };
        let keyed = item.keyed_value(value.clamp(LIKERT_MIN, LIKERT_MAX));
        let idx = dimension_index(item.dimension);
        sums[idx] += keyed;
        counts[idx] += 1;
    }

    let score = |d: OceanDimension| {
        let idx = dimension_index(d);
        normalize_likert(sums[idx], counts[idx])
    };
    OceanScores {
        openness: score(OceanDimension::Openness),
        conscientiousness: score(OceanDimension::Conscientiousness),
        extraversion: score(OceanDimension::Extraversion),
        agreeableness: score(OceanDimension::Agreeableness),
        neuroticism: score(OceanDimension::Neuroticism),
    }
}

fn dimension_index(d: OceanDimension) -> usize {
    match d {
        OceanDimension::Openness => 0,
        OceanDimension::Conscientiousness => 1,
        OceanDimension::Extraversion => 2,
        OceanDimension::Agreeableness => 3,
        OceanDimension::Neuroticism => 4,
    }
}

// ---------------------------------------------------------------------
//  Apex traits
// ---------------------------------------------------------------------

const TRAIT_TEXT: [(&str, &str, &str); 8] = [
    (
        "iq",
        "Fluid Intelligence",
        "Spots abstract patterns quickly and reasons through unfamiliar problems.",
    ),
    (
        "eq",
        "Emotional Intelligence",
        "Reads social situations accurately and responds with measured empathy.",
    ),
    (
        "risk",
        "Risk Appetite",
        "Comfortable pressing for higher rewards when the stakes rise.",
    ),
    (
        "openness",
        "Openness",
        "Drawn to novelty, ideas and aesthetic experience.",
    ),
    (
        "conscientiousness",
        "Conscientiousness",
        "Organised, dependable and driven to follow through.",
    ),
    (
        "extraversion",
        "Extraversion",
        "Energised by people and quick to take the social lead.",
    ),
    (
        "agreeableness",
        "Agreeableness",
        "Cooperative, trusting and attentive to others' needs.",
    ),
    (
        "neuroticism",
        "Emotional Sensitivity",
        "Feels setbacks intensely and stays alert to what could go wrong.",
    ),
];

/// Top three of the eight trait scores, highest first. Ties keep the order
/// iq, eq, risk, then OCEAN.
pub fn apex_traits(
    iq_percentile: u32,
    eq_percentile: u32,
    risk_percentile: u32,
    ocean: &OceanScores,
) -> Vec<ApexTrait> {
    let scores = [
        iq_percentile,
        eq_percentile,
        risk_percentile,
        ocean.openness,
        ocean.conscientiousness,
        ocean.extraversion,
        ocean.agreeableness,
        ocean.neuroticism,
    ];

    let mut ranked: Vec<(usize, u32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(3)
        .map(|(idx, score)| {
            let (key, name, description) = TRAIT_TEXT[idx];
            ApexTrait {
                key: key.to_string(),
                name: name.to_string(),
                score,
                description: description.to_string(),
            }
        })
        .collect()
}
