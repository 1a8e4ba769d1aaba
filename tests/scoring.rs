use chrono::{TimeZone, Utc};

use neuralsync::scoring::{eq_score, iq_score};
use neuralsync::{
    calculate_final_scores, generate_stages, Accuracy, Catalog, Choice, ResponseData,
    StageDefinition, StageType,
};

fn at(stage: usize, choice: impl Into<Choice>, latency_ms: u64) -> ResponseData {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    ResponseData::new(stage, choice, latency_ms, Accuracy::Unknown, ts)
}

fn stage_for<'a>(stages: &'a [StageDefinition], content_id: &str) -> &'a StageDefinition {
    stages
        .iter()
        .find(|s| s.content_id.as_deref() == Some(content_id))
        .unwrap()
}

fn matrix_answers(
    catalog: &Catalog,
    stages: &[StageDefinition],
    correct: bool,
) -> Vec<ResponseData> {
    stages
        .iter()
        .filter(|s| s.stage_type == StageType::Matrix)
        .map(|s| {
            let key = catalog
                .puzzle(s.content_id.as_deref().unwrap())
                .unwrap()
                .correct_index();
            let choice = if correct { key } else { (key + 1) % 4 };
            at(s.stage, choice, 4_000)
        })
        .collect()
}

#[test]
fn empty_session_scores_neutral_defaults() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let scores = calculate_final_scores(&[], &stages, &catalog);

    assert_eq!((scores.iq, scores.iq_percentile), (100, 50));
    assert_eq!((scores.eq, scores.eq_percentile), (100, 50));
    assert_eq!((scores.risk_tolerance, scores.risk_percentile), (50, 50));
    assert_eq!(scores.ocean.openness, 50);
    assert_eq!(scores.ocean.neuroticism, 50);

    // every trait ties at 50, so the declared order decides
    let keys: Vec<&str> = scores.apex_traits.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["iq", "eq", "risk"]);
}

#[test]
fn perfect_fast_matrix_block_tops_the_iq_scale() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let responses = matrix_answers(&catalog, &stages, true);
    assert_eq!(responses.len(), 18);

    let iq = iq_score(&responses, &stages, &catalog);
    assert_eq!(iq.score, 145);
    assert_eq!(iq.percentile, 99);
}

#[test]
fn all_wrong_matrix_block_bottoms_out_at_seventy() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let responses = matrix_answers(&catalog, &stages, false);

    let iq = iq_score(&responses, &stages, &catalog);
    assert_eq!(iq.score, 70);
    // z = -2
    assert_eq!(iq.percentile, 2);
}

#[test]
fn slow_correct_answers_miss_the_speed_bonus() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let mut responses = matrix_answers(&catalog, &stages, true);
    for r in &mut responses {
        r.latency_ms = 25_000;
    }

    // raw / max = 1 / 1.2, about 132.5
    let iq = iq_score(&responses, &stages, &catalog);
    assert!(iq.score > 130 && iq.score < 135, "iq = {}", iq.score);
}

#[test]
fn best_scenario_option_scores_top_of_eq_scale() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let stage = stage_for(&stages, "eq-01").stage;

    let eq = eq_score(&[at(stage, 3_i64, 6_000)], &stages, &catalog);
    assert_eq!(eq.score, 140);
    assert_eq!(eq.percentile, 99);

    // option score 1 of 5
    let eq = eq_score(&[at(stage, 0_i64, 6_000)], &stages, &catalog);
    assert_eq!(eq.score, 84);
}

#[test]
fn out_of_range_scenario_choice_earns_nothing() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let stage = stage_for(&stages, "eq-02").stage;

    let eq = eq_score(&[at(stage, 9_i64, 6_000)], &stages, &catalog);
    assert_eq!(eq.score, 70);
}

#[test]
fn reverse_keyed_item_is_recoded() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let stage = stage_for(&stages, "p-o-02").stage;

    let scores = calculate_final_scores(&[at(stage, 2_i64, 3_000)], &stages, &catalog);
    // 8 - 2 = 6 on a 1..7 scale
    assert_eq!(scores.ocean.openness, 83);
    assert_eq!(scores.hexaco.openness, 83);
    assert_eq!(scores.ocean.conscientiousness, 50);
}

#[test]
fn attention_items_do_not_move_personality_scores() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let responses: Vec<ResponseData> = catalog
        .attention_check_ids()
        .iter()
        .map(|id| at(stage_for(&stages, id).stage, 7_i64, 3_000))
        .collect();

    let scores = calculate_final_scores(&responses, &stages, &catalog);
    assert_eq!(scores.ocean.openness, 50);
    assert_eq!(scores.ocean.conscientiousness, 50);
    assert_eq!(scores.ocean.extraversion, 50);
    assert_eq!(scores.ocean.agreeableness, 50);
    assert_eq!(scores.ocean.neuroticism, 50);
}

#[test]
fn bart_pumps_drive_risk_tolerance() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let bart = stages
        .iter()
        .find(|s| s.stage_type == StageType::Bart)
        .unwrap()
        .stage;

    let scores = calculate_final_scores(&[at(bart, 15.0, 9_000)], &stages, &catalog);
    assert_eq!(scores.risk_tolerance, 40);
    assert_eq!(scores.risk_percentile, 40);

    let scores = calculate_final_scores(&[at(bart, 30_i64, 9_000)], &stages, &catalog);
    assert_eq!(scores.risk_tolerance, 95);
}

#[test]
fn responses_without_a_stage_are_ignored() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let responses = vec![at(999, 3_i64, 4_000), at(1_000, "red", 4_000)];

    let scores = calculate_final_scores(&responses, &stages, &catalog);
    assert_eq!((scores.iq, scores.eq, scores.risk_tolerance), (100, 100, 50));
}

#[test]
fn honesty_humility_tracks_agreeableness() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let responses: Vec<ResponseData> = ["p-a-01", "p-a-03"]
        .iter()
        .map(|id| at(stage_for(&stages, id).stage, 7_i64, 3_000))
        .collect();

    let scores = calculate_final_scores(&responses, &stages, &catalog);
    assert_eq!(scores.ocean.agreeableness, 100);
    assert_eq!(scores.hexaco.honesty_humility, 100);
    assert_eq!(scores.apex_traits[0].key, "agreeableness");
}

#[test]
fn final_scores_serialize_in_camel_case() {
    let catalog = Catalog::builtin();
    let stages = generate_stages(&catalog);
    let scores = calculate_final_scores(&[], &stages, &catalog);
    let v = serde_json::to_value(&scores).unwrap();

    assert_eq!(v["iqPercentile"], 50);
    assert_eq!(v["riskTolerance"], 50);
    assert!(v["apexTraits"].as_array().unwrap().len() == 3);
    assert!(v["hexaco"].get("honesty_humility").is_some());
}
