use serde_json::json;

use super::*;
use crate::input::RawFields;

fn fields(value: serde_json::Value) -> RawFields {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test fixture must be an object"),
    }
}

fn uniform(v: f64) -> RawFields {
    let mut raw = RawFields::new();
    for name in crate::input::features::FEATURE_NAMES {
        raw.insert(name.to_string(), json!(v));
    }
    raw
}

#[test]
fn test_all_neutral_ratings_are_low() {
    let a = assess_heuristic_fields(&uniform(3.0));
    assert_eq!(a.risk, RiskLevel::Low);
    assert_eq!(a.probability.get(&RiskLevel::Low), Some(75.0));
    assert_eq!(a.probability.get(&RiskLevel::Moderate), Some(20.0));
    assert_eq!(a.probability.get(&RiskLevel::High), Some(5.0));
    assert_eq!(a.score_value(), Some(5.0));
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        r#"{"risk":"Low","probability":{"Low":75,"Moderate":20,"High":5},"score":5}"#
    );
}

#[test]
fn test_every_rule_firing_is_high() {
    let raw = fields(json!({
        "communication": 1,
        "eye_contact": 1,
        "social_interaction": 1,
        "emotional_response": 1,
        "attention_span": 1,
        "repetitive_actions": 5,
        "sensory_sensitivity": 5,
        "speech_clarity": 1,
        "learning_adaptability": 3
    }));
    let features = normalize_features(&raw);
    let profile = HeuristicProfile::default_v1();
    let signals = HeuristicSignals::from_features(&features);
    assert_eq!(signals.comm_eye_social, 1.0);
    assert_eq!(signals.emotion_attention, 1.0);
    assert_eq!(risk_score(&signals, &profile), 10.0);

    let a = assess_heuristic(&features, &profile);
    assert_eq!(a.risk, RiskLevel::High);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        r#"{"risk":"High","probability":{"Low":10,"Moderate":25,"High":65},"score":65}"#
    );
}

#[test]
fn test_social_band_edges() {
    let profile = HeuristicProfile::default_v1();

    // Exactly 2.5 is the mild band, which alone reaches Moderate.
    let a = assess_heuristic(&normalize_features(&uniform(2.5)), &profile);
    let s = HeuristicSignals::from_features(&normalize_features(&uniform(2.5)));
    assert_eq!(risk_score(&s, &profile), 1.5);
    assert_eq!(a.risk, RiskLevel::Moderate);

    let raw = fields(json!({"communication": 4.5, "eye_contact": 4.5, "social_interaction": 4.5}));
    let s = HeuristicSignals::from_features(&normalize_features(&raw));
    assert_eq!(risk_score(&s, &profile), -1.0);

    let raw = fields(json!({"communication": 4, "eye_contact": 4, "social_interaction": 4}));
    let s = HeuristicSignals::from_features(&normalize_features(&raw));
    assert_eq!(risk_score(&s, &profile), 0.0);
}

#[test]
fn test_threshold_rules_are_strict() {
    let profile = HeuristicProfile::default_v1();
    let raw = fields(json!({"repetitive_actions": 3.5, "sensory_sensitivity": 3.5}));
    let s = HeuristicSignals::from_features(&normalize_features(&raw));
    assert_eq!(risk_score(&s, &profile), 0.0);

    let raw = fields(json!({"repetitive_actions": 3.6}));
    let s = HeuristicSignals::from_features(&normalize_features(&raw));
    assert_eq!(risk_score(&s, &profile), 2.0);
}

#[test]
fn test_bucket_edges() {
    let profile = HeuristicProfile::default_v1();
    assert_eq!(bucket(1.49, &profile).0, RiskLevel::Low);
    assert_eq!(bucket(1.5, &profile).0, RiskLevel::Moderate);
    assert_eq!(bucket(3.99, &profile).0, RiskLevel::Moderate);
    assert_eq!(bucket(4.0, &profile).0, RiskLevel::High);
}

#[test]
fn test_probabilities_always_sum_to_100() {
    for v in [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0] {
        let a = assess_heuristic_fields(&uniform(v));
        assert_eq!(a.probability.total(), 100.0);
        assert_eq!(a.score_value(), a.probability.get(&RiskLevel::High));
    }
}

#[test]
fn test_heuristic_determinism_bits() {
    let raw = fields(json!({
        "communication": 2.2,
        "eye_contact": 2.9,
        "social_interaction": 3.1,
        "emotional_response": 2.4,
        "attention_span": 2.5,
        "speech_clarity": 2.49
    }));
    let profile = HeuristicProfile::default_v1();
    let sa = HeuristicSignals::from_features(&normalize_features(&raw));
    let sb = HeuristicSignals::from_features(&normalize_features(&raw));
    assert_eq!(
        risk_score(&sa, &profile).to_bits(),
        risk_score(&sb, &profile).to_bits()
    );
    assert_eq!(sa.comm_eye_social.to_bits(), sb.comm_eye_social.to_bits());

    let a = assess_heuristic_fields(&raw);
    let b = assess_heuristic_fields(&raw);
    assert_eq!(a, b);
}
