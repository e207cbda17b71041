use crate::input::RawFields;
use crate::input::features::{FeatureVector, normalize_features};
use crate::model::risk::{ProbabilityTable, RiskAssessment, RiskLevel};
use crate::model::thresholds::{HeuristicProfile, RiskSplit};

/// Domain averages the rules are evaluated on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicSignals {
    pub comm_eye_social: f64,
    pub repetitive: f64,
    pub sensory: f64,
    pub emotion_attention: f64,
    pub speech: f64,
}

impl HeuristicSignals {
    pub fn from_features(f: &FeatureVector) -> Self {
        Self {
            comm_eye_social: (f.communication() + f.eye_contact() + f.social_interaction()) / 3.0,
            repetitive: f.repetitive_actions(),
            sensory: f.sensory_sensitivity(),
            emotion_attention: (f.emotional_response() + f.attention_span()) / 2.0,
            speech: f.speech_clarity(),
        }
    }
}

pub fn risk_score(signals: &HeuristicSignals, profile: &HeuristicProfile) -> f64 {
    let mut score = 0.0;

    if signals.comm_eye_social < profile.social_severe_below {
        score += profile.social_severe_weight;
    } else if signals.comm_eye_social < profile.social_mild_below {
        score += profile.social_mild_weight;
    } else if signals.comm_eye_social > profile.social_strong_above {
        score += profile.social_strong_weight;
    }

    if signals.repetitive > profile.repetitive_above {
        score += profile.repetitive_weight;
    }
    if signals.sensory > profile.sensory_above {
        score += profile.sensory_weight;
    }
    if signals.emotion_attention < profile.emotion_attention_below {
        score += profile.emotion_attention_weight;
    }
    if signals.speech < profile.speech_below {
        score += profile.speech_weight;
    }

    score
}

pub fn bucket(score: f64, profile: &HeuristicProfile) -> (RiskLevel, RiskSplit) {
    if score < profile.low_below {
        (RiskLevel::Low, profile.low_split)
    } else if score < profile.moderate_below {
        (RiskLevel::Moderate, profile.moderate_split)
    } else {
        (RiskLevel::High, profile.high_split)
    }
}

pub fn assess_heuristic(features: &FeatureVector, profile: &HeuristicProfile) -> RiskAssessment {
    let signals = HeuristicSignals::from_features(features);
    let score = risk_score(&signals, profile);
    let (risk, split) = bucket(score, profile);
    debug_assert_eq!(split.total(), 100);

    let mut probability = ProbabilityTable::new();
    probability.set(RiskLevel::Low, split.low as f64);
    probability.set(RiskLevel::Moderate, split.moderate as f64);
    probability.set(RiskLevel::High, split.high as f64);

    RiskAssessment::scored(risk, probability, split.high as f64)
}

pub fn assess_heuristic_fields(raw: &RawFields) -> RiskAssessment {
    assess_heuristic(&normalize_features(raw), &HeuristicProfile::default_v1())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/heuristic.rs"]
mod tests;
