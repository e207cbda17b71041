use crate::input::{RawFields, coerce_f64};

pub const SURVEY_FEATURES: [&str; 6] = [
    "PoorEyeContact",
    "DelayedSpeech",
    "DifficultyPeerInteraction",
    "RepetitiveMovements",
    "Sensitivity",
    "PrefersRoutine",
];

/// Unanswered or non-numeric questions count as 0.
pub fn survey_answers(raw: &RawFields) -> [f64; 6] {
    let mut out = [0.0; 6];
    for (slot, name) in out.iter_mut().zip(SURVEY_FEATURES.iter()) {
        *slot = raw.get(*name).and_then(coerce_f64).unwrap_or(0.0);
    }
    out
}
