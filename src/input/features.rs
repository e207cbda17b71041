use crate::input::{RawFields, coerce_f64};

pub const N_FEATURES: usize = 9;

/// Canonical rating order. Serialized scalers were fit on exactly this order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "communication",
    "eye_contact",
    "social_interaction",
    "emotional_response",
    "attention_span",
    "repetitive_actions",
    "sensory_sensitivity",
    "speech_clarity",
    "learning_adaptability",
];

pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;
pub const RATING_DEFAULT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; N_FEATURES],
}

impl FeatureVector {
    pub fn values(&self) -> &[f64; N_FEATURES] {
        &self.values
    }

    pub fn communication(&self) -> f64 {
        self.values[0]
    }

    pub fn eye_contact(&self) -> f64 {
        self.values[1]
    }

    pub fn social_interaction(&self) -> f64 {
        self.values[2]
    }

    pub fn emotional_response(&self) -> f64 {
        self.values[3]
    }

    pub fn attention_span(&self) -> f64 {
        self.values[4]
    }

    pub fn repetitive_actions(&self) -> f64 {
        self.values[5]
    }

    pub fn sensory_sensitivity(&self) -> f64 {
        self.values[6]
    }

    pub fn speech_clarity(&self) -> f64 {
        self.values[7]
    }
}

/// Total: absent, null, non-numeric and NaN entries become the default
/// rating, everything else is clamped to the rating scale.
pub fn normalize_features(raw: &RawFields) -> FeatureVector {
    let mut values = [RATING_DEFAULT; N_FEATURES];
    for (slot, name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
        *slot = raw
            .get(*name)
            .and_then(coerce_f64)
            .filter(|v| !v.is_nan())
            .map(clamp_rating)
            .unwrap_or(RATING_DEFAULT);
    }
    FeatureVector { values }
}

pub fn clamp_rating(v: f64) -> f64 {
    v.clamp(RATING_MIN, RATING_MAX)
}
