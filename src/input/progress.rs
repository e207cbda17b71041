use crate::input::{InputError, RawFields, coerce_f64};

pub const PROGRESS_FEATURES: [&str; 6] = [
    "week",
    "communication",
    "social_skills",
    "behavior_control",
    "attention_span",
    "sensory_response",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInput {
    /// Regressor input in `PROGRESS_FEATURES` order.
    pub features: [f64; 6],
    pub current_score: f64,
}

impl ProgressInput {
    pub fn from_fields(raw: &RawFields) -> Result<Self, InputError> {
        let mut features = [0.0; 6];
        for (slot, name) in features.iter_mut().zip(PROGRESS_FEATURES.iter()) {
            let value = raw.get(*name).ok_or(InputError::MissingField(name))?;
            *slot = finite(value, name)?;
        }
        let current_score = match raw.get("current_score") {
            None | Some(serde_json::Value::Null) => 0.0,
            Some(v) => finite(v, "current_score")?,
        };
        Ok(Self {
            features,
            current_score,
        })
    }
}

// "inf" and "NaN" strings parse as floats but have no JSON form.
fn finite(value: &serde_json::Value, field: &'static str) -> Result<f64, InputError> {
    coerce_f64(value)
        .filter(|v| v.is_finite())
        .ok_or(InputError::NotNumeric { field })
}
