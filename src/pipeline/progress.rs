use serde::Serialize;
use thiserror::Error;

use crate::input::progress::ProgressInput;
use crate::model::artifact::ArtifactError;
use crate::model::classifier::PredictError;
use crate::model::registry::ProgressModel;
use crate::model::scaler::ScaleError;

pub const TREND_BAND: f64 = 2.0;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("{0}")]
    Unavailable(String),
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("regressor produced no output")]
    EmptyOutput,
}

impl From<&ArtifactError> for ProgressError {
    fn from(err: &ArtifactError) -> Self {
        ProgressError::Unavailable(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// Wire values are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressAssessment {
    pub current_score: f64,
    pub predicted_score: f64,
    pub improvement: f64,
    pub improvement_percentage: f64,
    pub trend: Trend,
}

/// The band edges themselves count as stable.
pub fn classify_trend(improvement: f64) -> Trend {
    if improvement > TREND_BAND {
        Trend::Improving
    } else if improvement < -TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

pub fn improvement_percentage(improvement: f64, current_score: f64) -> f64 {
    if current_score > 0.0 {
        improvement / current_score * 100.0
    } else {
        0.0
    }
}

pub fn predict_progress(
    input: &ProgressInput,
    model: &ProgressModel,
) -> Result<ProgressAssessment, ProgressError> {
    let scaled = model.scaler_x.transform(&input.features)?;
    let output = model.network.forward(&scaled)?;
    let predicted_scaled = *output.first().ok_or(ProgressError::EmptyOutput)?;
    let predicted = *model
        .scaler_y
        .inverse_transform(&[predicted_scaled])?
        .first()
        .ok_or(ProgressError::EmptyOutput)?;

    let improvement = predicted - input.current_score;
    let trend = classify_trend(improvement);
    tracing::debug!(predicted, improvement, ?trend, "progress predicted");

    Ok(ProgressAssessment {
        current_score: input.current_score,
        predicted_score: round2(predicted),
        improvement: round2(improvement),
        improvement_percentage: round2(improvement_percentage(improvement, input.current_score)),
        trend,
    })
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/progress.rs"]
mod tests;
