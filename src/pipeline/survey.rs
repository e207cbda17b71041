use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::input::survey::SURVEY_FEATURES;
use crate::model::artifact::ArtifactError;
use crate::model::classifier::PredictError;
use crate::model::registry::SurveyModel;

pub const TOP_FEATURES: usize = 3;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("{0}")]
    Unavailable(String),
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("survey model exposes no class probabilities")]
    NoProbabilities,
}

impl From<&ArtifactError> for SurveyError {
    fn from(err: &ArtifactError) -> Self {
        SurveyError::Unavailable(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResult {
    pub classification_result: Value,
    pub probability: f64,
    pub important_features: Vec<String>,
}

pub fn classify_survey(answers: &[f64], model: &SurveyModel) -> Result<SurveyResult, SurveyError> {
    let estimator = &model.estimator;
    let label = estimator.predict(answers)?.clone();
    let proba = estimator
        .predict_proba(answers)?
        .ok_or(SurveyError::NoProbabilities)?;
    let probability = proba.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let names: Vec<&str> = if model.feature_names.len() == SURVEY_FEATURES.len() {
        model.feature_names.iter().map(String::as_str).collect()
    } else {
        SURVEY_FEATURES.to_vec()
    };

    Ok(SurveyResult {
        classification_result: label,
        probability,
        important_features: top_features(&names, estimator.feature_importances(), TOP_FEATURES),
    })
}

/// Highest importances first; ties keep declaration order. Zero-importance
/// features are never reported.
pub fn top_features(names: &[&str], importances: &[f64], limit: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, f64)> = names
        .iter()
        .copied()
        .zip(importances.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
        .into_iter()
        .take(limit)
        .filter(|(_, importance)| *importance > 0.0)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/survey.rs"]
mod tests;
