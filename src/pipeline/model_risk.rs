use thiserror::Error;

use crate::input::RawFields;
use crate::input::features::{FeatureVector, normalize_features};
use crate::model::classifier::PredictError;
use crate::model::registry::{ModelRegistry, RiskModel};
use crate::model::risk::{ProbabilityTable, RiskAssessment, RiskLevel};
use crate::model::scaler::ScaleError;
use crate::model::thresholds::HeuristicProfile;
use crate::pipeline::heuristic::assess_heuristic;

#[derive(Debug, Error)]
pub enum ModelStageError {
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Which engine produced an assessment. Logged, never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Model,
    Heuristic,
    Failed,
}

/// Never fails: missing, corrupt or stale artifacts degrade to the
/// heuristic; inference failures surface as an `Unknown` assessment.
pub fn predict_risk(raw: &RawFields, registry: &ModelRegistry) -> RiskAssessment {
    let (assessment, provenance) = predict_risk_traced(raw, registry);
    tracing::info!(
        ?provenance,
        risk = %assessment.risk,
        score = ?assessment.score_value(),
        high = ?assessment.probability.get(&RiskLevel::High),
        "risk assessed"
    );
    assessment
}

pub fn predict_risk_traced(
    raw: &RawFields,
    registry: &ModelRegistry,
) -> (RiskAssessment, Provenance) {
    let features = normalize_features(raw);
    let profile = HeuristicProfile::default_v1();

    let model = match registry.risk_model() {
        Ok(model) => model,
        Err(err) => {
            if err.is_missing() {
                tracing::info!(reason = %err, "no trained risk model; using heuristic");
            } else {
                tracing::warn!(reason = %err, "risk model unusable; using heuristic");
            }
            return (assess_heuristic(&features, &profile), Provenance::Heuristic);
        }
    };

    match score_with_model(model, &features) {
        Ok(assessment) => (assessment, Provenance::Model),
        Err(ModelStageError::Scale(err)) => {
            tracing::info!(reason = %err, "stale scaler; using heuristic");
            (assess_heuristic(&features, &profile), Provenance::Heuristic)
        }
        Err(ModelStageError::Predict(err)) => {
            tracing::warn!(reason = %err, "risk model inference failed");
            (RiskAssessment::unknown(err.to_string()), Provenance::Failed)
        }
    }
}

pub fn score_with_model(
    model: &RiskModel,
    features: &FeatureVector,
) -> Result<RiskAssessment, ModelStageError> {
    let x = match &model.scaler {
        Some(scaler) => scaler.transform(features.values())?,
        None => features.values().to_vec(),
    };

    let estimator = &model.estimator;
    let Some(proba) = estimator.predict_proba(&x)? else {
        let label = estimator.predict(&x)?;
        return Ok(RiskAssessment::scored(
            model.labels.resolve(label),
            ProbabilityTable::new(),
            0.0,
        ));
    };

    let classes = estimator.classes();
    if proba.len() != classes.len() {
        return Err(PredictError::Malformed(format!(
            "{} probabilities for {} classes",
            proba.len(),
            classes.len()
        ))
        .into());
    }

    // No renormalization: percentages follow the estimator's probabilities.
    let mut probability = ProbabilityTable::new();
    for (class, p) in classes.iter().zip(proba.iter()) {
        probability.set(model.labels.resolve(class), p * 100.0);
    }

    if probability.is_empty() {
        return Err(PredictError::Malformed("estimator has no classes".to_string()).into());
    }
    tracing::debug!(
        classes = probability.entries().len(),
        total = probability.total(),
        "model probabilities"
    );

    let risk = model.labels.resolve(estimator.predict(&x)?);
    let score = probability.max_value().unwrap_or(0.0);
    Ok(RiskAssessment::scored(risk, probability, score))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/model_risk.rs"]
mod tests;
