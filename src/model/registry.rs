use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::config::ModelPaths;
use crate::model::artifact::{ArtifactError, load_artifact, load_optional_artifact};
use crate::model::classifier::Classifier;
use crate::model::labels::{CanonicalLevel, LabelMap};
use crate::model::mlp::DenseNetwork;
use crate::model::scaler::Scaler;

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierArtifact {
    pub estimator: Classifier,
    #[serde(default)]
    pub label_map: Option<BTreeMap<String, CanonicalLevel>>,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RiskModel {
    pub estimator: Classifier,
    pub scaler: Option<Scaler>,
    pub labels: LabelMap,
}

impl RiskModel {
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactError> {
        let artifact: ClassifierArtifact = load_artifact(model_path)?;
        let scaler: Option<Scaler> = load_optional_artifact(scaler_path)?;
        if let Some(s) = &scaler {
            s.validate().map_err(|reason| ArtifactError::Invalid {
                path: scaler_path.to_path_buf(),
                reason,
            })?;
        }
        let labels = match artifact.label_map {
            Some(table) => LabelMap::explicit(table),
            None => LabelMap::infer(artifact.estimator.classes()),
        };
        tracing::debug!(
            classes = artifact.estimator.classes().len(),
            mapped = labels.len(),
            scaled = scaler.is_some(),
            "risk model registered"
        );
        Ok(Self {
            estimator: artifact.estimator,
            scaler,
            labels,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgressModel {
    pub network: DenseNetwork,
    pub scaler_x: Scaler,
    pub scaler_y: Scaler,
}

impl ProgressModel {
    pub fn load(paths: &ModelPaths) -> Result<Self, ArtifactError> {
        let network: DenseNetwork = load_artifact(&paths.progress_model)?;
        network
            .validate()
            .map_err(|reason| ArtifactError::Invalid {
                path: paths.progress_model.clone(),
                reason,
            })?;
        let scaler_x = load_scaler(&paths.progress_scaler_x)?;
        let scaler_y = load_scaler(&paths.progress_scaler_y)?;
        Ok(Self {
            network,
            scaler_x,
            scaler_y,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SurveyModel {
    pub estimator: Classifier,
    pub feature_names: Vec<String>,
}

impl SurveyModel {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: ClassifierArtifact = load_artifact(path)?;
        Ok(Self {
            estimator: artifact.estimator,
            feature_names: artifact.feature_names,
        })
    }
}

fn load_scaler(path: &Path) -> Result<Scaler, ArtifactError> {
    let scaler: Scaler = load_artifact(path)?;
    scaler.validate().map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(scaler)
}

/// Immutable set of model slots. Each slot loads on first access and is
/// never reloaded, so a shared reference can serve concurrent readers.
#[derive(Debug)]
pub struct ModelRegistry {
    paths: ModelPaths,
    risk: OnceLock<Result<RiskModel, ArtifactError>>,
    progress: OnceLock<Result<ProgressModel, ArtifactError>>,
    survey: OnceLock<Result<SurveyModel, ArtifactError>>,
}

impl ModelRegistry {
    pub fn new(paths: ModelPaths) -> Self {
        Self {
            paths,
            risk: OnceLock::new(),
            progress: OnceLock::new(),
            survey: OnceLock::new(),
        }
    }

    pub fn paths(&self) -> &ModelPaths {
        &self.paths
    }

    pub fn risk_model(&self) -> Result<&RiskModel, &ArtifactError> {
        self.risk
            .get_or_init(|| RiskModel::load(&self.paths.risk_model, &self.paths.risk_scaler))
            .as_ref()
    }

    pub fn progress_model(&self) -> Result<&ProgressModel, &ArtifactError> {
        self.progress
            .get_or_init(|| ProgressModel::load(&self.paths))
            .as_ref()
    }

    pub fn survey_model(&self) -> Result<&SurveyModel, &ArtifactError> {
        self.survey
            .get_or_init(|| SurveyModel::load(&self.paths.survey_model))
            .as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/registry.rs"]
mod tests;
