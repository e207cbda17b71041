use std::path::{Path, PathBuf};

pub const RISK_MODEL_FILE: &str = "asd_model.json";
pub const RISK_SCALER_FILE: &str = "scaler.json";
pub const PROGRESS_MODEL_FILE: &str = "bpnn_progress_model.json";
pub const PROGRESS_SCALER_X_FILE: &str = "bpnn_scaler_x.json";
pub const PROGRESS_SCALER_Y_FILE: &str = "bpnn_scaler_y.json";
pub const SURVEY_MODEL_FILE: &str = "survey_dt.json";
pub const WORKER_ENTRYPOINT: &str = "asd_fmri/predict_mri.py";
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Fixed artifact locations under one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub base_dir: PathBuf,
    pub risk_model: PathBuf,
    pub risk_scaler: PathBuf,
    pub progress_model: PathBuf,
    pub progress_scaler_x: PathBuf,
    pub progress_scaler_y: PathBuf,
    pub survey_model: PathBuf,
    pub worker_entrypoint: PathBuf,
}

impl ModelPaths {
    pub fn under(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            risk_model: base_dir.join(RISK_MODEL_FILE),
            risk_scaler: base_dir.join(RISK_SCALER_FILE),
            progress_model: base_dir.join(PROGRESS_MODEL_FILE),
            progress_scaler_x: base_dir.join(PROGRESS_SCALER_X_FILE),
            progress_scaler_y: base_dir.join(PROGRESS_SCALER_Y_FILE),
            survey_model: base_dir.join(SURVEY_MODEL_FILE),
            worker_entrypoint: base_dir.join(WORKER_ENTRYPOINT),
        }
    }
}

/// Directory holding the running executable, else the working directory.
pub fn default_model_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn resolve_model_dir(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => default_model_dir(),
    }
}
