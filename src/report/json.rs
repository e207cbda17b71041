use serde::Serialize;
use serde_json::json;

use crate::model::risk::RiskAssessment;

pub const NO_RISK_INPUT: &str = "No input provided. Expected JSON string with features.";
pub const NO_INPUT: &str = "No input provided";
pub const NO_WORKER_INPUT: &str = "Missing file path argument";

/// Compact JSON plus a trailing newline.
pub fn render<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(mut text) => {
            text.push('\n');
            text
        }
        Err(err) => render_error(&format!("Unexpected error: {err}")),
    }
}

/// `{"error": ...}` for progress, survey and worker failures.
pub fn render_error(message: &str) -> String {
    format!("{}\n", json!({ "error": message }))
}

/// `{"error": ..., "risk": "Unknown", "probability": {}}` for risk failures.
pub fn render_risk_error(message: &str) -> String {
    render(&RiskAssessment::unknown(message))
}
