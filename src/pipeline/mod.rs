pub mod heuristic;
pub mod model_risk;
pub mod progress;
pub mod survey;
