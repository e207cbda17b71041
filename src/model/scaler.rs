use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("X has {got} features, but the scaler is expecting {expected} features as input")]
    DimensionMismatch { expected: usize, got: usize },
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Per-feature affine scaler, fit offline on the canonical feature order.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "unit_range")]
        feature_range: (f64, f64),
    },
}

impl Scaler {
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { data_min, .. } => data_min.len(),
        }
    }

    /// Reports the first internal inconsistency, if any.
    pub fn validate(&self) -> Result<(), String> {
        let (a, b, what) = match self {
            Scaler::Standard { mean, scale } => (mean.len(), scale.len(), "mean/scale"),
            Scaler::MinMax {
                data_min, data_max, ..
            } => (data_min.len(), data_max.len(), "data_min/data_max"),
        };
        if a != b {
            return Err(format!("{what} lengths differ ({a} vs {b})"));
        }
        if let Scaler::MinMax { feature_range, .. } = self {
            if feature_range.0 >= feature_range.1 {
                return Err(format!(
                    "feature_range must be increasing, got ({}, {})",
                    feature_range.0, feature_range.1
                ));
            }
        }
        Ok(())
    }

    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, ScaleError> {
        self.check(x)?;
        let out = match self {
            Scaler::Standard { mean, scale } => x
                .iter()
                .zip(mean.iter().zip(scale.iter()))
                .map(|(v, (m, s))| (v - m) / nonzero(*s))
                .collect(),
            Scaler::MinMax {
                data_min,
                data_max,
                feature_range,
            } => x
                .iter()
                .zip(data_min.iter().zip(data_max.iter()))
                .map(|(v, (lo, hi))| {
                    let (scale, min) = min_max_params(*lo, *hi, *feature_range);
                    v * scale + min
                })
                .collect(),
        };
        Ok(out)
    }

    pub fn inverse_transform(&self, x: &[f64]) -> Result<Vec<f64>, ScaleError> {
        self.check(x)?;
        let out = match self {
            Scaler::Standard { mean, scale } => x
                .iter()
                .zip(mean.iter().zip(scale.iter()))
                .map(|(v, (m, s))| v * nonzero(*s) + m)
                .collect(),
            Scaler::MinMax {
                data_min,
                data_max,
                feature_range,
            } => x
                .iter()
                .zip(data_min.iter().zip(data_max.iter()))
                .map(|(v, (lo, hi))| {
                    let (scale, min) = min_max_params(*lo, *hi, *feature_range);
                    (v - min) / scale
                })
                .collect(),
        };
        Ok(out)
    }

    fn check(&self, x: &[f64]) -> Result<(), ScaleError> {
        let expected = self.n_features();
        if x.len() != expected {
            return Err(ScaleError::DimensionMismatch {
                expected,
                got: x.len(),
            });
        }
        Ok(())
    }
}

// Constant features have zero spread; sklearn scales them by 1.
fn nonzero(s: f64) -> f64 {
    if s == 0.0 { 1.0 } else { s }
}

fn min_max_params(lo: f64, hi: f64, range: (f64, f64)) -> (f64, f64) {
    let scale = (range.1 - range.0) / nonzero(hi - lo);
    let min = range.0 - lo * scale;
    (scale, min)
}
