use serde::Deserialize;

use crate::model::classifier::PredictError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, v: f64) -> f64 {
        match self {
            Activation::Linear => v,
            Activation::Relu => v.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-v).exp()),
            Activation::Tanh => v.tanh(),
        }
    }
}

/// Fully connected layer; `kernel[i][j]` weights input `i` into unit `j`.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

/// Inference-only feed-forward regressor. Dropout layers are not stored.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseNetwork {
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn n_inputs(&self) -> usize {
        self.layers.first().map(|l| l.kernel.len()).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.layers.is_empty() {
            return Err("network has no layers".to_string());
        }
        let mut width = self.n_inputs();
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.kernel.len() != width {
                return Err(format!(
                    "layer {idx} expects {} inputs but receives {width}",
                    layer.kernel.len()
                ));
            }
            if layer.kernel.iter().any(|row| row.len() != layer.bias.len()) {
                return Err(format!("layer {idx} kernel does not match its bias"));
            }
            width = layer.bias.len();
        }
        Ok(())
    }

    pub fn forward(&self, x: &[f64]) -> Result<Vec<f64>, PredictError> {
        let expected = self.n_inputs();
        if x.len() != expected {
            return Err(PredictError::FeatureCount {
                expected,
                got: x.len(),
            });
        }
        let mut current = x.to_vec();
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.kernel.len() != current.len() {
                return Err(PredictError::Malformed(format!(
                    "layer {idx} expects {} inputs but receives {}",
                    layer.kernel.len(),
                    current.len()
                )));
            }
            let mut next = layer.bias.clone();
            for (v, row) in current.iter().zip(layer.kernel.iter()) {
                if row.len() != next.len() {
                    return Err(PredictError::Malformed(format!(
                        "layer {idx} kernel does not match its bias"
                    )));
                }
                for (acc, w) in next.iter_mut().zip(row.iter()) {
                    *acc += v * w;
                }
            }
            for v in next.iter_mut() {
                *v = layer.activation.apply(*v);
            }
            current = next;
        }
        if current.iter().any(|v| !v.is_finite()) {
            return Err(PredictError::NonFinite);
        }
        Ok(current)
    }
}
