use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::argmax;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("X has {got} features, but the estimator is expecting {expected} features as input")]
    FeatureCount { expected: usize, got: usize },
    #[error("malformed estimator: {0}")]
    Malformed(String),
    #[error("estimator produced a non-finite value")]
    NonFinite,
}

/// Linear decision function `coef . x + intercept`, one row per class
/// (a single row for binary problems).
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub classes: Vec<Value>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

/// sklearn-style flattened tree. A node is a leaf when `children_left`
/// is negative; samples with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub classes: Vec<Value>,
    pub n_features: usize,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions).
    pub value: Vec<Vec<f64>>,
    #[serde(default)]
    pub feature_importances: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    LogisticRegression(LinearModel),
    /// Decision function only; exposes no class probabilities.
    RidgeClassifier(LinearModel),
    DecisionTree(DecisionTree),
}

impl Classifier {
    pub fn classes(&self) -> &[Value] {
        match self {
            Classifier::LogisticRegression(m) | Classifier::RidgeClassifier(m) => &m.classes,
            Classifier::DecisionTree(t) => &t.classes,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Classifier::LogisticRegression(m) | Classifier::RidgeClassifier(m) => {
                m.coef.first().map(Vec::len).unwrap_or(0)
            }
            Classifier::DecisionTree(t) => t.n_features,
        }
    }

    pub fn has_proba(&self) -> bool {
        !matches!(self, Classifier::RidgeClassifier(_))
    }

    pub fn feature_importances(&self) -> &[f64] {
        match self {
            Classifier::DecisionTree(t) => &t.feature_importances,
            _ => &[],
        }
    }

    /// `Ok(None)` when the estimator has no probability interface.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Option<Vec<f64>>, PredictError> {
        self.check_width(x)?;
        match self {
            Classifier::LogisticRegression(m) => {
                let d = m.decision(x)?;
                let proba = if d.len() == 1 {
                    let p = sigmoid(d[0]);
                    vec![1.0 - p, p]
                } else {
                    softmax(&d)
                };
                finite(&proba)?;
                Ok(Some(proba))
            }
            Classifier::RidgeClassifier(_) => Ok(None),
            Classifier::DecisionTree(t) => t.leaf_proba(x).map(Some),
        }
    }

    pub fn predict(&self, x: &[f64]) -> Result<&Value, PredictError> {
        self.check_width(x)?;
        let idx = match self {
            Classifier::LogisticRegression(m) | Classifier::RidgeClassifier(m) => {
                let d = m.decision(x)?;
                finite(&d)?;
                if d.len() == 1 {
                    usize::from(d[0] > 0.0)
                } else {
                    argmax(&d).ok_or_else(|| PredictError::Malformed("no classes".into()))?
                }
            }
            Classifier::DecisionTree(t) => {
                let proba = t.leaf_proba(x)?;
                argmax(&proba).ok_or_else(|| PredictError::Malformed("no classes".into()))?
            }
        };
        self.classes().get(idx).ok_or_else(|| {
            PredictError::Malformed(format!(
                "class index {idx} outside vocabulary of {}",
                self.classes().len()
            ))
        })
    }

    fn check_width(&self, x: &[f64]) -> Result<(), PredictError> {
        let expected = self.n_features();
        if x.len() != expected {
            return Err(PredictError::FeatureCount {
                expected,
                got: x.len(),
            });
        }
        Ok(())
    }
}

impl LinearModel {
    fn decision(&self, x: &[f64]) -> Result<Vec<f64>, PredictError> {
        let rows = self.coef.len();
        let binary = rows == 1 && self.classes.len() == 2;
        if !binary && rows != self.classes.len() {
            return Err(PredictError::Malformed(format!(
                "{rows} coefficient rows for {} classes",
                self.classes.len()
            )));
        }
        if self.intercept.len() != rows {
            return Err(PredictError::Malformed(format!(
                "{} intercepts for {rows} coefficient rows",
                self.intercept.len()
            )));
        }
        let mut out = Vec::with_capacity(rows);
        for (row, b) in self.coef.iter().zip(self.intercept.iter()) {
            if row.len() != x.len() {
                return Err(PredictError::Malformed(
                    "ragged coefficient matrix".to_string(),
                ));
            }
            out.push(row.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f64>() + b);
        }
        Ok(out)
    }
}

impl DecisionTree {
    fn leaf(&self, x: &[f64]) -> Result<usize, PredictError> {
        let n_nodes = self.value.len();
        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer than n_nodes steps.
        for _ in 0..=n_nodes {
            let left = *self
                .children_left
                .get(node)
                .ok_or_else(|| malformed_node(node))?;
            if left < 0 {
                return Ok(node);
            }
            let right = *self
                .children_right
                .get(node)
                .ok_or_else(|| malformed_node(node))?;
            let feature = *self.feature.get(node).ok_or_else(|| malformed_node(node))?;
            let threshold = *self
                .threshold
                .get(node)
                .ok_or_else(|| malformed_node(node))?;
            let v = usize::try_from(feature)
                .ok()
                .and_then(|f| x.get(f))
                .ok_or_else(|| malformed_node(node))?;
            let next = if *v <= threshold { left } else { right };
            node = usize::try_from(next).map_err(|_| malformed_node(node))?;
        }
        Err(PredictError::Malformed("tree contains a cycle".to_string()))
    }

    fn leaf_proba(&self, x: &[f64]) -> Result<Vec<f64>, PredictError> {
        let leaf = self.leaf(x)?;
        let weights = self.value.get(leaf).ok_or_else(|| malformed_node(leaf))?;
        if weights.len() != self.classes.len() {
            return Err(PredictError::Malformed(format!(
                "leaf {leaf} has {} weights for {} classes",
                weights.len(),
                self.classes.len()
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(PredictError::Malformed(format!("leaf {leaf} is empty")));
        }
        let proba: Vec<f64> = weights.iter().map(|w| w / total).collect();
        finite(&proba)?;
        Ok(proba)
    }
}

fn malformed_node(node: usize) -> PredictError {
    PredictError::Malformed(format!("node {node} is out of range"))
}

fn finite(values: &[f64]) -> Result<(), PredictError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PredictError::NonFinite)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
