pub mod artifact;
pub mod classifier;
pub mod labels;
pub mod mlp;
pub mod registry;
pub mod risk;
pub mod scaler;
pub mod thresholds;

/// Index of the first maximum, matching numpy's `argmax` tie rule.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/tests.rs"]
mod tests;
