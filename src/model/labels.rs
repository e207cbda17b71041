use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::model::risk::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CanonicalLevel {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(
        alias = "moderate",
        alias = "MODERATE",
        alias = "Medium",
        alias = "medium",
        alias = "MEDIUM"
    )]
    Moderate,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

impl From<CanonicalLevel> for RiskLevel {
    fn from(value: CanonicalLevel) -> Self {
        match value {
            CanonicalLevel::Low => RiskLevel::Low,
            CanonicalLevel::Moderate => RiskLevel::Moderate,
            CanonicalLevel::High => RiskLevel::High,
        }
    }
}

/// Class label -> canonical level, fixed when a model is registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMap {
    entries: BTreeMap<String, CanonicalLevel>,
}

impl LabelMap {
    pub fn explicit(entries: BTreeMap<String, CanonicalLevel>) -> Self {
        Self { entries }
    }

    /// Derives the table from the class vocabulary. Keyword priority is
    /// `high`, then `medium`/`moderate`, then `low`; other labels get no entry.
    pub fn infer(classes: &[Value]) -> Self {
        let mut entries = BTreeMap::new();
        for class in classes {
            let key = label_key(class);
            if let Some(level) = keyword_level(&key) {
                entries.insert(key, level);
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Unmapped labels already spelled as a canonical level resolve to it.
    pub fn resolve(&self, label: &Value) -> RiskLevel {
        let key = label_key(label);
        match self.entries.get(&key) {
            Some(level) => (*level).into(),
            None => match key.as_str() {
                "Low" => RiskLevel::Low,
                "Moderate" => RiskLevel::Moderate,
                "High" => RiskLevel::High,
                _ => RiskLevel::Unrecognized(key),
            },
        }
    }
}

/// Strings are used as-is, any other JSON value by its JSON text.
pub fn label_key(label: &Value) -> String {
    match label {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn keyword_level(label: &str) -> Option<CanonicalLevel> {
    let lower = label.trim().to_lowercase();
    if lower.contains("high") {
        Some(CanonicalLevel::High)
    } else if lower.contains("medium") || lower.contains("moderate") {
        Some(CanonicalLevel::Moderate)
    } else if lower.contains("low") {
        Some(CanonicalLevel::Low)
    } else {
        None
    }
}
