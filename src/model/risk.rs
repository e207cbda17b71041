use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Unknown,
    /// A model label with no entry in the label table; carried verbatim.
    Unrecognized(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Unknown => "Unknown",
            RiskLevel::Unrecognized(label) => label,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Percentages keyed by risk level, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityTable {
    entries: Vec<(RiskLevel, f64)>,
}

impl ProbabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyed by wire name; overwrites in place when the key is already present.
    pub fn set(&mut self, level: RiskLevel, percent: f64) {
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(l, _)| l.as_str() == level.as_str())
        {
            slot.1 = percent;
        } else {
            self.entries.push((level, percent));
        }
    }

    pub fn get(&self, level: &RiskLevel) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l.as_str() == level.as_str())
            .map(|(_, p)| *p)
    }

    pub fn entries(&self) -> &[(RiskLevel, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.entries.iter().map(|(_, p)| *p).fold(None, |acc, p| match acc {
            Some(m) if m >= p => Some(m),
            _ => Some(p),
        })
    }
}

impl Serialize for ProbabilityTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (level, percent) in &self.entries {
            map.serialize_entry(level.as_str(), &Number(*percent))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub risk: RiskLevel,
    pub probability: ProbabilityTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Number>,
}

impl RiskAssessment {
    pub fn scored(risk: RiskLevel, probability: ProbabilityTable, score: f64) -> Self {
        Self {
            error: None,
            risk,
            probability,
            score: Some(Number(score)),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            risk: RiskLevel::Unknown,
            probability: ProbabilityTable::new(),
            score: None,
        }
    }

    pub fn score_value(&self) -> Option<f64> {
        self.score.map(|n| n.0)
    }
}

/// Integral values serialize as JSON integers (`75`, not `75.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(pub f64);

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}
