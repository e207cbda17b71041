/// Percent split over (Low, Moderate, High). Each split sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskSplit {
    pub low: u8,
    pub moderate: u8,
    pub high: u8,
}

impl RiskSplit {
    pub fn total(&self) -> u32 {
        self.low as u32 + self.moderate as u32 + self.high as u32
    }
}

#[derive(Debug, Clone)]
pub struct HeuristicProfile {
    pub social_severe_below: f64,
    pub social_mild_below: f64,
    pub social_strong_above: f64,
    pub social_severe_weight: f64,
    pub social_mild_weight: f64,
    pub social_strong_weight: f64,
    pub repetitive_above: f64,
    pub repetitive_weight: f64,
    pub sensory_above: f64,
    pub sensory_weight: f64,
    pub emotion_attention_below: f64,
    pub emotion_attention_weight: f64,
    pub speech_below: f64,
    pub speech_weight: f64,
    pub low_below: f64,
    pub moderate_below: f64,
    pub low_split: RiskSplit,
    pub moderate_split: RiskSplit,
    pub high_split: RiskSplit,
}

impl HeuristicProfile {
    pub fn default_v1() -> Self {
        Self {
            social_severe_below: 2.5,
            social_mild_below: 3.0,
            social_strong_above: 4.0,
            social_severe_weight: 3.0,
            social_mild_weight: 1.5,
            social_strong_weight: -1.0,
            repetitive_above: 3.5,
            repetitive_weight: 2.0,
            sensory_above: 3.5,
            sensory_weight: 1.5,
            emotion_attention_below: 2.5,
            emotion_attention_weight: 2.0,
            speech_below: 2.5,
            speech_weight: 1.5,
            low_below: 1.5,
            moderate_below: 4.0,
            low_split: RiskSplit {
                low: 75,
                moderate: 20,
                high: 5,
            },
            moderate_split: RiskSplit {
                low: 25,
                moderate: 60,
                high: 15,
            },
            high_split: RiskSplit {
                low: 10,
                moderate: 25,
                high: 65,
            },
        }
    }
}
