use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use super::labels::Emotion;

/// Percentage per emotion, kept in classifier label order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmotionDistribution([f64; Emotion::COUNT]);

impl EmotionDistribution {
    pub fn from_percentages(values: [f64; Emotion::COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        self.0[emotion.index()]
    }

    /// (emotion, percent) pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.iter().map(move |&e| (e, self.0[e.index()]))
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Emotions sorted by descending percentage; ties keep label order
    pub fn ranked(&self) -> Vec<(Emotion, f64)> {
        let mut ranked: Vec<(Emotion, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Highest-scoring emotion, or `None` when every value is zero
    pub fn primary(&self) -> Option<Emotion> {
        self.ranked()
            .first()
            .filter(|(_, percent)| *percent > 0.0)
            .map(|(emotion, _)| *emotion)
    }
}

impl Serialize for EmotionDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Emotion::COUNT))?;
        for (emotion, percent) in self.iter() {
            map.serialize_entry(emotion.label(), &percent)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = HashMap::<Emotion, f64>::deserialize(deserializer)?;
        let mut values = [0.0f64; Emotion::COUNT];
        for emotion in Emotion::ALL {
            values[emotion.index()] = *entries
                .get(&emotion)
                .ok_or_else(|| D::Error::custom(format!("missing emotion: {}", emotion)))?;
        }
        Ok(Self(values))
    }
}

/// Coarse confidence tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Tier of a 0-100 score; 40 and 70 belong to the lower tier
    pub fn from_score(score: f64) -> Self {
        if score <= 40.0 {
            Self::Low
        } else if score <= 70.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence score (0-100, two decimals) and its tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    #[serde(rename = "confidence_score")]
    pub score: f64,
    #[serde(rename = "confidence_level")]
    pub level: ConfidenceLevel,
}

impl ConfidenceResult {
    pub fn from_score(score: f64) -> Self {
        Self {
            score,
            level: ConfidenceLevel::from_score(score),
        }
    }
}

/// Caller-visible result of analyzing one recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub emotions: EmotionDistribution,
    #[serde(flatten)]
    pub confidence: ConfidenceResult,
}

impl PredictionResult {
    pub fn confidence_score(&self) -> f64 {
        self.confidence.score
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence.level
    }
}
