use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotion classes, in the order the classifier emits their scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Calm,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgust,
}

impl Emotion {
    /// Every emotion in classifier output order
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Calm,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgust,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this emotion's score in the classifier output
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Calm => "calm",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Fearful => "fearful",
            Self::Disgust => "disgust",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown emotion: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_order() {
        let labels: Vec<&str> = Emotion::ALL.iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            vec!["neutral", "calm", "happy", "sad", "angry", "fearful", "disgust"]
        );
    }

    #[test]
    fn test_index_matches_order() {
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(emotion.index(), i);
        }
        assert_eq!(Emotion::COUNT, 7);
    }

    #[test]
    fn test_emotion_parse() {
        assert_eq!("happy".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert_eq!("FEARFUL".parse::<Emotion>().unwrap(), Emotion::Fearful);
        assert!("surprised".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_serde_label() {
        assert_eq!(serde_json::to_string(&Emotion::Disgust).unwrap(), "\"disgust\"");
    }
}
