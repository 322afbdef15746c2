use crate::error::PredictionError;
use serde::Serialize;

/// Class labels in model output order.
pub const LETTERS: [&str; 26] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z",
];

pub const UNKNOWN_LABEL: &str = "unknown";

pub fn label_for(index: usize) -> &'static str {
    LETTERS.get(index).copied().unwrap_or(UNKNOWN_LABEL)
}

/// Index and value of the first maximum, `None` for an empty slice.
pub fn argmax(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub letter: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Self, PredictionError> {
        let (index, confidence) = argmax(probabilities).ok_or_else(|| {
            PredictionError::Prediction("model returned an empty probability vector".to_string())
        })?;

        Ok(Self {
            letter: label_for(index).to_string(),
            confidence,
        })
    }
}
