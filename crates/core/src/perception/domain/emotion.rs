use serde::{Deserialize, Serialize};

/// One frame's expression label from the perception model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    #[serde(rename = "emotion")]
    pub label: String,
    pub confidence: f64,
}

impl EmotionReading {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}
