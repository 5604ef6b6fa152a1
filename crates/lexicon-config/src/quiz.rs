use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "pl".to_string()
}

fn default_distractors() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Language whose primary translation is the expected answer
    #[serde(default = "default_language")]
    pub language: String,
    /// Wrong choices offered next to the correct one
    #[serde(default = "default_distractors")]
    pub distractors: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            distractors: default_distractors(),
        }
    }
}
