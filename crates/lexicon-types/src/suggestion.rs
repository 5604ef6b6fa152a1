use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::de_id;
use crate::vocabulary::VocabularyItem;

/// Moderation lifecycle: `Pending` moves to one of the two terminal states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    #[serde(alias = "approved")]
    Accepted,
    Rejected,
}

impl SuggestionStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, SuggestionStatus::Pending)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Accepted => "accepted",
            SuggestionStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Colloquial,
    Translation,
}

impl fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionType::Colloquial => f.write_str("colloquial"),
            SuggestionType::Translation => f.write_str("translation"),
        }
    }
}

/// Which of the two suggestion families an id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    ExistingWord,
    NewWord,
}

impl SuggestionKind {
    /// Value of `suggestion_type` expected by the reject endpoint
    pub fn wire_name(self) -> &'static str {
        match self {
            SuggestionKind::ExistingWord => "vocabulary",
            SuggestionKind::NewWord => "new_word",
        }
    }
}

/// Proposed colloquial term or translation for an existing item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingWordSuggestion {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(deserialize_with = "de_id")]
    pub vocabulary_item: String,
    pub suggestion_type: SuggestionType,
    pub suggestion: String,
    pub language: String,
    #[serde(default)]
    pub status: SuggestionStatus,
    #[serde(default)]
    pub like_count: u32,
}

/// Proposal for a word the lexicon does not contain yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWordSuggestion {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub term: String,
    pub definition: String,
    pub translation: String,
    pub language: String,
    pub category: String,
    #[serde(default)]
    pub status: SuggestionStatus,
    #[serde(default)]
    pub like_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllSuggestions {
    #[serde(default)]
    pub existing_word_suggestions: Vec<ExistingWordSuggestion>,
    #[serde(default)]
    pub new_word_suggestions: Vec<NewWordSuggestion>,
}

/// Body of `POST /save-suggestion-for-specific-word/`; the backend resolves
/// the target item by term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingWordSuggestionDraft {
    pub term: String,
    #[serde(rename = "suggestionType")]
    pub suggestion_type: SuggestionType,
    pub suggestion: String,
    pub language: String,
}

/// Body of `POST /suggest-new-word/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWordSuggestionDraft {
    pub term: String,
    pub definition: String,
    pub translation: String,
    pub category: String,
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    #[serde(default)]
    pub liked: bool,
    pub like_count: u32,
}

/// Answer of the approve endpoints: the vocabulary item that now carries
/// the accepted proposal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub vocabulary_item: Option<VocabularyItem>,
}
