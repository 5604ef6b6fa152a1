use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::de_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub language: String,
    pub translation: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_colloquial: bool,
    #[serde(default)]
    pub is_user_proposed: bool,
}

/// One lexicon entry as served by the backend.
///
/// The per-language maps are derived server-side from `translations`;
/// the client mirrors them and never recomputes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub primary_translations: BTreeMap<String, String>,
    #[serde(default)]
    pub colloquial_terms: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub user_proposed_translations: BTreeMap<String, Vec<String>>,
}

impl VocabularyItem {
    /// Primary translation for one language
    pub fn primary_translation(&self, language: &str) -> Option<&str> {
        self.primary_translations.get(language).map(String::as_str)
    }

    /// Primary translation in `preferred`, else the first one by language code
    pub fn answer_for(&self, preferred: &str) -> Option<&str> {
        self.primary_translation(preferred).or_else(|| {
            self.primary_translations
                .values()
                .next()
                .map(String::as_str)
        })
    }

    /// Category label, with empty categories reported as uncategorized
    pub fn category_label(&self) -> &str {
        if self.category.is_empty() {
            crate::UNCATEGORIZED
        } else {
            &self.category
        }
    }
}

/// Payload for creating a word through `POST /save-vocabulary-item/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewVocabularyItem {
    pub term: String,
    pub definition: String,
    pub category: String,
    /// language -> primary translation
    pub translations: BTreeMap<String, String>,
}

/// Items of one category, as grouped for list and graph views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<VocabularyItem>,
}

impl CategoryGroup {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
