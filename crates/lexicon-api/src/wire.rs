use std::collections::BTreeMap;

use lexicon_types::{LoginGrant, Profile, Registration, Role, VocabularyItem};
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// `GET /vocabulary-items/category/{category}/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPage {
    #[serde(default)]
    pub items: Vec<VocabularyItem>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// `GET /vocabulary-items/{id}/`: the item plus its category siblings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPage {
    pub item: VocabularyItem,
    #[serde(rename = "categoryItems", default)]
    pub category_items: Vec<VocabularyItem>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryLabels {
    pub categories: Vec<String>,
}

/// The all-items endpoint answers with either a list or an id-keyed map
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VocabularyListing {
    List(Vec<VocabularyItem>),
    Map(BTreeMap<String, VocabularyItem>),
}

impl VocabularyListing {
    pub fn into_items(self) -> Vec<VocabularyItem> {
        match self {
            VocabularyListing::List(items) => items,
            VocabularyListing::Map(items) => items.into_values().collect(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub user: &'a Registration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access: Option<String>,
    pub refresh: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub user_type: Option<String>,
    #[serde(rename = "savedVocabulary", default)]
    pub saved_vocabulary: Vec<serde_json::Value>,
}

impl LoginResponse {
    pub fn into_grant(self) -> Result<LoginGrant, ApiError> {
        let (Some(access), Some(refresh)) = (self.access, self.refresh) else {
            return Err(ApiError::Decode("Missing access or refresh token".to_string()));
        };

        let saved_ids = self
            .saved_vocabulary
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::String(id) => Some(id),
                serde_json::Value::Number(id) => Some(id.to_string()),
                _ => None,
            })
            .collect();

        Ok(LoginGrant {
            access,
            refresh,
            profile: Profile {
                username: self.username,
                email: self.email,
                role: self
                    .user_type
                    .and_then(|role| role.parse::<Role>().ok())
                    .unwrap_or_default(),
            },
            saved_ids,
        })
    }
}

#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
}

#[derive(Serialize)]
pub(crate) struct SavedIdsRequest<'a> {
    pub vocabulary_ids: &'a [String],
}

#[derive(Serialize)]
pub(crate) struct RejectRequest {
    pub suggestion_type: &'static str,
}

/// Acknowledgement bodies such as `{"message": "..."}`; contents are logged only
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub message: String,
}
