use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexicon_api::{ApiError, ApiResult, CategoryPage, ItemPage, LexiconApi};
use lexicon_config::Config;
use lexicon_types::{
    AllSuggestions, ApprovalOutcome, Credentials, ExistingWordSuggestion,
    ExistingWordSuggestionDraft, FieldErrors, LikeOutcome, LoginGrant, NewVocabularyItem,
    NewWordSuggestion, NewWordSuggestionDraft, Profile, Registration, Role, SuggestionKind,
    SuggestionStatus, SuggestionType, VocabularyItem,
};
use tempfile::TempDir;

use crate::Lexicon;
use crate::session::SessionStore;

pub fn item(id: &str, term: &str, category: &str, pl: &str) -> VocabularyItem {
    VocabularyItem {
        id: id.to_string(),
        term: term.to_string(),
        definition: format!("definition of {term}"),
        category: category.to_string(),
        translations: vec![],
        primary_translations: [("pl".to_string(), pl.to_string())].into(),
        colloquial_terms: Default::default(),
        user_proposed_translations: Default::default(),
    }
}

pub fn existing_suggestion(id: &str, item_id: &str, status: SuggestionStatus) -> ExistingWordSuggestion {
    ExistingWordSuggestion {
        id: id.to_string(),
        vocabulary_item: item_id.to_string(),
        suggestion_type: SuggestionType::Colloquial,
        suggestion: format!("slang-{id}"),
        language: "pl".to_string(),
        status,
        like_count: 0,
    }
}

pub fn new_word_suggestion(id: &str, status: SuggestionStatus) -> NewWordSuggestion {
    NewWordSuggestion {
        id: id.to_string(),
        term: format!("word-{id}"),
        definition: "a proposed word".to_string(),
        translation: format!("słowo-{id}"),
        language: "pl".to_string(),
        category: "cardiology".to_string(),
        status,
        like_count: 0,
    }
}

struct Account {
    password: String,
    profile: Profile,
}

/// In-memory backend that records how often each endpoint was hit
#[derive(Default)]
pub struct FakeApi {
    pub items: Mutex<Vec<VocabularyItem>>,
    pub saved: Mutex<Vec<String>>,
    pub suggestions: Mutex<AllSuggestions>,
    /// Server-side like totals, keyed by suggestion id
    pub likes: Mutex<HashMap<String, u32>>,
    pub fail_saved_reads: AtomicBool,
    pub fail_saved_writes: AtomicBool,
    pub fail_refresh: AtomicBool,
    accounts: Mutex<HashMap<String, Account>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeApi {
    pub fn with_items(items: Vec<VocabularyItem>) -> Self {
        let api = FakeApi::default();
        *api.items.lock().unwrap() = items;
        api
    }

    pub fn add_account(&self, username: &str, password: &str, role: Role) {
        self.accounts.lock().unwrap().insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                profile: Profile {
                    username: username.to_string(),
                    email: format!("{username}@clinic.pl"),
                    role,
                },
            },
        );
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(endpoint)
            .copied()
            .unwrap_or_default()
    }

    fn hit(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
    }

    fn check_bearer(bearer: &str) -> ApiResult<()> {
        if bearer.starts_with("access-") {
            Ok(())
        } else {
            Err(ApiError::Unauthorized("Invalid token".to_string()))
        }
    }

    fn find(&self, id: &str) -> Option<VocabularyItem> {
        self.items.lock().unwrap().iter().find(|i| i.id == id).cloned()
    }
}

#[async_trait]
impl LexiconApi for FakeApi {
    async fn fetch_all_items(&self) -> ApiResult<Vec<VocabularyItem>> {
        self.hit("fetch_all_items");
        Ok(self.items.lock().unwrap().clone())
    }

    async fn fetch_category(&self, category: &str) -> ApiResult<CategoryPage> {
        self.hit("fetch_category");
        let items = self.items.lock().unwrap();
        let mut categories: Vec<String> = Vec::new();
        for item in items.iter() {
            if !categories.contains(&item.category) {
                categories.push(item.category.clone());
            }
        }
        Ok(CategoryPage {
            items: items.iter().filter(|i| i.category == category).cloned().collect(),
            categories,
        })
    }

    async fn fetch_item(&self, id: &str) -> ApiResult<ItemPage> {
        self.hit("fetch_item");
        let item = self
            .find(id)
            .ok_or_else(|| ApiError::NotFound("Vocabulary item not found".to_string()))?;
        let category_items = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.category == item.category)
            .cloned()
            .collect();
        Ok(ItemPage {
            categories: vec![item.category.clone()],
            item,
            category_items,
        })
    }

    async fn fetch_category_labels(&self) -> ApiResult<Vec<String>> {
        self.hit("fetch_category_labels");
        let mut labels: Vec<String> = Vec::new();
        for item in self.items.lock().unwrap().iter() {
            if !labels.contains(&item.category) {
                labels.push(item.category.clone());
            }
        }
        Ok(labels)
    }

    async fn search_items(&self, query: &str, _language: Option<&str>) -> ApiResult<Vec<VocabularyItem>> {
        self.hit("search_items");
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.term.contains(query))
            .cloned()
            .collect())
    }

    async fn create_item(&self, bearer: &str, item: &NewVocabularyItem) -> ApiResult<VocabularyItem> {
        self.hit("create_item");
        Self::check_bearer(bearer)?;

        let mut items = self.items.lock().unwrap();
        if items.iter().any(|i| i.term == item.term) {
            let mut fields = FieldErrors::new();
            fields.push("term", "vocabulary item with this term already exists.");
            return Err(ApiError::Validation {
                message: "Validation failed".to_string(),
                fields,
            });
        }

        let created = VocabularyItem {
            id: (items.len() + 100).to_string(),
            term: item.term.clone(),
            definition: item.definition.clone(),
            category: item.category.clone(),
            translations: vec![],
            primary_translations: item.translations.clone(),
            colloquial_terms: Default::default(),
            user_proposed_translations: Default::default(),
        };
        items.push(created.clone());
        Ok(created)
    }

    async fn fetch_saved_items(&self, bearer: &str) -> ApiResult<Vec<VocabularyItem>> {
        self.hit("fetch_saved_items");
        Self::check_bearer(bearer)?;
        if self.fail_saved_reads.load(Ordering::SeqCst) {
            return Err(ApiError::Backend {
                status: 500,
                message: "Database unavailable".to_string(),
            });
        }
        let saved = self.saved.lock().unwrap().clone();
        Ok(saved.iter().filter_map(|id| self.find(id)).collect())
    }

    async fn save_items_for_user(&self, bearer: &str, ids: &[String]) -> ApiResult<()> {
        self.hit("save_items_for_user");
        Self::check_bearer(bearer)?;
        if self.fail_saved_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Backend {
                status: 500,
                message: "Database unavailable".to_string(),
            });
        }
        let mut saved = self.saved.lock().unwrap();
        for id in ids {
            if !saved.contains(id) {
                saved.push(id.clone());
            }
        }
        Ok(())
    }

    async fn remove_saved_items(&self, bearer: &str, ids: &[String]) -> ApiResult<()> {
        self.hit("remove_saved_items");
        Self::check_bearer(bearer)?;
        if self.fail_saved_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Backend {
                status: 500,
                message: "Database unavailable".to_string(),
            });
        }
        self.saved.lock().unwrap().retain(|id| !ids.contains(id));
        Ok(())
    }

    async fn register(&self, registration: &Registration) -> ApiResult<()> {
        self.hit("register");
        if self.accounts.lock().unwrap().contains_key(&registration.username) {
            let mut fields = FieldErrors::new();
            fields.push("non_field_errors", "A user with that username already exists.");
            return Err(ApiError::Validation {
                message: "A user with that username already exists.".to_string(),
                fields,
            });
        }
        self.add_account(&registration.username, &registration.password, registration.role);
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginGrant> {
        self.hit("login");
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&credentials.username) {
            Some(account) if account.password == credentials.password => Ok(LoginGrant {
                access: format!("access-{}", credentials.username),
                refresh: format!("refresh-{}", credentials.username),
                profile: account.profile.clone(),
                saved_ids: self.saved.lock().unwrap().clone(),
            }),
            _ => Err(ApiError::Unauthorized(
                "Unauthorized, check username and password".to_string(),
            )),
        }
    }

    async fn refresh_token(&self, refresh: &str) -> ApiResult<String> {
        self.hit("refresh_token");
        if self.fail_refresh.load(Ordering::SeqCst) || !refresh.starts_with("refresh-") {
            return Err(ApiError::Unauthorized(
                "Refresh token expired or invalid.".to_string(),
            ));
        }
        Ok(format!("access-{}", refresh.trim_start_matches("refresh-")))
    }

    async fn fetch_suggestions_for_item(&self, id: &str) -> ApiResult<Vec<ExistingWordSuggestion>> {
        self.hit("fetch_suggestions_for_item");
        Ok(self
            .suggestions
            .lock()
            .unwrap()
            .existing_word_suggestions
            .iter()
            .filter(|s| s.vocabulary_item == id)
            .cloned()
            .collect())
    }

    async fn fetch_all_suggestions(&self) -> ApiResult<AllSuggestions> {
        self.hit("fetch_all_suggestions");
        Ok(self.suggestions.lock().unwrap().clone())
    }

    async fn submit_existing_suggestion(
        &self,
        bearer: &str,
        draft: &ExistingWordSuggestionDraft,
    ) -> ApiResult<ExistingWordSuggestion> {
        self.hit("submit_existing_suggestion");
        Self::check_bearer(bearer)?;
        let target = self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.term == draft.term)
            .map(|i| i.id.clone())
            .ok_or_else(|| ApiError::NotFound("Vocabulary item not found".to_string()))?;

        let mut suggestions = self.suggestions.lock().unwrap();
        let created = ExistingWordSuggestion {
            id: format!("s{}", suggestions.existing_word_suggestions.len() + 1),
            vocabulary_item: target,
            suggestion_type: draft.suggestion_type,
            suggestion: draft.suggestion.clone(),
            language: draft.language.clone(),
            status: SuggestionStatus::Pending,
            like_count: 0,
        };
        suggestions.existing_word_suggestions.push(created.clone());
        Ok(created)
    }

    async fn submit_new_word(
        &self,
        bearer: &str,
        draft: &NewWordSuggestionDraft,
    ) -> ApiResult<NewWordSuggestion> {
        self.hit("submit_new_word");
        Self::check_bearer(bearer)?;
        let mut suggestions = self.suggestions.lock().unwrap();
        let created = NewWordSuggestion {
            id: format!("n{}", suggestions.new_word_suggestions.len() + 1),
            term: draft.term.clone(),
            definition: draft.definition.clone(),
            translation: draft.translation.clone(),
            language: draft.language.clone(),
            category: draft.category.clone(),
            status: SuggestionStatus::Pending,
            like_count: 0,
        };
        suggestions.new_word_suggestions.push(created.clone());
        Ok(created)
    }

    async fn like_suggestion(
        &self,
        bearer: &str,
        _kind: SuggestionKind,
        id: &str,
    ) -> ApiResult<LikeOutcome> {
        self.hit("like_suggestion");
        Self::check_bearer(bearer)?;
        let mut likes = self.likes.lock().unwrap();
        let count = likes.entry(id.to_string()).or_default();
        *count += 1;
        Ok(LikeOutcome {
            liked: true,
            like_count: *count,
        })
    }

    async fn approve_suggestion(
        &self,
        bearer: &str,
        kind: SuggestionKind,
        id: &str,
    ) -> ApiResult<ApprovalOutcome> {
        self.hit("approve_suggestion");
        Self::check_bearer(bearer)?;
        let mut suggestions = self.suggestions.lock().unwrap();

        let vocabulary_item = match kind {
            SuggestionKind::ExistingWord => {
                let suggestion = suggestions
                    .existing_word_suggestions
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| ApiError::NotFound("Suggestion not found".to_string()))?;
                suggestion.status = SuggestionStatus::Accepted;

                let mut items = self.items.lock().unwrap();
                let item = items
                    .iter_mut()
                    .find(|i| i.id == suggestion.vocabulary_item)
                    .ok_or_else(|| ApiError::NotFound("Vocabulary item not found".to_string()))?;
                item.colloquial_terms
                    .entry(suggestion.language.clone())
                    .or_default()
                    .push(suggestion.suggestion.clone());
                item.clone()
            }
            SuggestionKind::NewWord => {
                let suggestion = suggestions
                    .new_word_suggestions
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| ApiError::NotFound("Suggestion not found".to_string()))?;
                suggestion.status = SuggestionStatus::Accepted;

                let created = VocabularyItem {
                    id: format!("from-{id}"),
                    term: suggestion.term.clone(),
                    definition: suggestion.definition.clone(),
                    category: suggestion.category.clone(),
                    translations: vec![],
                    primary_translations: [(
                        suggestion.language.clone(),
                        suggestion.translation.clone(),
                    )]
                    .into(),
                    colloquial_terms: Default::default(),
                    user_proposed_translations: Default::default(),
                };
                self.items.lock().unwrap().push(created.clone());
                created
            }
        };

        Ok(ApprovalOutcome {
            message: "Suggestion approved".to_string(),
            vocabulary_item: Some(vocabulary_item),
        })
    }

    async fn reject_suggestion(&self, bearer: &str, _kind: SuggestionKind, _id: &str) -> ApiResult<()> {
        self.hit("reject_suggestion");
        Self::check_bearer(bearer)
    }
}

/// Lexicon over `api` with its session file inside `dir`
pub fn lexicon(api: &Arc<FakeApi>, dir: &TempDir) -> Lexicon {
    let store = SessionStore::new(dir.path().join("session.json"));
    Lexicon::new(api.clone(), store, &Config::default())
}

/// Lexicon with a signed-in user of the given role
pub async fn signed_in(api: &Arc<FakeApi>, dir: &TempDir, role: Role) -> Lexicon {
    api.add_account("ola", "secret1", role);
    let lexicon = lexicon(api, dir);
    lexicon
        .login(&Credentials {
            username: "ola".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    lexicon
}
