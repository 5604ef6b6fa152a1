mod client;
mod error;
mod wire;

pub use client::HttpLexiconClient;
pub use error::ApiError;
pub use wire::{CategoryPage, ItemPage};

use lexicon_types::{
    AllSuggestions, ApprovalOutcome, Credentials, ExistingWordSuggestion,
    ExistingWordSuggestionDraft, LikeOutcome, LoginGrant, NewVocabularyItem, NewWordSuggestion,
    NewWordSuggestionDraft, Registration, SuggestionKind, VocabularyItem,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Lexicon backend interface.
///
/// Methods taking `bearer` hit endpoints that require a signed-in user;
/// the caller supplies the current access token.
#[async_trait::async_trait]
pub trait LexiconApi: Send + Sync {
    /// `GET /vocabulary-items/`
    async fn fetch_all_items(&self) -> ApiResult<Vec<VocabularyItem>>;

    /// `GET /vocabulary-items/category/{category}/`
    async fn fetch_category(&self, category: &str) -> ApiResult<CategoryPage>;

    /// `GET /vocabulary-items/{id}/`
    async fn fetch_item(&self, id: &str) -> ApiResult<ItemPage>;

    /// `GET /vocabulary-items/category/all-category-labels`
    async fn fetch_category_labels(&self) -> ApiResult<Vec<String>>;

    /// `GET /search-vocabulary/?q=&lang=`
    async fn search_items(&self, query: &str, language: Option<&str>)
    -> ApiResult<Vec<VocabularyItem>>;

    /// `POST /save-vocabulary-item/`
    async fn create_item(&self, bearer: &str, item: &NewVocabularyItem)
    -> ApiResult<VocabularyItem>;

    /// `GET /saved-vocabulary-user/`
    async fn fetch_saved_items(&self, bearer: &str) -> ApiResult<Vec<VocabularyItem>>;

    /// `POST /save-vocabulary-items-user/`
    async fn save_items_for_user(&self, bearer: &str, ids: &[String]) -> ApiResult<()>;

    /// `POST /remove-saved-vocabulary-user/`
    async fn remove_saved_items(&self, bearer: &str, ids: &[String]) -> ApiResult<()>;

    /// `POST /register/`
    async fn register(&self, registration: &Registration) -> ApiResult<()>;

    /// `POST /login/`
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginGrant>;

    /// `POST /token/refresh/`, returning a new access token
    async fn refresh_token(&self, refresh: &str) -> ApiResult<String>;

    /// `GET /get-suggestions-for-specific-word/{id}/`
    async fn fetch_suggestions_for_item(&self, id: &str)
    -> ApiResult<Vec<ExistingWordSuggestion>>;

    /// `GET /get-suggestions-for-all-words/`
    async fn fetch_all_suggestions(&self) -> ApiResult<AllSuggestions>;

    /// `POST /save-suggestion-for-specific-word/`
    async fn submit_existing_suggestion(
        &self,
        bearer: &str,
        draft: &ExistingWordSuggestionDraft,
    ) -> ApiResult<ExistingWordSuggestion>;

    /// `POST /suggest-new-word/`
    async fn submit_new_word(
        &self,
        bearer: &str,
        draft: &NewWordSuggestionDraft,
    ) -> ApiResult<NewWordSuggestion>;

    /// `POST /like-vocabulary-suggestion/{id}/` or `/like-new-word-suggestion/{id}/`
    async fn like_suggestion(
        &self,
        bearer: &str,
        kind: SuggestionKind,
        id: &str,
    ) -> ApiResult<LikeOutcome>;

    /// `POST /approve-vocabulary-suggestion/{id}/` or `/approve-new-word-suggestion/{id}/`
    async fn approve_suggestion(
        &self,
        bearer: &str,
        kind: SuggestionKind,
        id: &str,
    ) -> ApiResult<ApprovalOutcome>;

    /// `POST /reject-suggestion/{id}/`
    async fn reject_suggestion(&self, bearer: &str, kind: SuggestionKind, id: &str)
    -> ApiResult<()>;
}
