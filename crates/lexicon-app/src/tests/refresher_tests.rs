use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lexicon_api::{ApiError, ApiResult, CategoryPage, ItemPage, LexiconApi};
use lexicon_config::Config;
use lexicon_core::Lexicon;
use lexicon_core::quiz::Quiz;
use lexicon_core::session::SessionStore;
use lexicon_types::{
    AllSuggestions, AppEvent, ApprovalOutcome, Credentials, ExistingWordSuggestion,
    ExistingWordSuggestionDraft, LikeOutcome, LoginGrant, NewVocabularyItem, NewWordSuggestion,
    NewWordSuggestionDraft, Profile, Registration, Role, SessionNotice, SuggestionKind,
    VocabularyItem,
};
use tokio_util::sync::CancellationToken;

use crate::io::session_refresher;
use crate::state::AppState;

/// Backend that signs users in but refuses every token refresh
#[derive(Default)]
struct ExpiringApi {
    refreshes: AtomicUsize,
}

fn unavailable<T>() -> ApiResult<T> {
    Err(ApiError::Backend {
        status: 503,
        message: "Service unavailable".to_string(),
    })
}

#[async_trait::async_trait]
impl LexiconApi for ExpiringApi {
    async fn fetch_all_items(&self) -> ApiResult<Vec<VocabularyItem>> {
        unavailable()
    }

    async fn fetch_category(&self, _category: &str) -> ApiResult<CategoryPage> {
        unavailable()
    }

    async fn fetch_item(&self, _id: &str) -> ApiResult<ItemPage> {
        unavailable()
    }

    async fn fetch_category_labels(&self) -> ApiResult<Vec<String>> {
        unavailable()
    }

    async fn search_items(
        &self,
        _query: &str,
        _language: Option<&str>,
    ) -> ApiResult<Vec<VocabularyItem>> {
        unavailable()
    }

    async fn create_item(
        &self,
        _bearer: &str,
        _item: &NewVocabularyItem,
    ) -> ApiResult<VocabularyItem> {
        unavailable()
    }

    async fn fetch_saved_items(&self, _bearer: &str) -> ApiResult<Vec<VocabularyItem>> {
        unavailable()
    }

    async fn save_items_for_user(&self, _bearer: &str, _ids: &[String]) -> ApiResult<()> {
        unavailable()
    }

    async fn remove_saved_items(&self, _bearer: &str, _ids: &[String]) -> ApiResult<()> {
        unavailable()
    }

    async fn register(&self, _registration: &Registration) -> ApiResult<()> {
        unavailable()
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginGrant> {
        Ok(LoginGrant {
            access: "access-1".to_string(),
            refresh: "refresh-1".to_string(),
            profile: Profile {
                username: credentials.username.clone(),
                email: format!("{}@clinic.pl", credentials.username),
                role: Role::Interpreter,
            },
            saved_ids: vec!["1".to_string()],
        })
    }

    async fn refresh_token(&self, _refresh: &str) -> ApiResult<String> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::Unauthorized(
            "Refresh token expired or invalid.".to_string(),
        ))
    }

    async fn fetch_suggestions_for_item(
        &self,
        _id: &str,
    ) -> ApiResult<Vec<ExistingWordSuggestion>> {
        unavailable()
    }

    async fn fetch_all_suggestions(&self) -> ApiResult<AllSuggestions> {
        unavailable()
    }

    async fn submit_existing_suggestion(
        &self,
        _bearer: &str,
        _draft: &ExistingWordSuggestionDraft,
    ) -> ApiResult<ExistingWordSuggestion> {
        unavailable()
    }

    async fn submit_new_word(
        &self,
        _bearer: &str,
        _draft: &NewWordSuggestionDraft,
    ) -> ApiResult<NewWordSuggestion> {
        unavailable()
    }

    async fn like_suggestion(
        &self,
        _bearer: &str,
        _kind: SuggestionKind,
        _id: &str,
    ) -> ApiResult<LikeOutcome> {
        unavailable()
    }

    async fn approve_suggestion(
        &self,
        _bearer: &str,
        _kind: SuggestionKind,
        _id: &str,
    ) -> ApiResult<ApprovalOutcome> {
        unavailable()
    }

    async fn reject_suggestion(
        &self,
        _bearer: &str,
        _kind: SuggestionKind,
        _id: &str,
    ) -> ApiResult<()> {
        unavailable()
    }
}

#[tokio::test]
async fn expired_refresh_signs_out_and_drops_the_quiz() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(ExpiringApi::default());
    let config = Config::default();
    let store = SessionStore::new(dir.path().join("session.json"));
    let lexicon = Lexicon::new(api.clone(), store, &config);
    let state = Arc::new(AppState::new(config, lexicon));

    state
        .lexicon
        .login(&Credentials {
            username: "ola".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    assert!(state.lexicon.vocabulary().read().await.is_saved("1"));
    *state.quiz.lock().await = Some(Quiz::new(&[], &HashMap::new(), "pl", 3));

    let (event_tx, event_rx) = kanal::bounded_async(4);
    let cancel = CancellationToken::new();
    let refresher = tokio::spawn(session_refresher(
        state.clone(),
        Duration::from_millis(10),
        cancel.clone(),
        event_tx,
    ));

    let event = tokio::time::timeout(Duration::from_secs(5), event_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        event,
        AppEvent::Session(SessionNotice::Expired { ref reason }) if reason.contains("expired")
    ));

    assert!(!state.lexicon.session().is_logged_in().await);
    assert!(state.lexicon.session().store().load().unwrap().is_none());
    assert!(state.lexicon.vocabulary().read().await.saved_ids().is_empty());
    assert!(state.quiz.lock().await.is_none());

    cancel.cancel();
    refresher.await.unwrap().unwrap();
    assert_eq!(api.refreshes.load(Ordering::SeqCst), 1);
}
