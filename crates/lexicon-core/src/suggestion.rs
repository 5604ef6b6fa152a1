use std::collections::BTreeMap;
use std::sync::Arc;

use lexicon_api::LexiconApi;
use lexicon_types::{
    AllSuggestions, ExistingWordSuggestion, ExistingWordSuggestionDraft, FormError,
    NewWordSuggestion, NewWordSuggestionDraft, SuggestionKind, SuggestionStatus, VocabularyItem,
};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::error::{CoreError, CoreResult};
use crate::session::SessionManager;
use crate::status::LoadStatus;
use crate::validation;

#[derive(Debug, Clone, Default)]
pub struct SuggestionCache {
    existing: Vec<ExistingWordSuggestion>,
    new_words: Vec<NewWordSuggestion>,
    existing_status: LoadStatus,
    new_word_status: LoadStatus,
    existing_error: Option<FormError>,
    new_word_error: Option<FormError>,
}

impl SuggestionCache {
    pub fn existing(&self) -> &[ExistingWordSuggestion] {
        &self.existing
    }

    pub fn new_words(&self) -> &[NewWordSuggestion] {
        &self.new_words
    }

    pub fn existing_status(&self) -> LoadStatus {
        self.existing_status
    }

    pub fn new_word_status(&self) -> LoadStatus {
        self.new_word_status
    }

    pub fn existing_error(&self) -> Option<&FormError> {
        self.existing_error.as_ref()
    }

    pub fn new_word_error(&self) -> Option<&FormError> {
        self.new_word_error.as_ref()
    }

    /// Existing-word suggestions keyed by the item they target
    pub fn existing_grouped_by_item(&self) -> BTreeMap<&str, Vec<&ExistingWordSuggestion>> {
        let mut groups: BTreeMap<&str, Vec<&ExistingWordSuggestion>> = BTreeMap::new();
        for suggestion in &self.existing {
            groups
                .entry(suggestion.vocabulary_item.as_str())
                .or_default()
                .push(suggestion);
        }
        groups
    }

    pub fn status_of(&self, kind: SuggestionKind, id: &str) -> Option<SuggestionStatus> {
        match kind {
            SuggestionKind::ExistingWord => {
                self.existing.iter().find(|s| s.id == id).map(|s| s.status)
            }
            SuggestionKind::NewWord => self.new_words.iter().find(|s| s.id == id).map(|s| s.status),
        }
    }

    pub fn like_count(&self, kind: SuggestionKind, id: &str) -> Option<u32> {
        match kind {
            SuggestionKind::ExistingWord => self
                .existing
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.like_count),
            SuggestionKind::NewWord => self
                .new_words
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.like_count),
        }
    }

    pub fn clear(&mut self) {
        *self = SuggestionCache::default();
    }

    pub fn clear_errors(&mut self) {
        self.existing_error = None;
        self.new_word_error = None;
    }

    /// Like, approve and reject only apply to pending suggestions
    fn ensure_pending(&self, kind: SuggestionKind, id: &str) -> CoreResult<()> {
        match self.status_of(kind, id) {
            None => Err(CoreError::UnknownSuggestion(id.to_string())),
            Some(status) if !status.is_pending() => Err(CoreError::SuggestionClosed {
                id: id.to_string(),
                status: status.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn apply_all(&mut self, all: AllSuggestions) {
        self.existing = all.existing_word_suggestions;
        self.new_words = all.new_word_suggestions;
        self.existing_status = LoadStatus::Succeeded;
        self.new_word_status = LoadStatus::Succeeded;
    }

    /// Swap in the fresh list for one item, keeping the order of the rest
    fn merge_item(&mut self, item_id: &str, list: &[ExistingWordSuggestion]) {
        self.existing
            .retain(|s| s.vocabulary_item != item_id || list.iter().any(|fresh| fresh.id == s.id));
        for fresh in list {
            match self.existing.iter_mut().find(|s| s.id == fresh.id) {
                Some(cached) => *cached = fresh.clone(),
                None => self.existing.push(fresh.clone()),
            }
        }
    }

    fn set_like_count(&mut self, kind: SuggestionKind, id: &str, count: u32) {
        match kind {
            SuggestionKind::ExistingWord => {
                if let Some(s) = self.existing.iter_mut().find(|s| s.id == id) {
                    s.like_count = count;
                }
            }
            SuggestionKind::NewWord => {
                if let Some(s) = self.new_words.iter_mut().find(|s| s.id == id) {
                    s.like_count = count;
                }
            }
        }
    }

    fn set_status(&mut self, kind: SuggestionKind, id: &str, status: SuggestionStatus) {
        match kind {
            SuggestionKind::ExistingWord => {
                if let Some(s) = self.existing.iter_mut().find(|s| s.id == id) {
                    s.status = status;
                }
            }
            SuggestionKind::NewWord => {
                if let Some(s) = self.new_words.iter_mut().find(|s| s.id == id) {
                    s.status = status;
                }
            }
        }
    }

    fn record_error(&mut self, kind: SuggestionKind, err: &CoreError) {
        let form = err.to_form_error();
        match kind {
            SuggestionKind::ExistingWord => {
                self.existing_status = LoadStatus::Failed;
                self.existing_error = Some(form);
            }
            SuggestionKind::NewWord => {
                self.new_word_status = LoadStatus::Failed;
                self.new_word_error = Some(form);
            }
        }
    }
}

pub struct SuggestionStore {
    api: Arc<dyn LexiconApi>,
    session: Arc<SessionManager>,
    cache: RwLock<SuggestionCache>,
}

impl SuggestionStore {
    pub fn new(api: Arc<dyn LexiconApi>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            cache: RwLock::new(SuggestionCache::default()),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SuggestionCache> {
        self.cache.read().await
    }

    pub async fn fetch_all(&self) -> CoreResult<()> {
        {
            let mut cache = self.cache.write().await;
            cache.existing_status = LoadStatus::Loading;
            cache.new_word_status = LoadStatus::Loading;
        }

        match self.api.fetch_all_suggestions().await {
            Ok(all) => {
                tracing::info!(
                    "Loaded {} word and {} new-word suggestions",
                    all.existing_word_suggestions.len(),
                    all.new_word_suggestions.len()
                );
                self.cache.write().await.apply_all(all);
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                tracing::warn!("Fetching suggestions failed: {err}");
                let mut cache = self.cache.write().await;
                cache.record_error(SuggestionKind::ExistingWord, &err);
                cache.record_error(SuggestionKind::NewWord, &err);
                Err(err)
            }
        }
    }

    /// Refresh the suggestions of one item; those of other items stay cached
    pub async fn fetch_for_item(&self, item_id: &str) -> CoreResult<Vec<ExistingWordSuggestion>> {
        self.cache.write().await.existing_status = LoadStatus::Loading;

        match self.api.fetch_suggestions_for_item(item_id).await {
            Ok(list) => {
                let mut cache = self.cache.write().await;
                cache.merge_item(item_id, &list);
                cache.existing_status = LoadStatus::Succeeded;
                Ok(list)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.cache
                    .write()
                    .await
                    .record_error(SuggestionKind::ExistingWord, &err);
                Err(err)
            }
        }
    }

    pub async fn submit_existing(
        &self,
        draft: &ExistingWordSuggestionDraft,
    ) -> CoreResult<ExistingWordSuggestion> {
        let errors = validation::validate_suggestion(draft);
        if !errors.is_empty() {
            return Err(self
                .record(SuggestionKind::ExistingWord, CoreError::Invalid(errors))
                .await);
        }

        let bearer = self.session.bearer().await?;
        self.cache.write().await.existing_status = LoadStatus::Loading;

        match self.api.submit_existing_suggestion(&bearer, draft).await {
            Ok(created) => {
                tracing::info!("Suggested {:?} for {}", created.suggestion, draft.term);
                let mut cache = self.cache.write().await;
                cache.existing.push(created.clone());
                cache.existing_status = LoadStatus::Succeeded;
                cache.existing_error = None;
                Ok(created)
            }
            Err(e) => Err(self.record(SuggestionKind::ExistingWord, e.into()).await),
        }
    }

    pub async fn submit_new(&self, draft: &NewWordSuggestionDraft) -> CoreResult<NewWordSuggestion> {
        let errors = validation::validate_new_word(draft);
        if !errors.is_empty() {
            return Err(self
                .record(SuggestionKind::NewWord, CoreError::Invalid(errors))
                .await);
        }

        let bearer = self.session.bearer().await?;
        self.cache.write().await.new_word_status = LoadStatus::Loading;

        match self.api.submit_new_word(&bearer, draft).await {
            Ok(created) => {
                tracing::info!("Suggested new word {}", created.term);
                let mut cache = self.cache.write().await;
                cache.new_words.push(created.clone());
                cache.new_word_status = LoadStatus::Succeeded;
                cache.new_word_error = None;
                Ok(created)
            }
            Err(e) => Err(self.record(SuggestionKind::NewWord, e.into()).await),
        }
    }

    /// Like a pending suggestion; the count shown is the server's
    pub async fn like(&self, kind: SuggestionKind, id: &str) -> CoreResult<u32> {
        let bearer = self.session.bearer().await?;
        self.ensure_pending(kind, id).await?;

        let outcome = self.api.like_suggestion(&bearer, kind, id).await.map_err(|e| {
            tracing::warn!("Like on suggestion {id} failed: {e}");
            CoreError::from(e)
        })?;

        self.cache
            .write()
            .await
            .set_like_count(kind, id, outcome.like_count);
        Ok(outcome.like_count)
    }

    /// Accept a pending suggestion, returning the vocabulary item that now
    /// carries it
    pub async fn approve(
        &self,
        kind: SuggestionKind,
        id: &str,
    ) -> CoreResult<Option<VocabularyItem>> {
        let moderator = self.session.require_moderator().await?;
        self.ensure_pending(kind, id).await?;
        let bearer = self.session.bearer().await?;

        match self.api.approve_suggestion(&bearer, kind, id).await {
            Ok(outcome) => {
                tracing::info!("{} approved suggestion {id}", moderator.username);
                self.cache
                    .write()
                    .await
                    .set_status(kind, id, SuggestionStatus::Accepted);
                Ok(outcome.vocabulary_item)
            }
            Err(e) => Err(self.record(kind, e.into()).await),
        }
    }

    pub async fn reject(&self, kind: SuggestionKind, id: &str) -> CoreResult<()> {
        let moderator = self.session.require_moderator().await?;
        self.ensure_pending(kind, id).await?;
        let bearer = self.session.bearer().await?;

        match self.api.reject_suggestion(&bearer, kind, id).await {
            Ok(()) => {
                tracing::info!("{} rejected suggestion {id}", moderator.username);
                self.cache
                    .write()
                    .await
                    .set_status(kind, id, SuggestionStatus::Rejected);
                Ok(())
            }
            Err(e) => Err(self.record(kind, e.into()).await),
        }
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn clear_errors(&self) {
        self.cache.write().await.clear_errors();
    }

    /// Pending check against the cache, reloading the lists once when the id
    /// has not been seen yet
    async fn ensure_pending(&self, kind: SuggestionKind, id: &str) -> CoreResult<()> {
        if self.cache.read().await.status_of(kind, id).is_none() {
            tracing::debug!("Suggestion {id} not cached, reloading suggestions");
            self.fetch_all().await?;
        }
        self.cache.read().await.ensure_pending(kind, id)
    }

    async fn record(&self, kind: SuggestionKind, err: CoreError) -> CoreError {
        tracing::warn!("Suggestion request failed: {err}");
        self.cache.write().await.record_error(kind, &err);
        err
    }
}
