use std::collections::HashMap;
use std::sync::Arc;

use lexicon_api::{CategoryPage, ItemPage, LexiconApi};
use lexicon_types::{CategoryGroup, NewVocabularyItem, VocabularyItem};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::error::{CoreError, CoreResult};
use crate::grouping::{self, group_by_category_descending, merge_labels};
use crate::normalize;
use crate::session::SessionManager;
use crate::status::LoadStatus;
use crate::validation;

/// Client-side copy of the lexicon and the user's saved words
#[derive(Debug, Clone, Default)]
pub struct VocabularyCache {
    items: HashMap<String, VocabularyItem>,
    /// Set once the whole lexicon has been loaded
    complete: bool,
    grouped: Vec<CategoryGroup>,
    category_labels: Vec<String>,
    current_category: Option<String>,
    current_item_id: Option<String>,
    saved_ids: Vec<String>,
    status: LoadStatus,
    saved_status: LoadStatus,
    error: Option<String>,
}

impl VocabularyCache {
    pub fn items(&self) -> &HashMap<String, VocabularyItem> {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&VocabularyItem> {
        self.items.get(id)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn grouped(&self) -> &[CategoryGroup] {
        &self.grouped
    }

    pub fn group(&self, category: &str) -> Option<&CategoryGroup> {
        self.grouped.iter().find(|g| g.category == category)
    }

    pub fn category_labels(&self) -> &[String] {
        &self.category_labels
    }

    pub fn current_category(&self) -> Option<&str> {
        self.current_category.as_deref()
    }

    pub fn current_item(&self) -> Option<&VocabularyItem> {
        self.current_item_id.as_deref().and_then(|id| self.items.get(id))
    }

    pub fn saved_ids(&self) -> &[String] {
        &self.saved_ids
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved_ids.iter().any(|saved| saved == id)
    }

    /// Saved words that are present in the cache, in saved order
    pub fn saved_items(&self) -> Vec<&VocabularyItem> {
        self.saved_ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn saved_status(&self) -> LoadStatus {
        self.saved_status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Items whose term or any translation contains `query`, sorted by term
    pub fn search_cached(&self, query: &str) -> Vec<&VocabularyItem> {
        let mut hits: Vec<&VocabularyItem> = self
            .items
            .values()
            .filter(|item| {
                normalize::contains_folded(&item.term, query)
                    || item
                        .translations
                        .iter()
                        .any(|t| normalize::contains_folded(&t.translation, query))
                    || item
                        .primary_translations
                        .values()
                        .any(|t| normalize::contains_folded(t, query))
            })
            .collect();
        hits.sort_by(|a, b| a.term.cmp(&b.term).then_with(|| a.id.cmp(&b.id)));
        hits
    }

    pub fn clear(&mut self) {
        *self = VocabularyCache::default();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn clear_category_data(&mut self) {
        self.grouped.clear();
        self.current_category = None;
    }

    pub fn set_current_item(&mut self, id: impl Into<String>) {
        self.current_item_id = Some(id.into());
    }

    pub fn reset_current_item(&mut self) {
        self.current_item_id = None;
    }

    fn begin(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    fn fail(&mut self, err: &CoreError) {
        self.status = LoadStatus::Failed;
        self.error = Some(err.to_string());
    }

    fn merge_items(&mut self, items: &[VocabularyItem]) {
        for item in items {
            self.items.insert(item.id.clone(), item.clone());
        }
    }

    fn apply_all(&mut self, items: Vec<VocabularyItem>) {
        self.grouped = group_by_category_descending(&items);
        let labels = grouping::distinct_categories(&items);
        merge_labels(&mut self.category_labels, &labels);
        self.merge_items(&items);
        self.complete = true;
        self.status = LoadStatus::Succeeded;
    }

    fn replace_group(&mut self, category: &str, items: Vec<VocabularyItem>) {
        match self.grouped.iter_mut().find(|g| g.category == category) {
            Some(group) => group.items = items,
            None => self.grouped.push(CategoryGroup {
                category: category.to_string(),
                items,
            }),
        }
    }

    fn apply_category(&mut self, category: &str, page: CategoryPage) {
        self.merge_items(&page.items);
        self.replace_group(category, page.items);
        merge_labels(&mut self.category_labels, &page.categories);
        self.current_category = Some(category.to_string());
        self.status = LoadStatus::Succeeded;
    }

    fn apply_item_page(&mut self, page: ItemPage) {
        let category = page.item.category_label().to_string();
        self.merge_items(&page.category_items);
        self.items.insert(page.item.id.clone(), page.item.clone());

        let mut siblings = page.category_items;
        if !siblings.iter().any(|s| s.id == page.item.id) {
            siblings.push(page.item.clone());
        }
        self.replace_group(&category, siblings);

        merge_labels(&mut self.category_labels, &page.categories);
        if !page.item.category.is_empty() {
            merge_labels(&mut self.category_labels, std::slice::from_ref(&page.item.category));
        }
        self.current_item_id = Some(page.item.id);
        self.status = LoadStatus::Succeeded;
    }

    fn apply_saved(&mut self, items: Vec<VocabularyItem>) {
        self.saved_ids.clear();
        for item in &items {
            if !self.saved_ids.contains(&item.id) {
                self.saved_ids.push(item.id.clone());
            }
        }
        self.merge_items(&items);
        self.saved_status = LoadStatus::Succeeded;
    }

    /// Insert or replace one item everywhere it is shown
    pub(crate) fn upsert_item(&mut self, item: VocabularyItem) {
        let category = item.category_label().to_string();

        for group in &mut self.grouped {
            if group.category != category {
                group.items.retain(|existing| existing.id != item.id);
            }
        }
        self.grouped.retain(|g| !g.is_empty());

        match self.grouped.iter_mut().find(|g| g.category == category) {
            Some(group) => match group.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => *existing = item.clone(),
                None => group.items.push(item.clone()),
            },
            None => self.grouped.push(CategoryGroup {
                category: category.clone(),
                items: vec![item.clone()],
            }),
        }

        if !item.category.is_empty() {
            merge_labels(&mut self.category_labels, std::slice::from_ref(&item.category));
        }
        self.items.insert(item.id.clone(), item);
    }

    /// Add ids to the saved set, returning the set as it was before
    fn add_saved(&mut self, ids: &[String]) -> Vec<String> {
        let snapshot = self.saved_ids.clone();
        for id in ids {
            if !self.saved_ids.contains(id) {
                self.saved_ids.push(id.clone());
            }
        }
        snapshot
    }

    /// Remove ids from the saved set, returning the set as it was before
    fn remove_saved(&mut self, ids: &[String]) -> Vec<String> {
        let snapshot = self.saved_ids.clone();
        self.saved_ids.retain(|id| !ids.contains(id));
        snapshot
    }
}

/// Async access to the vocabulary cache. Reads are answered from the cache
/// when possible; network results are applied under a short write lock.
pub struct VocabularyStore {
    api: Arc<dyn LexiconApi>,
    session: Arc<SessionManager>,
    cache: RwLock<VocabularyCache>,
}

impl VocabularyStore {
    pub fn new(api: Arc<dyn LexiconApi>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            cache: RwLock::new(VocabularyCache::default()),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, VocabularyCache> {
        self.cache.read().await
    }

    pub async fn load_all(&self) -> CoreResult<Vec<VocabularyItem>> {
        {
            let cache = self.cache.read().await;
            if cache.complete {
                tracing::debug!("Vocabulary served from cache ({} items)", cache.items.len());
                return Ok(cache.items.values().cloned().collect());
            }
        }

        self.cache.write().await.begin();
        match self.api.fetch_all_items().await {
            Ok(items) => {
                tracing::info!("Loaded {} vocabulary items", items.len());
                self.cache.write().await.apply_all(items.clone());
                Ok(items)
            }
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    pub async fn load_category(&self, category: &str) -> CoreResult<Vec<VocabularyItem>> {
        {
            let mut cache = self.cache.write().await;
            if !cache.category_labels.is_empty()
                && let Some(group) = cache.group(category)
            {
                let items = group.items.clone();
                cache.current_category = Some(category.to_string());
                tracing::debug!("Category {category} served from cache");
                return Ok(items);
            }
        }

        self.cache.write().await.begin();
        match self.api.fetch_category(category).await {
            Ok(page) => {
                let items = page.items.clone();
                self.cache.write().await.apply_category(category, page);
                Ok(items)
            }
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    pub async fn load_item(&self, id: &str) -> CoreResult<VocabularyItem> {
        self.cache.write().await.begin();
        match self.api.fetch_item(id).await {
            Ok(page) => {
                let item = page.item.clone();
                self.cache.write().await.apply_item_page(page);
                Ok(item)
            }
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    pub async fn load_category_labels(&self) -> CoreResult<Vec<String>> {
        {
            let cache = self.cache.read().await;
            if !cache.category_labels.is_empty() {
                return Ok(cache.category_labels.clone());
            }
        }

        match self.api.fetch_category_labels().await {
            Ok(labels) => {
                let mut cache = self.cache.write().await;
                merge_labels(&mut cache.category_labels, &labels);
                Ok(cache.category_labels.clone())
            }
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    /// Take the saved ids handed out at login until the items themselves load
    pub async fn seed_saved(&self, ids: Vec<String>) {
        let mut cache = self.cache.write().await;
        cache.saved_ids.clear();
        cache.add_saved(&ids);
    }

    /// Replace the saved set with the server's view
    pub async fn load_saved(&self) -> CoreResult<Vec<VocabularyItem>> {
        let bearer = self.session.bearer().await?;

        self.cache.write().await.saved_status = LoadStatus::Loading;
        match self.api.fetch_saved_items(&bearer).await {
            Ok(items) => {
                tracing::info!("Loaded {} saved words", items.len());
                self.cache.write().await.apply_saved(items.clone());
                Ok(items)
            }
            Err(e) => Err(self.fail_saved(e.into()).await),
        }
    }

    /// Save words for the user. The saved set changes immediately and is
    /// put back if the server refuses.
    pub async fn save_ids(&self, ids: &[String]) -> CoreResult<()> {
        let bearer = self.session.bearer().await?;

        let snapshot = {
            let mut cache = self.cache.write().await;
            cache.saved_status = LoadStatus::Loading;
            cache.add_saved(ids)
        };

        match self.api.save_items_for_user(&bearer, ids).await {
            Ok(()) => {
                self.cache.write().await.saved_status = LoadStatus::Succeeded;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Saving {ids:?} failed, restoring saved set: {e}");
                self.cache.write().await.saved_ids = snapshot;
                Err(self.fail_saved(e.into()).await)
            }
        }
    }

    pub async fn remove_ids(&self, ids: &[String]) -> CoreResult<()> {
        let bearer = self.session.bearer().await?;

        let snapshot = {
            let mut cache = self.cache.write().await;
            cache.saved_status = LoadStatus::Loading;
            cache.remove_saved(ids)
        };

        match self.api.remove_saved_items(&bearer, ids).await {
            Ok(()) => {
                self.cache.write().await.saved_status = LoadStatus::Succeeded;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Removing {ids:?} failed, restoring saved set: {e}");
                self.cache.write().await.saved_ids = snapshot;
                Err(self.fail_saved(e.into()).await)
            }
        }
    }

    pub async fn create_item(&self, item: &NewVocabularyItem) -> CoreResult<VocabularyItem> {
        let errors = validation::validate_new_item(item);
        if !errors.is_empty() {
            return Err(CoreError::Invalid(errors));
        }

        let bearer = self.session.bearer().await?;
        match self.api.create_item(&bearer, item).await {
            Ok(created) => {
                tracing::info!("Created vocabulary item {} ({})", created.term, created.id);
                self.cache.write().await.upsert_item(created.clone());
                Ok(created)
            }
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    /// Server-side search; hits are merged into the cache
    pub async fn search(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> CoreResult<Vec<VocabularyItem>> {
        match self.api.search_items(query, language).await {
            Ok(items) => {
                tracing::debug!("Search {query:?} matched {} items", items.len());
                self.cache.write().await.merge_items(&items);
                Ok(items)
            }
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    pub async fn search_cached(&self, query: &str) -> Vec<VocabularyItem> {
        self.cache
            .read()
            .await
            .search_cached(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn apply_approved_item(&self, item: VocabularyItem) {
        tracing::debug!("Merging approved item {}", item.id);
        self.cache.write().await.upsert_item(item);
    }

    pub async fn saved_items(&self) -> Vec<VocabularyItem> {
        self.cache
            .read()
            .await
            .saved_items()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn clear_error(&self) {
        self.cache.write().await.clear_error();
    }

    pub async fn clear_category_data(&self) {
        self.cache.write().await.clear_category_data();
    }

    pub async fn set_current_item(&self, id: &str) {
        self.cache.write().await.set_current_item(id);
    }

    pub async fn reset_current_item(&self) {
        self.cache.write().await.reset_current_item();
    }

    async fn fail(&self, err: CoreError) -> CoreError {
        tracing::warn!("Vocabulary request failed: {err}");
        self.cache.write().await.fail(&err);
        err
    }

    async fn fail_saved(&self, err: CoreError) -> CoreError {
        let mut cache = self.cache.write().await;
        cache.saved_status = LoadStatus::Failed;
        cache.error = Some(err.to_string());
        err
    }
}
