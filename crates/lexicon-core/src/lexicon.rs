use std::collections::HashMap;
use std::sync::Arc;

use lexicon_api::{HttpLexiconClient, LexiconApi};
use lexicon_config::Config;
use lexicon_config::graph::GraphConfig;
use lexicon_config::quiz::QuizConfig;
use lexicon_types::{Credentials, Profile, Registration, SuggestionKind, VocabularyItem};
use rand::rngs::StdRng;

use crate::error::{CoreError, CoreResult};
use crate::graph::{Graph, Viewport};
use crate::quiz::Quiz;
use crate::session::{SessionManager, SessionStore};
use crate::suggestion::SuggestionStore;
use crate::vocabulary::VocabularyStore;

/// Everything the client knows, plus the operations that touch more than
/// one cache at a time
pub struct Lexicon {
    session: Arc<SessionManager>,
    vocabulary: VocabularyStore,
    suggestions: SuggestionStore,
    quiz: QuizConfig,
    graph: GraphConfig,
}

impl Lexicon {
    pub fn new(api: Arc<dyn LexiconApi>, store: SessionStore, config: &Config) -> Self {
        let session = Arc::new(SessionManager::new(api.clone(), store));
        Self {
            vocabulary: VocabularyStore::new(api.clone(), session.clone()),
            suggestions: SuggestionStore::new(api, session.clone()),
            session,
            quiz: config.quiz.clone(),
            graph: config.graph.clone(),
        }
    }

    /// HTTP client and session file as configured
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let client = HttpLexiconClient::with_timeout(&config.api.base_url, config.api.timeout())?;
        let store = SessionStore::new(config.session.session_file());
        tracing::info!(
            "Lexicon backend {} (session file {:?})",
            client.base_url(),
            store.path()
        );
        Ok(Self::new(Arc::new(client), store, config))
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn vocabulary(&self) -> &VocabularyStore {
        &self.vocabulary
    }

    pub fn suggestions(&self) -> &SuggestionStore {
        &self.suggestions
    }

    pub fn quiz_config(&self) -> &QuizConfig {
        &self.quiz
    }

    pub fn graph_config(&self) -> &GraphConfig {
        &self.graph
    }

    pub async fn register(&self, registration: &Registration) -> CoreResult<()> {
        self.session.register(registration).await
    }

    /// Sign in and pull the user's saved words
    pub async fn login(&self, credentials: &Credentials) -> CoreResult<Profile> {
        let (profile, saved_ids) = self.session.login(credentials).await?;
        self.vocabulary.seed_saved(saved_ids).await;
        if let Err(e) = self.vocabulary.load_saved().await {
            tracing::warn!("Signed in but saved words could not be loaded: {e}");
        }
        Ok(profile)
    }

    /// Rebuild the session from disk at start-up
    pub async fn restore(&self) -> CoreResult<bool> {
        let restored = self.session.restore().await?;
        if restored && let Err(e) = self.vocabulary.load_saved().await {
            tracing::warn!("Session restored but saved words could not be loaded: {e}");
        }
        Ok(restored)
    }

    /// Sign out and drop every cached user-facing state
    pub async fn logout(&self) {
        self.session.logout().await;
        self.vocabulary.clear().await;
        self.suggestions.clear().await;
    }

    /// Approve a suggestion and fold the resulting item into the lexicon
    pub async fn approve(
        &self,
        kind: SuggestionKind,
        id: &str,
    ) -> CoreResult<Option<VocabularyItem>> {
        let item = self.suggestions.approve(kind, id).await?;
        if let Some(item) = &item {
            self.vocabulary.apply_approved_item(item.clone()).await;
        }
        Ok(item)
    }

    pub async fn reject(&self, kind: SuggestionKind, id: &str) -> CoreResult<()> {
        self.suggestions.reject(kind, id).await
    }

    pub async fn start_quiz(&self) -> CoreResult<Quiz> {
        let (saved, items) = self.quiz_material().await?;
        Ok(Quiz::new(
            &saved,
            &items,
            &self.quiz.language,
            self.quiz.distractors,
        ))
    }

    /// Same as [`Lexicon::start_quiz`] with a caller-provided RNG
    pub async fn start_quiz_with_rng(&self, rng: StdRng) -> CoreResult<Quiz> {
        let (saved, items) = self.quiz_material().await?;
        Ok(Quiz::with_rng(
            &saved,
            &items,
            &self.quiz.language,
            self.quiz.distractors,
            rng,
        ))
    }

    async fn quiz_material(
        &self,
    ) -> CoreResult<(Vec<String>, HashMap<String, VocabularyItem>)> {
        if !self.session.is_logged_in().await {
            return Err(CoreError::NotLoggedIn);
        }

        self.vocabulary.load_all().await?;
        self.vocabulary.load_saved().await?;

        let cache = self.vocabulary.read().await;
        Ok((cache.saved_ids().to_vec(), cache.items().clone()))
    }

    /// Unsave a word while quizzing; the quiz moves on if it was the
    /// current question
    pub async fn remove_from_quiz(&self, quiz: &mut Quiz, id: &str) -> CoreResult<()> {
        self.vocabulary.remove_ids(&[id.to_string()]).await?;
        quiz.remove_word(id);
        Ok(())
    }

    /// Laid-out star graph for one category
    pub async fn category_graph(&self, category: &str) -> CoreResult<Graph> {
        let items = self.vocabulary.load_category(category).await?;
        Ok(Graph::layout(category, &items, &self.graph))
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(&self.graph)
    }
}
