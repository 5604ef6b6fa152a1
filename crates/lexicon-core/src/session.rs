use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexicon_api::LexiconApi;
use lexicon_types::{Credentials, FormError, Profile, Registration, SessionRecord};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::status::LoadStatus;
use crate::validation;

/// Durable session record kept in a single JSON file.
///
/// Writes go to a sibling temp file that is renamed over the record, so a
/// reader sees either the old record or the new one, never a mix.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> CoreResult<Option<SessionRecord>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&data) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!("Discarding unreadable session record {:?}: {e}", self.path);
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, record: &SessionRecord) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> CoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory sign-in state
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub profile: Option<Profile>,
    pub logged_in: bool,
    pub status: LoadStatus,
    pub error: Option<FormError>,
}

/// Owns the session and keeps the access token fresh
pub struct SessionManager {
    api: Arc<dyn LexiconApi>,
    store: SessionStore,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn LexiconApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.logged_in
    }

    pub async fn profile(&self) -> Option<Profile> {
        self.state.read().await.profile.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Create an account; a successful registration does not sign in
    pub async fn register(&self, registration: &Registration) -> CoreResult<()> {
        let errors = validation::validate_registration(registration);
        if !errors.is_empty() {
            let err = CoreError::Invalid(errors);
            self.fail(&err).await;
            return Err(err);
        }

        self.state.write().await.status = LoadStatus::Loading;

        match self.api.register(registration).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.status = LoadStatus::Succeeded;
                state.error = None;
                tracing::info!("Registered {}", registration.username);
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.fail(&err).await;
                Err(err)
            }
        }
    }

    /// Sign in, returning the profile and the ids the user has saved
    pub async fn login(&self, credentials: &Credentials) -> CoreResult<(Profile, Vec<String>)> {
        let errors = validation::validate_login(credentials);
        if !errors.is_empty() {
            let err = CoreError::Invalid(errors);
            self.fail(&err).await;
            return Err(err);
        }

        self.state.write().await.status = LoadStatus::Loading;

        let grant = match self.api.login(credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                let err = CoreError::from(e);
                self.fail(&err).await;
                return Err(err);
            }
        };

        let record = SessionRecord::new(&grant.profile, grant.refresh.clone());
        if let Err(e) = self.store.save(&record) {
            tracing::warn!("Failed to persist session: {e}");
        }

        let mut state = self.state.write().await;
        state.access_token = Some(grant.access);
        state.refresh_token = Some(grant.refresh);
        state.profile = Some(grant.profile.clone());
        state.logged_in = true;
        state.status = LoadStatus::Succeeded;
        state.error = None;

        tracing::info!("Logged in as {} ({})", grant.profile.username, grant.profile.role);
        Ok((grant.profile, grant.saved_ids))
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// When the session is not marked logged in (fresh start), the profile
    /// is rebuilt from the durable record. Any failure signs the user out.
    pub async fn refresh(&self) -> CoreResult<()> {
        let (in_memory, logged_in) = {
            let state = self.state.read().await;
            (state.refresh_token.clone(), state.logged_in)
        };

        let record = self.store.load()?;
        let refresh = in_memory.or_else(|| record.as_ref().map(|r| r.refresh_token.clone()));
        let Some(refresh) = refresh else {
            return Err(CoreError::NotLoggedIn);
        };

        match self.api.refresh_token(&refresh).await {
            Ok(access) => {
                let mut state = self.state.write().await;
                state.access_token = Some(access);
                state.refresh_token = Some(refresh);
                state.status = LoadStatus::Succeeded;
                state.error = None;

                if !logged_in && let Some(record) = record {
                    state.profile = Some(record.profile());
                    state.logged_in = true;
                    tracing::info!("Session restored for {}", record.username);
                } else {
                    tracing::debug!("Access token refreshed");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, logging out: {e}");
                let err = CoreError::from(e);
                self.clear_local(Some(err.to_form_error())).await;
                Err(err)
            }
        }
    }

    /// Rebuild a session from the durable record, if one exists
    pub async fn restore(&self) -> CoreResult<bool> {
        if self.store.load()?.is_none() {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(self.is_logged_in().await)
    }

    /// Access token for an authenticated request, refreshing it first when
    /// only a refresh token is available
    pub async fn bearer(&self) -> CoreResult<String> {
        if let Some(token) = self.state.read().await.access_token.clone() {
            return Ok(token);
        }

        self.refresh().await?;

        self.state
            .read()
            .await
            .access_token
            .clone()
            .ok_or(CoreError::NotLoggedIn)
    }

    /// Profile of a signed-in overseer or superuser.
    ///
    /// Only a convenience gate for the client; the backend enforces roles.
    pub async fn require_moderator(&self) -> CoreResult<Profile> {
        match self.profile().await {
            Some(profile) if profile.role.can_moderate() => Ok(profile),
            _ => Err(CoreError::Forbidden),
        }
    }

    pub async fn logout(&self) {
        self.clear_local(None).await;
        tracing::info!("Logged out");
    }

    async fn clear_local(&self, error: Option<FormError>) {
        {
            let mut state = self.state.write().await;
            *state = SessionState::default();
            if error.is_some() {
                state.status = LoadStatus::Failed;
                state.error = error;
            }
        }

        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to remove session record: {e}");
        }
    }

    async fn fail(&self, err: &CoreError) {
        let mut state = self.state.write().await;
        state.status = LoadStatus::Failed;
        state.error = Some(err.to_form_error());
    }
}
