use std::sync::Arc;

use lexicon_config::Config;
use lexicon_core::Lexicon;
use lexicon_core::quiz::Quiz;
use lexicon_core::route::Route;
use tokio::sync::{Mutex, RwLock};

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub lexicon: Arc<Lexicon>,
    /// Quiz in progress, if any; lives as long as the shell
    pub quiz: Mutex<Option<Quiz>>,
    pub route: Mutex<Route>,
}

impl AppState {
    pub fn new(config: Config, lexicon: Lexicon) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            lexicon: Arc::new(lexicon),
            quiz: Mutex::new(None),
            route: Mutex::new(Route::Home),
        }
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let lexicon = Lexicon::from_config(&config)?;
        Ok(Self::new(config, lexicon))
    }

    /// Drop the session, every cache and any quiz in progress
    pub async fn sign_out(&self) {
        self.lexicon.logout().await;
        *self.quiz.lock().await = None;
    }
}
