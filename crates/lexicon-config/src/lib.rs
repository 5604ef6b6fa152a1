use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::graph::GraphConfig;
use self::log::LogConfig;
use self::quiz::QuizConfig;
use self::session::SessionConfig;

pub mod api;
pub mod graph;
pub mod log;
pub mod quiz;
pub mod session;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub quiz: QuizConfig,
    pub graph: GraphConfig,
    pub log: LogConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file; missing keys fall back to defaults and
    /// environment overrides still win
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("LEXICON_API_URL") {
            self.api.base_url = url;
        }

        if let Some(timeout) = env::var("LEXICON_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.api.timeout_seconds = timeout;
        }

        if let Some(interval) = env::var("LEXICON_REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.session.refresh_interval_secs = interval;
        }

        if let Ok(path) = env::var("LEXICON_SESSION_FILE") {
            self.session.file = Some(path.into());
        }

        if let Ok(language) = env::var("LEXICON_QUIZ_LANGUAGE") {
            self.quiz.language = language;
        }

        if let Ok(filter) = env::var("LEXICON_LOG") {
            self.log.filter = filter;
        }
    }
}
