use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_refresh_interval_secs() -> u64 {
    14 * 60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Proactive access-token refresh period while logged in
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Where the durable session record lives; defaults to the user data dir
    pub file: Option<PathBuf>,
}

impl SessionConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn session_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lexicon")
                .join("session.json")
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            file: None,
        }
    }
}
