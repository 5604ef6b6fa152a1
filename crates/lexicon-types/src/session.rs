use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Interpreter,
    Overseer,
    Superuser,
}

impl Role {
    /// Whether the role may approve or reject suggestions
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Overseer | Role::Superuser)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Interpreter => "interpreter",
            Role::Overseer => "overseer",
            Role::Superuser => "superuser",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interpreter" => Ok(Role::Interpreter),
            "overseer" => Ok(Role::Overseer),
            "superuser" => Ok(Role::Superuser),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "user_type")]
    pub role: Role,
}

/// Tokens and profile handed out by a successful login
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub access: String,
    pub refresh: String,
    pub profile: Profile,
    pub saved_ids: Vec<String>,
}

/// The durable part of a session, persisted as one record so a restart can
/// rebuild the session from the refresh token alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub refresh_token: String,
    pub saved_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(profile: &Profile, refresh_token: String) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone(),
            role: profile.role,
            refresh_token,
            saved_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
