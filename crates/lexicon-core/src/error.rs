use lexicon_api::ApiError;
use lexicon_types::{FieldErrors, FormError};

use crate::quiz::QuizError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    Invalid(FieldErrors),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Unauthorized: Insufficient permissions")]
    Forbidden,

    #[error("Suggestion {id} is already {status}")]
    SuggestionClosed { id: String, status: String },

    #[error("Unknown suggestion: {0}")]
    UnknownSuggestion(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl CoreError {
    /// Error in the shape forms render: backend field errors and client
    /// validation both land in `details`
    pub fn to_form_error(&self) -> FormError {
        match self {
            CoreError::Api(api) => api.to_form_error(),
            CoreError::Invalid(fields) => {
                FormError::with_details("Please correct the highlighted fields", fields.clone())
            }
            other => FormError::message(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
