pub mod events;
pub mod form;
pub mod id;
pub mod session;
pub mod suggestion;
pub mod vocabulary;

pub use events::{AppEvent, SessionNotice};
pub use form::{FieldErrors, FormError};
pub use session::{Credentials, LoginGrant, Profile, Registration, Role, SessionRecord};
pub use suggestion::{
    AllSuggestions, ApprovalOutcome, ExistingWordSuggestion, ExistingWordSuggestionDraft,
    LikeOutcome, NewWordSuggestion, NewWordSuggestionDraft, SuggestionKind, SuggestionStatus,
    SuggestionType,
};
pub use vocabulary::{CategoryGroup, NewVocabularyItem, Translation, VocabularyItem};

/// Language codes offered by the submission forms
pub const LANGUAGES: [&str; 6] = ["pl", "en", "es", "de", "fr", "coloquial expression"];

/// Category used for items that arrive without one
pub const UNCATEGORIZED: &str = "Uncategorized";
