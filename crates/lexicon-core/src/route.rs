use std::fmt;

/// Client-visible locations, parsed from and formatted to paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    VocabularyMap {
        category: Option<String>,
        id: Option<String>,
    },
    VocabularyGraph,
    AddWord,
    AddSuggestion,
    Quiz,
    Moderation,
    Profile,
    Register,
    Login,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["vocabulary-map", rest @ ..] if rest.len() <= 2 => Route::VocabularyMap {
                category: rest.first().map(|s| decode_segment(s)),
                id: rest.get(1).map(|s| decode_segment(s)),
            },
            ["vocabulary-graph"] => Route::VocabularyGraph,
            ["add-word-page"] => Route::AddWord,
            ["add-new-suggestion-to-word"] => Route::AddSuggestion,
            ["quiz-page"] => Route::Quiz,
            ["suggestion-acquiesce"] => Route::Moderation,
            ["profile-page"] => Route::Profile,
            ["create-user-profile"] => Route::Register,
            ["login-user"] => Route::Login,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Route::AddWord | Route::AddSuggestion | Route::Quiz | Route::Moderation | Route::Profile
        )
    }

    /// Whether the page carries overseer-only actions; the page itself
    /// stays visible to any signed-in user
    pub fn requires_moderator(&self) -> bool {
        matches!(self, Route::Moderation)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::VocabularyMap { category, id } => {
                f.write_str("/vocabulary-map")?;
                if let Some(category) = category {
                    write!(f, "/{}", encode_segment(category))?;
                    if let Some(id) = id {
                        write!(f, "/{}", encode_segment(id))?;
                    }
                }
                Ok(())
            }
            Route::VocabularyGraph => f.write_str("/vocabulary-graph"),
            Route::AddWord => f.write_str("/add-word-page"),
            Route::AddSuggestion => f.write_str("/add-new-suggestion-to-word"),
            Route::Quiz => f.write_str("/quiz-page"),
            Route::Moderation => f.write_str("/suggestion-acquiesce"),
            Route::Profile => f.write_str("/profile-page"),
            Route::Register => f.write_str("/create-user-profile"),
            Route::Login => f.write_str("/login-user"),
            Route::NotFound(path) => f.write_str(path),
        }
    }
}

fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn decode_segment(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = segment.get(i + 1..i + 3)
            && let Ok(b) = u8::from_str_radix(hex, 16)
        {
            out.push(b);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
