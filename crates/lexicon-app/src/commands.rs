use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lexicon_types::{Role, SuggestionKind, SuggestionType};

#[derive(Debug, Parser)]
#[command(name = "lexicon", version, about = "Medical-interpreter vocabulary lexicon")]
pub struct Cli {
    /// JSON config file; missing keys use defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base url, overrides config and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Run one command and exit; without one the interactive shell starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One line typed into the shell
#[derive(Debug, Parser)]
#[command(name = "lexicon", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login { username: String, password: String },
    /// Sign out and forget the stored session
    Logout,
    /// Create an interpreter account
    Register {
        username: String,
        email: String,
        password: String,
        #[arg(long, default_value_t = Role::Interpreter)]
        role: Role,
    },
    /// Show the signed-in profile
    Whoami,
    /// List category labels
    Categories,
    /// List words grouped by category, or one category
    Words { category: Option<String> },
    /// Show one word with its translations and suggestions
    Word {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Search terms and translations
    Search {
        query: String,
        #[arg(long)]
        lang: Option<String>,
        /// Search only what is already loaded
        #[arg(long)]
        local: bool,
    },
    /// Add words to the saved list
    Save {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove words from the saved list
    Unsave {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List saved words
    Saved,
    /// Create a vocabulary item directly
    AddWord {
        term: String,
        definition: String,
        category: String,
        /// `language=translation`, repeatable
        #[arg(long = "translation", value_parser = parse_pair)]
        translations: Vec<(String, String)>,
    },
    /// Propose a colloquial term or translation for an existing word
    Suggest {
        term: String,
        #[arg(value_enum)]
        kind: SuggestionTypeArg,
        suggestion: String,
        language: String,
    },
    /// Propose a new word
    SuggestWord {
        term: String,
        definition: String,
        translation: String,
        category: String,
        language: String,
    },
    /// List suggestions, optionally only those for one word
    Suggestions {
        #[arg(long)]
        item: Option<String>,
    },
    Like {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    Approve {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    Reject {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    #[command(subcommand)]
    Quiz(QuizCommand),
    /// Lay out a category graph and optionally export it as SVG
    Graph {
        category: String,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Highlight labels containing this text
        #[arg(long)]
        search: Option<String>,
        /// Drag delta in screen pixels, `dx,dy`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        pan: Option<(f64, f64)>,
        /// Zoom factor applied around the canvas centre
        #[arg(long)]
        zoom: Option<f64>,
        /// Select the word under a screen point, `x,y`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        click: Option<(f64, f64)>,
    },
    /// Navigate to a client path such as /quiz-page, or show where you are
    Open { path: Option<String> },
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum QuizCommand {
    /// Start over the saved words
    Start,
    /// Show the current question
    Show,
    /// Answer by choice number or text
    Answer { choice: String },
    Next,
    /// Drop the current word from the saved list and the quiz
    Remove,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "vocabulary")]
    Existing,
    #[value(name = "new", alias = "new-word")]
    NewWord,
}

impl From<KindArg> for SuggestionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Existing => SuggestionKind::ExistingWord,
            KindArg::NewWord => SuggestionKind::NewWord,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuggestionTypeArg {
    Colloquial,
    Translation,
}

impl From<SuggestionTypeArg> for SuggestionType {
    fn from(kind: SuggestionTypeArg) -> Self {
        match kind {
            SuggestionTypeArg::Colloquial => SuggestionType::Colloquial,
            SuggestionTypeArg::Translation => SuggestionType::Translation,
        }
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (language, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected language=translation, got `{raw}`"))?;
    Ok((language.trim().to_string(), value.trim().to_string()))
}

fn parse_point(raw: &str) -> Result<(f64, f64), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got `{raw}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

/// Split a shell line into words, honouring single and double quotes and
/// backslash escapes outside single quotes
pub fn split_line(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => anyhow::bail!("trailing backslash"),
            },
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        anyhow::bail!("unterminated {q} quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Outcome of reading one shell line
#[derive(Debug)]
pub enum Parsed {
    Empty,
    Command(Command),
    /// Help text or a usage error, to be shown as-is
    Message(String),
}

pub fn parse_line(line: &str) -> Parsed {
    let words = match split_line(line) {
        Ok(words) => words,
        Err(e) => return Parsed::Message(e.to_string()),
    };
    if words.is_empty() {
        return Parsed::Empty;
    }

    match ShellLine::try_parse_from(words) {
        Ok(parsed) => Parsed::Command(parsed.command),
        Err(e) => Parsed::Message(e.to_string()),
    }
}
