use std::sync::Arc;

use kanal::AsyncReceiver;
use lexicon_core::CoreError;
use lexicon_types::{AppEvent, NewWordSuggestionDraft, SessionNotice};
use tokio_util::sync::CancellationToken;

use crate::commands::{self, Command, Parsed};
use crate::render;
use crate::state::AppState;

pub mod auth;
pub mod graph;
pub mod navigation;
pub mod quiz;
pub mod suggestions;
pub mod vocabulary;

use graph::GraphRequest;

/// What a handled command asks of the loop
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Print(String),
    Quit,
}

/// App's main loop: shell lines and background notices in arrival order
pub async fn event_loop(
    state: Arc<AppState>,
    event_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Event loop started");
    loop {
        let event = tokio::select! {
            event = event_rx.recv() => event?,
            _ = cancel.cancelled() => break,
        };

        match event {
            AppEvent::Command(line) => match commands::parse_line(&line) {
                Parsed::Empty => {}
                Parsed::Message(message) => println!("{}", message.trim_end()),
                Parsed::Command(command) => match handle_command(&state, command).await {
                    Outcome::Print(text) => println!("{}", text.trim_end()),
                    Outcome::Quit => break,
                },
            },
            AppEvent::Session(notice) => handle_session_notice(notice),
            AppEvent::Shutdown => break,
        }
    }

    tracing::info!("Event loop stopping");
    cancel.cancel();
    Ok(())
}

fn handle_session_notice(notice: SessionNotice) {
    match notice {
        SessionNotice::Refreshed => tracing::debug!("Access token refreshed"),
        SessionNotice::Expired { reason } => {
            tracing::warn!("Session expired: {reason}");
            println!("Your session expired ({reason}), sign in again");
        }
    }
}

/// Run one command; failures become printable text so the shell keeps going
pub async fn handle_command(state: &AppState, command: Command) -> Outcome {
    match dispatch(state, command).await {
        Ok(outcome) => outcome,
        Err(e) => Outcome::Print(describe_error(&e)),
    }
}

pub fn describe_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<CoreError>() {
        Some(core) => render::form_error(&core.to_form_error()),
        None => format!("Error: {error}"),
    }
}

async fn dispatch(state: &AppState, command: Command) -> anyhow::Result<Outcome> {
    tracing::debug!("Handling {command:?}");
    let text = match command {
        Command::Login { username, password } => auth::handle_login(state, username, password).await?,
        Command::Logout => auth::handle_logout(state).await?,
        Command::Register {
            username,
            email,
            password,
            role,
        } => auth::handle_register(state, username, email, password, role).await?,
        Command::Whoami => auth::handle_whoami(state).await?,
        Command::Categories => vocabulary::handle_categories(state).await?,
        Command::Words { category } => vocabulary::handle_words(state, category).await?,
        Command::Word { id, json } => vocabulary::handle_word(state, id, json).await?,
        Command::Search { query, lang, local } => {
            vocabulary::handle_search(state, query, lang, local).await?
        }
        Command::Save { ids } => vocabulary::handle_save(state, ids).await?,
        Command::Unsave { ids } => vocabulary::handle_unsave(state, ids).await?,
        Command::Saved => vocabulary::handle_saved(state).await?,
        Command::AddWord {
            term,
            definition,
            category,
            translations,
        } => vocabulary::handle_add_word(state, term, definition, category, translations).await?,
        Command::Suggest {
            term,
            kind,
            suggestion,
            language,
        } => suggestions::handle_suggest(state, term, kind.into(), suggestion, language).await?,
        Command::SuggestWord {
            term,
            definition,
            translation,
            category,
            language,
        } => {
            let draft = NewWordSuggestionDraft {
                term,
                definition,
                translation,
                category,
                language,
            };
            suggestions::handle_suggest_word(state, draft).await?
        }
        Command::Suggestions { item } => suggestions::handle_list(state, item).await?,
        Command::Like { kind, id } => suggestions::handle_like(state, kind.into(), id).await?,
        Command::Approve { kind, id } => suggestions::handle_approve(state, kind.into(), id).await?,
        Command::Reject { kind, id } => suggestions::handle_reject(state, kind.into(), id).await?,
        Command::Quiz(command) => quiz::handle_quiz(state, command).await?,
        Command::Graph {
            category,
            out,
            search,
            pan,
            zoom,
            click,
        } => {
            let request = GraphRequest {
                category,
                out,
                search,
                pan,
                zoom,
                click,
            };
            graph::handle_graph(state, request).await?
        }
        Command::Open { path: Some(path) } => navigation::handle_open(state, &path).await?,
        Command::Open { path: None } => format!("At {}", state.route.lock().await),
        Command::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Print(text))
}
