use lexicon_core::route::Route;

use super::{auth, quiz, suggestions, vocabulary};
use crate::commands::QuizCommand;
use crate::state::AppState;

const PAGES: &str = "\
/vocabulary-map[/category[/id]]  browse words
/vocabulary-graph                category graphs
/add-word-page                   add a word
/add-new-suggestion-to-word      suggest a term or translation
/quiz-page                       quiz over saved words
/suggestion-acquiesce            suggestions and moderation
/profile-page                    your profile
/create-user-profile             register
/login-user                      sign in";

pub async fn handle_open(state: &AppState, path: &str) -> anyhow::Result<String> {
    let route = Route::parse(path);
    let logged_in = state.lexicon.session().is_logged_in().await;

    if route.requires_login() && !logged_in {
        return Ok(format!(
            "{route} needs a signed-in user, use `login <username> <password>`"
        ));
    }
    let moderator_actions = route.requires_moderator();
    tracing::debug!("Navigating to {route}");
    *state.route.lock().await = route.clone();

    match route {
        Route::Home => Ok(PAGES.to_string()),
        Route::VocabularyMap { category, id } => match id {
            Some(id) => vocabulary::handle_word(state, id, false).await,
            None => vocabulary::handle_words(state, category).await,
        },
        Route::VocabularyGraph => {
            let labels = vocabulary::handle_categories(state).await?;
            Ok(format!("{labels}\n`graph <category>` to lay one out"))
        }
        Route::AddWord => Ok("add-word <term> <definition> <category> --translation pl=...".to_string()),
        Route::AddSuggestion => Ok(
            "suggest <term> <colloquial|translation> <suggestion> <language>\n\
             suggest-word <term> <definition> <translation> <category> <language>"
                .to_string(),
        ),
        Route::Quiz => {
            let running = state.quiz.lock().await.is_some();
            let command = if running { QuizCommand::Show } else { QuizCommand::Start };
            quiz::handle_quiz(state, command).await
        }
        Route::Moderation => {
            let mut page = suggestions::handle_list(state, None).await?;
            let can_moderate = state
                .lexicon
                .session()
                .profile()
                .await
                .is_some_and(|p| p.role.can_moderate());
            if moderator_actions && !can_moderate {
                page.push_str("Approving and rejecting needs an overseer account\n");
            }
            Ok(page)
        }
        Route::Profile => auth::handle_whoami(state).await,
        Route::Register => Ok("register <username> <email> <password>".to_string()),
        Route::Login => Ok("login <username> <password>".to_string()),
        Route::NotFound(path) => Ok(format!("Page not found: {path}")),
    }
}
