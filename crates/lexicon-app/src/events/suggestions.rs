use lexicon_types::{ExistingWordSuggestionDraft, NewWordSuggestionDraft, SuggestionKind, SuggestionType};

use crate::render;
use crate::state::AppState;

pub async fn handle_suggest(
    state: &AppState,
    term: String,
    suggestion_type: SuggestionType,
    suggestion: String,
    language: String,
) -> anyhow::Result<String> {
    let created = state
        .lexicon
        .suggestions()
        .submit_existing(&ExistingWordSuggestionDraft {
            term,
            suggestion_type,
            suggestion,
            language,
        })
        .await?;
    Ok(format!("Submitted {}", render::existing_suggestion(&created)))
}

pub async fn handle_suggest_word(state: &AppState, draft: NewWordSuggestionDraft) -> anyhow::Result<String> {
    let created = state.lexicon.suggestions().submit_new(&draft).await?;
    Ok(format!("Submitted {}", render::new_word_suggestion(&created)))
}

pub async fn handle_list(state: &AppState, item: Option<String>) -> anyhow::Result<String> {
    let lexicon = &state.lexicon;

    if let Some(item) = item {
        let list = lexicon.suggestions().fetch_for_item(&item).await?;
        if list.is_empty() {
            return Ok(format!("No suggestions for {item}"));
        }
        return Ok(list
            .iter()
            .map(render::existing_suggestion)
            .collect::<Vec<_>>()
            .join("\n"));
    }

    lexicon.suggestions().fetch_all().await?;
    // Terms for the grouping headers; a failed load only costs the labels
    if let Err(e) = lexicon.vocabulary().load_all().await {
        tracing::warn!("Could not load vocabulary for suggestion headers: {e}");
    }

    let can_moderate = lexicon
        .session()
        .profile()
        .await
        .is_some_and(|p| p.role.can_moderate());
    let vocabulary = lexicon.vocabulary().read().await;
    let suggestions = lexicon.suggestions().read().await;
    Ok(render::suggestions(
        &suggestions,
        |id| vocabulary.item(id).map(|i| i.term.clone()),
        can_moderate,
    ))
}

pub async fn handle_like(state: &AppState, kind: SuggestionKind, id: String) -> anyhow::Result<String> {
    let count = state.lexicon.suggestions().like(kind, &id).await?;
    Ok(format!("Liked {id} ({count} likes)"))
}

pub async fn handle_approve(state: &AppState, kind: SuggestionKind, id: String) -> anyhow::Result<String> {
    match state.lexicon.approve(kind, &id).await? {
        Some(item) => Ok(format!("Approved {id}, {} updated", item.term)),
        None => Ok(format!("Approved {id}")),
    }
}

pub async fn handle_reject(state: &AppState, kind: SuggestionKind, id: String) -> anyhow::Result<String> {
    state.lexicon.reject(kind, &id).await?;
    Ok(format!("Rejected {id}"))
}
