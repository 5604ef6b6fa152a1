use lexicon_types::NewVocabularyItem;

use crate::render;
use crate::state::AppState;

pub async fn handle_categories(state: &AppState) -> anyhow::Result<String> {
    let labels = state.lexicon.vocabulary().load_category_labels().await?;
    if labels.is_empty() {
        return Ok("No categories".to_string());
    }
    Ok(labels.join("\n"))
}

pub async fn handle_words(state: &AppState, category: Option<String>) -> anyhow::Result<String> {
    let vocabulary = state.lexicon.vocabulary();
    match category {
        Some(category) => {
            let items = vocabulary.load_category(&category).await?;
            let cache = vocabulary.read().await;
            Ok(render::word_list(&items, |id| cache.is_saved(id)))
        }
        None => {
            vocabulary.load_all().await?;
            let cache = vocabulary.read().await;
            Ok(render::groups(cache.grouped(), |id| cache.is_saved(id)))
        }
    }
}

pub async fn handle_word(state: &AppState, id: String, json: bool) -> anyhow::Result<String> {
    let item = state.lexicon.vocabulary().load_item(&id).await?;
    if json {
        return Ok(serde_json::to_string_pretty(&item)?);
    }

    let suggestions = match state.lexicon.suggestions().fetch_for_item(&id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("Could not load suggestions for {id}: {e}");
            Vec::new()
        }
    };
    let saved = state.lexicon.vocabulary().read().await.is_saved(&id);
    Ok(render::word_detail(&item, saved, &suggestions))
}

pub async fn handle_search(
    state: &AppState,
    query: String,
    lang: Option<String>,
    local: bool,
) -> anyhow::Result<String> {
    let vocabulary = state.lexicon.vocabulary();
    let hits = if local {
        vocabulary.search_cached(&query).await
    } else {
        vocabulary.search(&query, lang.as_deref()).await?
    };
    let cache = vocabulary.read().await;
    Ok(render::word_list(&hits, |id| cache.is_saved(id)))
}

pub async fn handle_save(state: &AppState, ids: Vec<String>) -> anyhow::Result<String> {
    state.lexicon.vocabulary().save_ids(&ids).await?;
    Ok(format!("Saved {}", ids.join(", ")))
}

pub async fn handle_unsave(state: &AppState, ids: Vec<String>) -> anyhow::Result<String> {
    state.lexicon.vocabulary().remove_ids(&ids).await?;
    Ok(format!("Removed {}", ids.join(", ")))
}

pub async fn handle_saved(state: &AppState) -> anyhow::Result<String> {
    let vocabulary = state.lexicon.vocabulary();
    let items = vocabulary.load_saved().await?;
    Ok(render::word_list(&items, |_| true))
}

pub async fn handle_add_word(
    state: &AppState,
    term: String,
    definition: String,
    category: String,
    translations: Vec<(String, String)>,
) -> anyhow::Result<String> {
    let item = state
        .lexicon
        .vocabulary()
        .create_item(&NewVocabularyItem {
            term,
            definition,
            category,
            translations: translations.into_iter().collect(),
        })
        .await?;
    Ok(format!("Created {}", render::word_line(&item, false)))
}
