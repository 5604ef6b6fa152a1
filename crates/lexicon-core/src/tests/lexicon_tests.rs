use std::sync::Arc;

use lexicon_types::Role;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::fake_api::{FakeApi, item, lexicon, signed_in};
use crate::CoreError;
use crate::graph::{HighlightContext, NodeKind, SAVED_COLOR};

fn api() -> Arc<FakeApi> {
    let api = FakeApi::with_items(vec![
        item("a", "heart", "cardiology", "serce"),
        item("b", "aorta", "cardiology", "aorta"),
        item("c", "lung", "pulmonology", "płuco"),
        item("d", "valve", "cardiology", "zastawka"),
    ]);
    *api.saved.lock().unwrap() = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    Arc::new(api)
}

#[tokio::test]
async fn quiz_needs_a_session() {
    let api = api();
    let dir = tempfile::tempdir().unwrap();
    let lexicon = lexicon(&api, &dir);

    assert!(matches!(lexicon.start_quiz().await, Err(CoreError::NotLoggedIn)));
    assert_eq!(api.calls("fetch_all_items"), 0);
}

#[tokio::test]
async fn quiz_runs_over_saved_words() {
    let api = api();
    let dir = tempfile::tempdir().unwrap();
    let lexicon = signed_in(&api, &dir, Role::Interpreter).await;

    let mut quiz = lexicon
        .start_quiz_with_rng(StdRng::seed_from_u64(11))
        .await
        .unwrap();
    assert_eq!(quiz.total(), 3);
    assert_eq!(quiz.current().map(|q| q.term), Some("heart"));

    lexicon.remove_from_quiz(&mut quiz, "a").await.unwrap();
    assert_eq!(quiz.total(), 2);
    assert_eq!(quiz.current().map(|q| q.term), Some("aorta"));
    assert!(!lexicon.vocabulary().read().await.is_saved("a"));
    assert!(!api.saved.lock().unwrap().contains(&"a".to_string()));
}

#[tokio::test]
async fn category_graph_is_laid_out_from_cache() {
    let api = api();
    let dir = tempfile::tempdir().unwrap();
    let lexicon = signed_in(&api, &dir, Role::Interpreter).await;

    let graph = lexicon.category_graph("cardiology").await.unwrap();
    assert_eq!(graph.words().count(), 3);
    assert_eq!(graph.nodes()[0].kind, NodeKind::Category);

    lexicon.category_graph("cardiology").await.unwrap();
    assert_eq!(api.calls("fetch_category"), 1);

    let saved = lexicon.vocabulary().read().await.saved_ids().to_vec();
    let context = HighlightContext {
        saved: &saved,
        ..Default::default()
    };
    let heart = graph.node("a").unwrap();
    assert_eq!(context.highlight(heart).color(), SAVED_COLOR);

    let viewport = lexicon.viewport();
    let (px, py) = viewport.to_screen(heart.x, heart.y);
    let (wx, wy) = viewport.to_world(px, py);
    assert_eq!(graph.hit_test(wx, wy).map(|n| n.id.as_str()), Some("a"));
}
