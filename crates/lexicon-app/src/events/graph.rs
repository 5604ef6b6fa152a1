use std::fmt::Write;
use std::path::PathBuf;

use lexicon_core::graph::HighlightContext;

use crate::render;
use crate::state::AppState;

pub struct GraphRequest {
    pub category: String,
    pub out: Option<PathBuf>,
    pub search: Option<String>,
    pub pan: Option<(f64, f64)>,
    pub zoom: Option<f64>,
    pub click: Option<(f64, f64)>,
}

pub async fn handle_graph(state: &AppState, request: GraphRequest) -> anyhow::Result<String> {
    let lexicon = &state.lexicon;
    let graph = lexicon.category_graph(&request.category).await?;

    let mut viewport = lexicon.viewport();
    if let Some((dx, dy)) = request.pan {
        viewport.pan(dx, dy);
    }
    if let Some(factor) = request.zoom {
        viewport.zoom_at(factor, viewport.width / 2.0, viewport.height / 2.0);
    }

    let selected = request.click.and_then(|(px, py)| {
        let (x, y) = viewport.to_world(px, py);
        graph.hit_test(x, y).map(|node| node.id.clone())
    });

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} words, scale {:.2}",
        graph.category(),
        graph.words().count(),
        viewport.scale
    );

    if let Some(id) = &selected {
        lexicon.vocabulary().set_current_item(id).await;
        let vocabulary = lexicon.vocabulary().read().await;
        if let Some(item) = vocabulary.item(id) {
            out.push_str(&render::word_detail(item, vocabulary.is_saved(id), &[]));
        }
    } else if request.click.is_some() {
        out.push_str("Nothing under that point\n");
    }

    if let Some(path) = request.out {
        let saved = lexicon.vocabulary().read().await.saved_ids().to_vec();
        let context = HighlightContext {
            selected: selected.as_deref(),
            search: request.search.as_deref(),
            saved: &saved,
        };
        tokio::fs::write(&path, graph.to_svg(&viewport, &context)).await?;
        tracing::info!("Graph written to {}", path.display());
        let _ = writeln!(out, "Wrote {}", path.display());
    } else {
        for node in graph.words() {
            let (x, y) = viewport.to_screen(node.x, node.y);
            let _ = writeln!(out, "  {:>6}  {:<24} {:>8.1} {:>8.1}", node.id, node.label, x, y);
        }
    }

    Ok(out)
}
