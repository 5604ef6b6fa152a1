//! Star graph of one category: a category hub with its words around it.
//!
//! The layout is a small velocity-Verlet force simulation (link, many-body,
//! centering and collision forces) run for a fixed number of ticks. Nodes
//! start on a phyllotaxis spiral, so the same input always gives the same
//! layout.

use std::f64::consts::PI;
use std::fmt::Write as _;

use lexicon_config::graph::GraphConfig;
use lexicon_types::VocabularyItem;

use crate::normalize;

const LINK_DISTANCE: f64 = 10_000.0;
const WORD_CHARGE: f64 = 200.0;
const CATEGORY_COLLIDE_RADIUS: f64 = 300.0;
const WORD_COLLIDE_RADIUS: f64 = 1200.0;
const CATEGORY_DRAW_RADIUS: f64 = 550.0;
const WORD_DRAW_RADIUS: f64 = 450.0;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const INITIAL_RADIUS: f64 = 10.0;

pub const DEFAULT_COLOR: &str = "#a09edd";
pub const SELECTED_COLOR: &str = "#ff6347";
pub const SAVED_COLOR: &str = "#00FF00";
pub const SEARCH_COLOR: &str = "#00FFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Category,
    Word,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Item id for words, the category label for the hub
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
}

impl GraphNode {
    fn new(id: String, label: String, kind: NodeKind) -> Self {
        Self {
            id,
            label,
            kind,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn radius(&self) -> f64 {
        match self.kind {
            NodeKind::Category => CATEGORY_DRAW_RADIUS,
            NodeKind::Word => WORD_DRAW_RADIUS,
        }
    }

    fn collide_radius(&self) -> f64 {
        match self.kind {
            NodeKind::Category => CATEGORY_COLLIDE_RADIUS,
            NodeKind::Word => WORD_COLLIDE_RADIUS,
        }
    }

    fn charge(&self) -> f64 {
        match self.kind {
            NodeKind::Category => 0.0,
            NodeKind::Word => WORD_CHARGE,
        }
    }
}

/// Edge between two node indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
}

/// Fill applied to a node, strongest reason first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Selected,
    SearchMatch,
    Saved,
    Default,
}

impl Highlight {
    pub fn color(self) -> &'static str {
        match self {
            Highlight::Selected => SELECTED_COLOR,
            Highlight::SearchMatch => SEARCH_COLOR,
            Highlight::Saved => SAVED_COLOR,
            Highlight::Default => DEFAULT_COLOR,
        }
    }
}

/// What the view currently emphasises
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightContext<'a> {
    pub selected: Option<&'a str>,
    pub search: Option<&'a str>,
    pub saved: &'a [String],
}

impl HighlightContext<'_> {
    pub fn highlight(&self, node: &GraphNode) -> Highlight {
        if self.selected.is_some_and(|id| id == node.id) {
            return Highlight::Selected;
        }
        if self
            .search
            .is_some_and(|term| normalize::contains_folded(&node.label, term))
        {
            return Highlight::SearchMatch;
        }
        if node.kind == NodeKind::Word && self.saved.contains(&node.id) {
            return Highlight::Saved;
        }
        Highlight::Default
    }
}

#[derive(Debug, Clone)]
pub struct Graph {
    category: String,
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,
}

impl Graph {
    /// Hub for `category` plus one node per item filed under it, with
    /// nodes placed but not yet laid out
    pub fn for_category(category: &str, items: &[VocabularyItem]) -> Self {
        let mut nodes = vec![GraphNode::new(
            category.to_string(),
            category.to_string(),
            NodeKind::Category,
        )];
        let mut links = Vec::new();

        for item in items.iter().filter(|item| item.category_label() == category) {
            links.push(GraphLink {
                source: nodes.len(),
                target: 0,
            });
            nodes.push(GraphNode::new(
                item.id.clone(),
                item.term.clone(),
                NodeKind::Word,
            ));
        }

        let angle = PI * (3.0 - 5f64.sqrt());
        for (i, node) in nodes.iter_mut().enumerate() {
            let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
            let theta = i as f64 * angle;
            node.x = radius * theta.cos();
            node.y = radius * theta.sin();
        }

        Self {
            category: category.to_string(),
            nodes,
            links,
        }
    }

    /// Build and lay out in one go
    pub fn layout(category: &str, items: &[VocabularyItem], config: &GraphConfig) -> Self {
        let mut graph = Self::for_category(category, items);
        Simulation::new(&graph, config).run(&mut graph, config.ticks);
        graph
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    pub fn words(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Word)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Word under a world-space point; the hub is not selectable
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .filter_map(|node| {
                let d2 = (node.x - x).powi(2) + (node.y - y).powi(2);
                (d2 <= node.radius().powi(2)).then_some((node, d2))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node)
            .filter(|node| node.kind == NodeKind::Word)
    }

    pub fn to_svg(&self, viewport: &Viewport, context: &HighlightContext<'_>) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
            viewport.width, viewport.height
        );
        let _ = writeln!(
            svg,
            r#"<g transform="translate({:.3},{:.3}) scale({:.5})">"#,
            viewport.tx, viewport.ty, viewport.scale
        );

        svg.push_str(r##"<g stroke="#999" stroke-opacity="0.4" stroke-width="2">"##);
        svg.push('\n');
        for link in &self.links {
            let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
            let _ = writeln!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
                s.x, s.y, t.x, t.y
            );
        }
        svg.push_str("</g>\n");

        for node in &self.nodes {
            let (font, dy) = match node.kind {
                NodeKind::Category => (400, 70),
                NodeKind::Word => (200, 7),
            };
            let _ = writeln!(
                svg,
                r#"<g transform="translate({:.2},{:.2})"><circle r="{}" fill="{}"/><text font-size="{font}" dy="{dy}" text-anchor="middle" font-weight="bold">{}</text></g>"#,
                node.x,
                node.y,
                node.radius(),
                context.highlight(node).color(),
                escape_xml(&node.label)
            );
        }

        svg.push_str("</g>\n</svg>\n");
        svg
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

struct Simulation {
    alpha: f64,
    alpha_decay: f64,
    center: (f64, f64),
    link_strength: Vec<f64>,
    link_bias: Vec<f64>,
    jiggles: u32,
}

impl Simulation {
    fn new(graph: &Graph, config: &GraphConfig) -> Self {
        let mut degree = vec![0usize; graph.nodes.len()];
        for link in &graph.links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }

        let link_strength = graph
            .links
            .iter()
            .map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f64)
            .collect();
        let link_bias = graph
            .links
            .iter()
            .map(|l| degree[l.source] as f64 / (degree[l.source] + degree[l.target]) as f64)
            .collect();

        Self {
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            center: (
                config.width / (2.0 * config.initial_scale),
                config.height / (2.0 * config.initial_scale),
            ),
            link_strength,
            link_bias,
            jiggles: 0,
        }
    }

    fn run(&mut self, graph: &mut Graph, ticks: usize) {
        for _ in 0..ticks {
            self.tick(graph);
        }
        tracing::debug!(
            "Laid out {} nodes for {} (alpha {:.4})",
            graph.nodes.len(),
            graph.category,
            self.alpha
        );
    }

    /// Tiny deterministic offset used when two points coincide
    fn jiggle(&mut self) -> f64 {
        self.jiggles += 1;
        f64::from(self.jiggles) * 1e-6
    }

    fn tick(&mut self, graph: &mut Graph) {
        self.alpha -= self.alpha * self.alpha_decay;

        self.apply_links(graph);
        self.apply_charge(graph);
        self.apply_center(graph);
        self.apply_collision(graph);

        for node in &mut graph.nodes {
            node.vx *= 1.0 - VELOCITY_DECAY;
            node.vy *= 1.0 - VELOCITY_DECAY;
            node.x += node.vx;
            node.y += node.vy;
        }
    }

    fn apply_links(&mut self, graph: &mut Graph) {
        for (i, link) in graph.links.iter().enumerate() {
            let (s, t) = (&graph.nodes[link.source], &graph.nodes[link.target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = self.jiggle();
            }
            if y == 0.0 {
                y = self.jiggle();
            }

            let l = (x * x + y * y).sqrt();
            let k = (l - LINK_DISTANCE) / l * self.alpha * self.link_strength[i];
            x *= k;
            y *= k;

            let bias = self.link_bias[i];
            let target = &mut graph.nodes[link.target];
            target.vx -= x * bias;
            target.vy -= y * bias;
            let source = &mut graph.nodes[link.source];
            source.vx += x * (1.0 - bias);
            source.vy += y * (1.0 - bias);
        }
    }

    fn apply_charge(&mut self, graph: &mut Graph) {
        let n = graph.nodes.len();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let strength = graph.nodes[j].charge();
                if strength == 0.0 {
                    continue;
                }

                let mut x = graph.nodes[j].x - graph.nodes[i].x;
                let mut y = graph.nodes[j].y - graph.nodes[i].y;
                if x == 0.0 {
                    x = self.jiggle();
                }
                if y == 0.0 {
                    y = self.jiggle();
                }

                let mut l2 = x * x + y * y;
                if l2 < 1.0 {
                    l2 = l2.sqrt();
                }
                let w = strength * self.alpha / l2;
                graph.nodes[i].vx += x * w;
                graph.nodes[i].vy += y * w;
            }
        }
    }

    fn apply_center(&self, graph: &mut Graph) {
        let n = graph.nodes.len() as f64;
        if n == 0.0 {
            return;
        }

        let (sx, sy) = graph
            .nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        let dx = sx / n - self.center.0;
        let dy = sy / n - self.center.1;
        for node in &mut graph.nodes {
            node.x -= dx;
            node.y -= dy;
        }
    }

    fn apply_collision(&mut self, graph: &mut Graph) {
        let n = graph.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (ri, rj) = (graph.nodes[i].collide_radius(), graph.nodes[j].collide_radius());
                let r = ri + rj;

                let mut x = (graph.nodes[i].x + graph.nodes[i].vx)
                    - (graph.nodes[j].x + graph.nodes[j].vx);
                let mut y = (graph.nodes[i].y + graph.nodes[i].vy)
                    - (graph.nodes[j].y + graph.nodes[j].vy);
                let mut l = x * x + y * y;
                if l >= r * r {
                    continue;
                }

                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }

                let l = l.sqrt();
                let k = (r - l) / l;
                x *= k;
                y *= k;

                let share = rj * rj / (ri * ri + rj * rj);
                graph.nodes[i].vx += x * share;
                graph.nodes[i].vy += y * share;
                graph.nodes[j].vx -= x * (1.0 - share);
                graph.nodes[j].vy -= y * (1.0 - share);
            }
        }
    }
}

/// Pan and zoom transform: `screen = world * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
    min_scale: f64,
    max_scale: f64,
}

impl Viewport {
    /// Initial zoom around the middle of the canvas
    pub fn new(config: &GraphConfig) -> Self {
        let scale = config.initial_scale.clamp(config.min_scale, config.max_scale);
        Self {
            width: config.width,
            height: config.height,
            scale,
            tx: config.width / 2.0 - scale * config.width / 2.0,
            ty: config.height / 2.0 - scale * config.height / 2.0,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }

    /// Shift by a drag delta in screen pixels
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.tx += dx;
        self.ty += dy;
    }

    /// Zoom by `factor` keeping the world point under `(px, py)` in place
    pub fn zoom_at(&mut self, factor: f64, px: f64, py: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let (wx, wy) = self.to_world(px, py);
        self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        self.tx = px - wx * self.scale;
        self.ty = py - wy * self.scale;
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.tx, y * self.scale + self.ty)
    }

    pub fn to_world(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.tx) / self.scale, (py - self.ty) / self.scale)
    }
}
