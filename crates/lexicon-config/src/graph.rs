use serde::{Deserialize, Serialize};

fn default_canvas() -> f64 {
    2000.0
}

fn default_initial_scale() -> f64 {
    0.3
}

fn default_min_scale() -> f64 {
    0.1
}

fn default_max_scale() -> f64 {
    10.0
}

fn default_ticks() -> usize {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    #[serde(default = "default_canvas")]
    pub width: f64,
    #[serde(default = "default_canvas")]
    pub height: f64,
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f64,
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,
    /// Simulation steps run before the layout is read
    #[serde(default = "default_ticks")]
    pub ticks: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: default_canvas(),
            height: default_canvas(),
            initial_scale: default_initial_scale(),
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            ticks: default_ticks(),
        }
    }
}
