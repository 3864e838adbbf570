use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use escapefield_core::{Precision, Region, Strategy};

use crate::navigation::NavEvent;

/// Everything a headless run needs. Every field has a default, so a partial
/// (or absent) file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_region")]
    pub region: Region<f64>,
    #[serde(default = "default_n_iterations")]
    pub n_iterations: u32,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub strategy: Strategy,
    /// Initial pan distance per event, in complex-plane units.
    #[serde(default = "default_step")]
    pub pan_step: f64,
    /// Relative zoom per event: zoom in multiplies by `1 - zoom_step`.
    #[serde(default = "default_step")]
    pub zoom_step: f64,
    /// Intensity written for samples that never escaped.
    #[serde(default)]
    pub not_escaped_intensity: f32,
    #[serde(default = "default_palette_colors")]
    pub palette_colors: u32,
    #[serde(default)]
    pub not_escaped_index: u32,
    /// Scripted input, replayed one event per frame after the first frame.
    #[serde(default)]
    pub events: Vec<NavEvent>,
}

fn default_width() -> usize {
    1280
}
fn default_height() -> usize {
    720
}
fn default_region() -> Region<f64> {
    Region {
        real_min: -2.5,
        real_max: 1.0,
        imag_min: -1.1,
        imag_max: 1.1,
    }
}
fn default_n_iterations() -> u32 {
    1000
}
fn default_threshold() -> f64 {
    6.0
}
fn default_step() -> f64 {
    0.05
}
fn default_palette_colors() -> u32 {
    256
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            region: default_region(),
            n_iterations: default_n_iterations(),
            threshold: default_threshold(),
            precision: Precision::default(),
            strategy: Strategy::default(),
            pan_step: default_step(),
            zoom_step: default_step(),
            not_escaped_intensity: 0.0,
            palette_colors: default_palette_colors(),
            not_escaped_index: 0,
            events: Vec::new(),
        }
    }
}

impl FieldConfig {
    /// Load a configuration file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No configuration file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    error!("Failed to parse configuration: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file: {e}");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

pub fn default_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("escapefield.json")
}
