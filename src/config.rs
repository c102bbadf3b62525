use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GraphVariant {
    #[default]
    Console,
    Consumer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewPreset {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl GraphVariant {
    pub fn preset(self) -> ViewPreset {
        match self {
            Self::Console => ViewPreset {
                pan_x: 0.0,
                pan_y: 0.0,
                zoom: 0.8,
            },
            Self::Consumer => ViewPreset {
                pan_x: 400.0,
                pan_y: 300.0,
                zoom: 0.5,
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub variant: GraphVariant,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }
}

/// Tuned layout constants. Changing any of them moves every node users have seen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub cluster_radius: f64,
    pub space_spacing: f64,
    pub document_spacing: f64,
    pub min_document_distance: f64,
    pub inner_ring_capacity: usize,
    pub ring_capacity_growth: usize,
    pub inner_ring_factor: f64,
    pub ring_step_factor: f64,
    pub relaxation_passes: usize,
    pub similarity_threshold: f64,
    pub document_node_size: f64,
    pub memory_node_min_size: f64,
    pub memory_node_max_size: f64,
    pub memory_scatter_jitter: f64,
    pub doc_doc_hue: f64,
    pub max_similarity_documents: Option<usize>,
    pub memory_limit: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: 400.0,
            center_y: 300.0,
            cluster_radius: 300.0,
            space_spacing: 1600.0,
            document_spacing: 1000.0,
            min_document_distance: 900.0,
            inner_ring_capacity: 6,
            ring_capacity_growth: 4,
            inner_ring_factor: 0.8,
            ring_step_factor: 1.2,
            relaxation_passes: 2,
            similarity_threshold: 0.725,
            document_node_size: 58.0,
            memory_node_min_size: 32.0,
            memory_node_max_size: 48.0,
            memory_scatter_jitter: 40.0,
            doc_doc_hue: 200.0,
            max_similarity_documents: None,
            memory_limit: None,
        }
    }
}

impl Hash for LayoutConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in [
            self.center_x,
            self.center_y,
            self.cluster_radius,
            self.space_spacing,
            self.document_spacing,
            self.min_document_distance,
            self.inner_ring_factor,
            self.ring_step_factor,
            self.similarity_threshold,
            self.document_node_size,
            self.memory_node_min_size,
            self.memory_node_max_size,
            self.memory_scatter_jitter,
            self.doc_doc_hue,
        ] {
            state.write_u64(value.to_bits());
        }
        self.inner_ring_capacity.hash(state);
        self.ring_capacity_growth.hash(state);
        self.relaxation_passes.hash(state);
        self.max_similarity_documents.hash(state);
        self.memory_limit.hash(state);
    }
}

/// Durations are in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    pub horizontal_pan_factor: f64,
    pub zoom_in_step: f64,
    pub zoom_out_step: f64,
    pub double_click_step: f64,
    pub zoom_duration: f64,
    pub reset_duration: f64,
    pub center_duration: f64,
    pub fit_duration: f64,
    pub fit_steps: u32,
    pub fit_padding: f64,
    pub debounce: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            wheel_zoom_in: 1.03,
            wheel_zoom_out: 0.97,
            horizontal_pan_factor: 0.5,
            zoom_in_step: 1.2,
            zoom_out_step: 0.8,
            double_click_step: 1.5,
            zoom_duration: 200.0,
            reset_duration: 300.0,
            center_duration: 400.0,
            fit_duration: 160.0,
            fit_steps: 8,
            fit_padding: 1.4,
            debounce: 150.0,
        }
    }
}
