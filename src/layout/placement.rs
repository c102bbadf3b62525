use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::Arc;

use crate::config::LayoutConfig;
use crate::model::{DEFAULT_SPACE, Document, MemoryEntry, Point, SpaceFilter};
use crate::util::base36_prefix;

/// A document with only the memories that survive the space filter.
pub(super) struct FilteredDocument<'a> {
    pub document: &'a Arc<Document>,
    pub memories: Vec<&'a MemoryEntry>,
}

impl FilteredDocument<'_> {
    pub fn space(&self) -> &str {
        self.memories
            .first()
            .map(|memory| memory.space())
            .unwrap_or(DEFAULT_SPACE)
    }
}

pub(super) fn filter_documents<'a>(
    documents: &'a [Arc<Document>],
    space: &SpaceFilter,
    memory_limit: Option<usize>,
) -> Vec<FilteredDocument<'a>> {
    documents
        .iter()
        .filter_map(|document| {
            let mut memories: Vec<&MemoryEntry> = document
                .memory_entries
                .iter()
                .filter(|memory| space.matches(memory.space()))
                .collect();

            if !space.is_all()
                && let Some(limit) = memory_limit.filter(|limit| *limit > 0)
            {
                memories.truncate(limit);
            }

            (!memories.is_empty()).then_some(FilteredDocument { document, memories })
        })
        .collect()
}

/// Groups documents by space, keeping first-seen order for both spaces and documents.
pub(super) fn group_by_space(documents: &[FilteredDocument<'_>]) -> Vec<Vec<usize>> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (index, document) in documents.iter().enumerate() {
        let slot = *slots.entry(document.space()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(index);
    }

    groups
}

pub(super) fn space_center(config: &LayoutConfig, space_index: usize, space_count: usize) -> Point {
    let angle = space_index as f64 / space_count.max(1) as f64 * TAU;
    Point::new(
        config.center_x + angle.cos() * config.space_spacing,
        config.center_y + angle.sin() * config.space_spacing,
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct RingSlot {
    pub ring: usize,
    pub position: usize,
    pub capacity: usize,
}

pub(super) fn ring_slot(config: &LayoutConfig, index: usize) -> RingSlot {
    let inner = config.inner_ring_capacity.max(1);
    let mut ring = 0;
    let mut capacity = inner;
    let mut before = 0;

    while before + capacity <= index {
        before += capacity;
        ring += 1;
        capacity = inner + ring * config.ring_capacity_growth;
    }

    RingSlot {
        ring,
        position: index - before,
        capacity,
    }
}

pub(super) fn ring_position(config: &LayoutConfig, center: Point, index: usize) -> Point {
    let slot = ring_slot(config, index);
    let angle = slot.position as f64 / slot.capacity as f64 * TAU;
    let base = config.document_spacing * config.inner_ring_factor;
    let radius = base + slot.ring as f64 * config.document_spacing * config.ring_step_factor;

    Point::new(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
}

/// Organic but reproducible spot for the `index`-th of `count` memories around a document.
pub(super) fn memory_position(
    config: &LayoutConfig,
    document_id: &str,
    document_position: Point,
    index: usize,
    count: usize,
) -> Point {
    let angle = index as f64 / count.max(1) as f64 * TAU;
    let variation = (index as f64 * 2.5).sin() * 0.3 + 0.7;
    let distance = config.cluster_radius * variation;

    let (offset_x, offset_y) = match base36_prefix(document_id) {
        Some(prefix) => {
            let seed = index as f64 * 12345.0 + prefix as f64;
            let jitter = config.memory_scatter_jitter * 0.5;
            (seed.sin() * jitter, seed.cos() * jitter)
        }
        None => (0.0, 0.0),
    };

    Point::new(
        document_position.x + angle.cos() * distance + offset_x,
        document_position.y + angle.sin() * distance + offset_y,
    )
}

pub(super) fn memory_size(config: &LayoutConfig, memory: &MemoryEntry) -> f64 {
    (memory.content_len() as f64 * 0.5).clamp(config.memory_node_min_size, config.memory_node_max_size)
}
