//! Deterministic placement of documents and memories plus the edges between them.

mod cache;
mod edges;
mod placement;
mod relax;

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::LayoutConfig;
use crate::model::{
    Document, GraphLayout, GraphNode, NodeKind, NodePayload, Point, SpaceFilter, palette,
};
use crate::overrides::PositionOverrides;

pub use self::cache::{LayoutCache, documents_key};
pub use self::edges::version_chain;

use self::edges::{doc_doc_edges, doc_memory_edge, version_edges};
use self::placement::{
    filter_documents, group_by_space, memory_position, memory_size, ring_position, space_center,
};
use self::relax::relax_positions;

#[derive(Clone, Copy, Debug)]
pub struct LayoutInput<'a> {
    pub documents: &'a [Arc<Document>],
    pub space: &'a SpaceFilter,
    pub overrides: &'a PositionOverrides,
    pub dragging_node_id: Option<&'a str>,
}

impl Hash for LayoutInput<'_> {
    /// Hashes everything except the documents, which callers key separately.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.space.hash(state);
        self.overrides.hash(state);
        self.dragging_node_id.hash(state);
    }
}

#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn compute(&self, input: &LayoutInput<'_>) -> GraphLayout {
        let config = &self.config;
        let filtered = filter_documents(input.documents, input.space, config.memory_limit);
        if filtered.is_empty() {
            tracing::debug!(documents = input.documents.len(), "layout is empty");
            return GraphLayout::default();
        }

        let mut document_positions = vec![Point::ORIGIN; filtered.len()];
        let groups = group_by_space(&filtered);
        for (space_index, group) in groups.iter().enumerate() {
            let center = space_center(config, space_index, groups.len());
            for (slot, &index) in group.iter().enumerate() {
                let id = filtered[index].document.id.as_str();
                document_positions[index] = input
                    .overrides
                    .get(id)
                    .unwrap_or_else(|| ring_position(config, center, slot));
            }

            let mut positions: Vec<Point> =
                group.iter().map(|&index| document_positions[index]).collect();
            let pinned: Vec<bool> = group
                .iter()
                .map(|&index| input.overrides.contains(&filtered[index].document.id))
                .collect();
            relax_positions(
                &mut positions,
                &pinned,
                config.min_document_distance,
                config.relaxation_passes,
            );
            for (&index, position) in group.iter().zip(positions) {
                document_positions[index] = position;
            }
        }

        let is_dragging = |id: &str| input.dragging_node_id == Some(id);
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        for (entry, &position) in filtered.iter().zip(&document_positions) {
            let document = entry.document;
            nodes.push(GraphNode {
                id: document.id.clone(),
                kind: NodeKind::Document,
                x: position.x,
                y: position.y,
                size: config.document_node_size,
                color: palette::DOCUMENT_FILL,
                is_hovered: false,
                is_dragging: is_dragging(document.id.as_str()),
                data: NodePayload::Document(Arc::clone(document)),
            });
        }

        let mut emitted: HashSet<&str> = HashSet::new();
        for (entry, &anchor) in filtered.iter().zip(&document_positions) {
            let document_id = entry.document.id.as_str();
            let count = entry.memories.len();
            let mut seen: HashSet<&str> = HashSet::new();

            for (index, memory) in entry.memories.iter().enumerate() {
                if !seen.insert(memory.id.as_str()) {
                    continue;
                }
                let position = input.overrides.get(&memory.id).unwrap_or_else(|| {
                    memory_position(config, document_id, anchor, index, count)
                });
                let color = if memory.is_forgotten {
                    palette::FORGOTTEN_FILL
                } else {
                    palette::MEMORY_FILL
                };

                nodes.push(GraphNode {
                    id: memory.id.clone(),
                    kind: NodeKind::Memory,
                    x: position.x,
                    y: position.y,
                    size: memory_size(config, memory),
                    color,
                    is_hovered: false,
                    is_dragging: is_dragging(memory.id.as_str()),
                    data: NodePayload::Memory {
                        entry: (*memory).clone(),
                        document_id: document_id.to_owned(),
                    },
                });
                edges.push(doc_memory_edge(document_id, memory));
                emitted.insert(memory.id.as_str());
            }
        }

        edges.extend(version_edges(
            input.documents.iter().map(|document| document.as_ref()),
            &emitted,
        ));
        edges.extend(doc_doc_edges(config, &filtered));

        tracing::debug!(
            documents = filtered.len(),
            spaces = groups.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            "computed layout"
        );

        GraphLayout { nodes, edges }
    }
}
