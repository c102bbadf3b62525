use std::sync::Arc;

use serde::Serialize;

use super::{Color, Document, MemoryEntry, MemoryRelation, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Document,
    Memory,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodePayload {
    Document(Arc<Document>),
    Memory {
        entry: MemoryEntry,
        #[serde(rename = "documentId")]
        document_id: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    /// World-space radius.
    pub size: f64,
    pub color: Color,
    pub is_hovered: bool,
    pub is_dragging: bool,
    pub data: NodePayload,
}

impl GraphNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn label(&self) -> &str {
        match &self.data {
            NodePayload::Document(document) => document.display_title(),
            NodePayload::Memory { entry, .. } => entry.memory.as_deref().unwrap_or(&entry.id),
        }
    }

    pub fn document_id(&self) -> &str {
        match &self.data {
            NodePayload::Document(document) => &document.id,
            NodePayload::Memory { document_id, .. } => document_id,
        }
    }

    pub fn memory(&self) -> Option<&MemoryEntry> {
        match &self.data {
            NodePayload::Memory { entry, .. } => Some(entry),
            NodePayload::Document(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeType {
    #[serde(rename = "doc-memory")]
    DocMemory,
    #[serde(rename = "doc-doc")]
    DocDoc,
    #[serde(rename = "version")]
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualProps {
    pub opacity: f64,
    pub thickness: f64,
    pub glow: f64,
    pub pulse_duration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub similarity: f64,
    pub edge_type: EdgeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<MemoryRelation>,
    pub visual_props: VisualProps,
    pub color: Color,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphLayout {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.edge_type == edge_type)
    }
}
