use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::model::{Document, EdgeType, GraphEdge, MemoryEntry, VisualProps, palette};
use crate::similarity::{connection_color, connection_visual_props, semantic_similarity};

use super::placement::FilteredDocument;

const VERSION_VISUALS: VisualProps = VisualProps {
    opacity: 0.8,
    thickness: 1.0,
    glow: 0.0,
    pulse_duration: 3000.0,
};

pub(super) fn doc_memory_edge(document_id: &str, memory: &MemoryEntry) -> GraphEdge {
    GraphEdge {
        id: format!("edge-{document_id}-{}", memory.id),
        source: document_id.to_owned(),
        target: memory.id.clone(),
        similarity: 1.0,
        edge_type: EdgeType::DocMemory,
        relation_type: None,
        visual_props: connection_visual_props(1.0),
        color: palette::DOC_MEMORY_EDGE,
    }
}

/// Parent → child edges for every memory in the full document set whose both ends were
/// emitted as nodes.
pub(super) fn version_edges<'a, I>(documents: I, emitted: &HashSet<&str>) -> Vec<GraphEdge>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut edges = Vec::new();
    for document in documents {
        for memory in &document.memory_entries {
            if !emitted.contains(memory.id.as_str()) {
                continue;
            }
            for (parent_id, relation) in memory.parent_relations() {
                if !emitted.contains(parent_id) {
                    continue;
                }
                edges.push(GraphEdge {
                    id: format!("version-{parent_id}-{}", memory.id),
                    source: parent_id.to_owned(),
                    target: memory.id.clone(),
                    similarity: 1.0,
                    edge_type: EdgeType::Version,
                    relation_type: Some(relation),
                    visual_props: VERSION_VISUALS,
                    color: palette::relation(relation),
                });
            }
        }
    }
    edges
}

pub(super) fn doc_doc_edges(config: &LayoutConfig, documents: &[FilteredDocument<'_>]) -> Vec<GraphEdge> {
    let compared = match config.max_similarity_documents {
        Some(limit) => &documents[..documents.len().min(limit)],
        None => documents,
    };

    let mut edges = Vec::new();
    for (i, left) in compared.iter().enumerate() {
        for right in &compared[i + 1..] {
            let similarity =
                semantic_similarity(left.document.embedding(), right.document.embedding());
            if similarity <= config.similarity_threshold {
                continue;
            }

            let (source, target) = (&left.document.id, &right.document.id);
            edges.push(GraphEdge {
                id: format!("doc-doc-{source}-{target}"),
                source: source.clone(),
                target: target.clone(),
                similarity,
                edge_type: EdgeType::DocDoc,
                relation_type: None,
                visual_props: connection_visual_props(similarity),
                color: connection_color(similarity, config.doc_doc_hue),
            });
        }
    }
    edges
}

/// Memory ids along the version chain through `memory_id`, oldest first. Branches follow
/// the first edge in layout order.
pub fn version_chain(edges: &[GraphEdge], memory_id: &str) -> Vec<String> {
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut children: HashMap<&str, &str> = HashMap::new();
    for edge in edges.iter().filter(|edge| edge.edge_type == EdgeType::Version) {
        parents.entry(edge.target.as_str()).or_insert(edge.source.as_str());
        children.entry(edge.source.as_str()).or_insert(edge.target.as_str());
    }

    if !parents.contains_key(memory_id) && !children.contains_key(memory_id) {
        return Vec::new();
    }

    let mut visited: HashSet<&str> = HashSet::from([memory_id]);
    let mut ancestors = Vec::new();
    let mut cursor = memory_id;
    while let Some(&parent) = parents.get(cursor) {
        if !visited.insert(parent) {
            break;
        }
        ancestors.push(parent);
        cursor = parent;
    }

    let mut chain: Vec<String> = ancestors.iter().rev().map(|id| (*id).to_owned()).collect();
    chain.push(memory_id.to_owned());

    cursor = memory_id;
    while let Some(&child) = children.get(cursor) {
        if !visited.insert(child) {
            break;
        }
        chain.push(child.to_owned());
        cursor = child;
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, MemoryRelation};

    fn version(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            id: format!("version-{source}-{target}"),
            source: source.into(),
            target: target.into(),
            similarity: 1.0,
            edge_type: EdgeType::Version,
            relation_type: Some(MemoryRelation::Updates),
            visual_props: VERSION_VISUALS,
            color: Color::rgba(0, 0, 0, 1.0),
        }
    }

    #[test]
    fn chain_runs_oldest_to_newest() {
        let edges = [version("a", "b"), version("b", "c"), version("c", "d")];
        assert_eq!(version_chain(&edges, "c"), ["a", "b", "c", "d"]);
        assert_eq!(version_chain(&edges, "a"), ["a", "b", "c", "d"]);
        assert!(version_chain(&edges, "z").is_empty());
    }

    #[test]
    fn chain_survives_cycles() {
        let edges = [version("a", "b"), version("b", "a")];
        assert_eq!(version_chain(&edges, "a"), ["b", "a"]);
    }

    #[test]
    fn version_edges_need_both_nodes() {
        let document = Document::new("d")
            .with_memory(MemoryEntry::new("m1"))
            .with_memory(MemoryEntry::new("m2").with_parent("m1"))
            .with_memory(MemoryEntry::new("m3").with_relation("gone", MemoryRelation::Derives));
        let emitted: HashSet<&str> = ["m1", "m2", "m3"].into_iter().collect();

        let edges = version_edges([&document], &emitted);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "version-m1-m2");
        assert_eq!(edges[0].relation_type, Some(MemoryRelation::Updates));
        assert_eq!(edges[0].color, palette::relation(MemoryRelation::Updates));
    }
}
