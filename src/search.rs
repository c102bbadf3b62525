use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::model::{GraphNode, NodePayload};

#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub node_id: String,
    pub label: String,
    pub score: i64,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn searchable_text(node: &GraphNode) -> [Option<&str>; 3] {
    match &node.data {
        NodePayload::Document(document) => [
            Some(document.display_title()),
            document.summary.as_deref(),
            Some(node.id.as_str()),
        ],
        NodePayload::Memory { entry, .. } => {
            [entry.memory.as_deref(), Some(node.id.as_str()), None]
        }
    }
}

/// Best `limit` nodes for `query`, matching titles, summaries, memory text and ids.
pub fn find_nodes(nodes: &[GraphNode], query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut hits: Vec<SearchHit> = nodes
        .iter()
        .filter_map(|node| {
            let score = searchable_text(node)
                .into_iter()
                .flatten()
                .filter_map(|text| fuzzy_match_score(&matcher, text, query))
                .max()?;
            Some(SearchHit {
                node_id: node.id.clone(),
                label: node.label().to_owned(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.node_id.cmp(&b.node_id)));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Document, MemoryEntry, NodeKind, palette};

    fn document_node(id: &str, title: &str) -> GraphNode {
        GraphNode {
            id: id.into(),
            kind: NodeKind::Document,
            x: 0.0,
            y: 0.0,
            size: 58.0,
            color: palette::DOCUMENT_FILL,
            is_hovered: false,
            is_dragging: false,
            data: NodePayload::Document(Arc::new(Document::new(id).with_title(title))),
        }
    }

    fn memory_node(id: &str, text: &str) -> GraphNode {
        GraphNode {
            id: id.into(),
            kind: NodeKind::Memory,
            x: 0.0,
            y: 0.0,
            size: 32.0,
            color: palette::MEMORY_FILL,
            is_hovered: false,
            is_dragging: false,
            data: NodePayload::Memory {
                entry: MemoryEntry::new(id).with_content(text),
                document_id: "d".into(),
            },
        }
    }

    #[test]
    fn matches_titles_and_memory_text() {
        let nodes = [
            document_node("d1", "Rust ownership notes"),
            memory_node("m1", "borrow checker rules"),
            document_node("d2", "Gardening"),
        ];
        let hits = find_nodes(&nodes, "ownr", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node_id, "d1");

        let hits = find_nodes(&nodes, "BORROW", 10);
        assert_eq!(hits[0].node_id, "m1");
        assert_eq!(hits[0].label, "borrow checker rules");
    }

    #[test]
    fn blank_query_finds_nothing() {
        let nodes = [document_node("d1", "Anything")];
        assert!(find_nodes(&nodes, "   ", 10).is_empty());
        assert!(find_nodes(&nodes, "any", 0).is_empty());
    }
}
