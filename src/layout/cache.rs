use std::sync::Arc;

use crate::model::{Document, GraphLayout};
use crate::util::fingerprint;

use super::{LayoutEngine, LayoutInput};

pub fn documents_key(documents: &[Arc<Document>]) -> u64 {
    fingerprint(documents)
}

/// Remembers the last layout and hands back the same `Arc` while the inputs hash equal.
#[derive(Debug, Default)]
pub struct LayoutCache {
    key: Option<u64>,
    layout: Arc<GraphLayout>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        engine: &LayoutEngine,
        input: &LayoutInput<'_>,
        documents_key: u64,
    ) -> Arc<GraphLayout> {
        let key = fingerprint(&(documents_key, input, engine.config()));
        if self.key == Some(key) {
            tracing::trace!(key, "layout cache hit");
            return Arc::clone(&self.layout);
        }

        self.layout = Arc::new(engine.compute(input));
        self.key = Some(key);
        Arc::clone(&self.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemoryEntry, Point, SpaceFilter};
    use crate::overrides::PositionOverrides;

    #[test]
    fn equal_inputs_share_the_layout() {
        let documents = vec![Arc::new(Document::new("d").with_memory(MemoryEntry::new("m")))];
        let engine = LayoutEngine::default();
        let mut overrides = PositionOverrides::new();
        let mut cache = LayoutCache::new();
        let key = documents_key(&documents);

        let input = LayoutInput {
            documents: &documents,
            space: &SpaceFilter::All,
            overrides: &overrides,
            dragging_node_id: None,
        };
        let first = cache.get(&engine, &input, key);
        let second = cache.get(&engine, &input, key);
        assert!(Arc::ptr_eq(&first, &second));

        overrides.set("d", Point::new(1.0, 1.0));
        let input = LayoutInput {
            documents: &documents,
            space: &SpaceFilter::All,
            overrides: &overrides,
            dragging_node_id: None,
        };
        let third = cache.get(&engine, &input, key);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.node("d").unwrap().position(), Point::new(1.0, 1.0));
    }
}
