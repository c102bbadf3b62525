use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_SPACE: &str = "default";

/// Content length assumed for memories without text when sizing nodes.
pub const FALLBACK_CONTENT_LEN: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryRelation {
    Updates,
    Extends,
    Derives,
}

impl MemoryRelation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Updates => "updates",
            Self::Extends => "extends",
            Self::Derives => "derives",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationLink {
    pub target_memory_id: String,
    pub relation_type: MemoryRelation,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEntry {
    pub id: String,
    #[serde(default)]
    pub memory: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub space_container_tag: Option<String>,
    #[serde(default)]
    pub parent_memory_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_relations")]
    pub memory_relations: Vec<RelationLink>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub is_forgotten: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl MemoryEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            memory: None,
            space_id: None,
            space_container_tag: None,
            parent_memory_id: None,
            memory_relations: Vec::new(),
            version: default_version(),
            is_forgotten: false,
            created_at: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.memory = Some(content.into());
        self
    }

    pub fn in_space(mut self, space: impl Into<String>) -> Self {
        self.space_container_tag = Some(space.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_memory_id = Some(parent_id.into());
        self
    }

    pub fn with_relation(mut self, target_id: impl Into<String>, relation: MemoryRelation) -> Self {
        self.memory_relations.push(RelationLink {
            target_memory_id: target_id.into(),
            relation_type: relation,
        });
        self
    }

    /// Container tag wins over the raw space id; untagged memories share one bucket.
    pub fn space(&self) -> &str {
        self.space_container_tag
            .as_deref()
            .or(self.space_id.as_deref())
            .unwrap_or(DEFAULT_SPACE)
    }

    /// Length in UTF-16 code units.
    pub fn content_len(&self) -> usize {
        match self.memory.as_deref() {
            Some(text) if !text.is_empty() => text.encode_utf16().count(),
            _ => FALLBACK_CONTENT_LEN,
        }
    }

    /// Parent links keyed by parent memory id. An explicit relation list wins over the
    /// legacy single-parent field, which always means `updates`.
    pub fn parent_relations(&self) -> Vec<(&str, MemoryRelation)> {
        if !self.memory_relations.is_empty() {
            let mut relations: Vec<(&str, MemoryRelation)> = Vec::new();
            for link in &self.memory_relations {
                if let Some(existing) = relations
                    .iter_mut()
                    .find(|(target, _)| *target == link.target_memory_id)
                {
                    existing.1 = link.relation_type;
                } else {
                    relations.push((link.target_memory_id.as_str(), link.relation_type));
                }
            }
            return relations;
        }

        self.parent_memory_id
            .as_deref()
            .map(|parent| vec![(parent, MemoryRelation::Updates)])
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub summary_embedding: Option<Vec<f64>>,
    #[serde(default)]
    pub memory_entries: Vec<MemoryEntry>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            custom_id: None,
            title: None,
            summary: None,
            url: None,
            summary_embedding: None,
            memory_entries: Vec::new(),
            created_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f64>) -> Self {
        self.summary_embedding = Some(embedding);
        self
    }

    pub fn with_memory(mut self, memory: MemoryEntry) -> Self {
        self.memory_entries.push(memory);
        self
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or("Untitled Document")
    }

    pub fn embedding(&self) -> Option<&[f64]> {
        self.summary_embedding.as_deref()
    }
}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.custom_id.hash(state);
        self.title.hash(state);
        self.summary.hash(state);
        self.url.hash(state);
        match &self.summary_embedding {
            Some(values) => {
                state.write_usize(values.len());
                for value in values {
                    state.write_u64(value.to_bits());
                }
            }
            None => state.write_u8(0),
        }
        self.memory_entries.hash(state);
        self.created_at.hash(state);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelations {
    List(Vec<RelationLink>),
    Map(BTreeMap<String, MemoryRelation>),
}

fn deserialize_relations<'de, D>(deserializer: D) -> Result<Vec<RelationLink>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(relations_from_value).unwrap_or_default())
}

fn relations_from_value(value: Value) -> Vec<RelationLink> {
    match serde_json::from_value::<RawRelations>(value) {
        Ok(RawRelations::List(links)) => links,
        Ok(RawRelations::Map(map)) => map
            .into_iter()
            .map(|(target_memory_id, relation_type)| RelationLink {
                target_memory_id,
                relation_type,
            })
            .collect(),
        Err(error) => {
            tracing::warn!(%error, "ignoring malformed memoryRelations");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_prefers_container_tag() {
        let mut memory = MemoryEntry::new("m1");
        assert_eq!(memory.space(), DEFAULT_SPACE);
        memory.space_id = Some("raw".into());
        assert_eq!(memory.space(), "raw");
        memory.space_container_tag = Some("tagged".into());
        assert_eq!(memory.space(), "tagged");
    }

    #[test]
    fn empty_content_uses_fallback_length() {
        assert_eq!(MemoryEntry::new("m").content_len(), FALLBACK_CONTENT_LEN);
        assert_eq!(MemoryEntry::new("m").with_content("").content_len(), FALLBACK_CONTENT_LEN);
        assert_eq!(MemoryEntry::new("m").with_content("abcd").content_len(), 4);
    }

    #[test]
    fn relation_list_overrides_legacy_parent() {
        let memory = MemoryEntry::new("m2")
            .with_parent("m0")
            .with_relation("m1", MemoryRelation::Extends);
        assert_eq!(memory.parent_relations(), vec![("m1", MemoryRelation::Extends)]);

        let legacy = MemoryEntry::new("m2").with_parent("m0");
        assert_eq!(legacy.parent_relations(), vec![("m0", MemoryRelation::Updates)]);
    }

    #[test]
    fn duplicate_relation_targets_keep_last_type() {
        let memory = MemoryEntry::new("m2")
            .with_relation("m1", MemoryRelation::Extends)
            .with_relation("m1", MemoryRelation::Derives);
        assert_eq!(memory.parent_relations(), vec![("m1", MemoryRelation::Derives)]);
    }

    #[test]
    fn relations_accept_object_and_list_forms() {
        let from_map: MemoryEntry = serde_json::from_str(
            r#"{"id":"m","memoryRelations":{"p1":"derives","p0":"updates"}}"#,
        )
        .unwrap();
        assert_eq!(from_map.memory_relations.len(), 2);
        assert_eq!(from_map.memory_relations[0].target_memory_id, "p0");

        let from_list: MemoryEntry = serde_json::from_str(
            r#"{"id":"m","memoryRelations":[{"targetMemoryId":"p","relationType":"extends"}]}"#,
        )
        .unwrap();
        assert_eq!(
            from_list.memory_relations[0].relation_type,
            MemoryRelation::Extends
        );
    }

    #[test]
    fn unknown_relation_type_degrades_to_no_relations() {
        let memory: MemoryEntry =
            serde_json::from_str(r#"{"id":"m","memoryRelations":{"p":"replaces"}}"#).unwrap();
        assert!(memory.memory_relations.is_empty());

        let nulled: MemoryEntry =
            serde_json::from_str(r#"{"id":"m","memoryRelations":null}"#).unwrap();
        assert!(nulled.memory_relations.is_empty());
    }
}
