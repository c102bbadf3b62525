use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::Document;

pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read documents from {}", path.display()))?;
    parse_documents(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Accepts either a bare array of documents or a `{ "documents": [...] }` response body.
/// Individual documents that fail to deserialize are skipped.
pub fn parse_documents(raw: &str) -> Result<Vec<Document>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in documents payload")?;

    let entries = match parsed {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("documents") {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(anyhow!("`documents` must be an array")),
            None => return Err(anyhow!("missing `documents` array in response object")),
        },
        _ => return Err(anyhow!("unexpected JSON type for documents payload")),
    };

    let total = entries.len();
    let mut documents = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
        match Document::deserialize(entry) {
            Ok(document) => documents.push(document),
            Err(error) => tracing::warn!(index, %error, "skipping malformed document"),
        }
    }

    if total > 0 && documents.is_empty() {
        return Err(anyhow!("none of the {total} documents could be parsed"));
    }

    tracing::debug!(parsed = documents.len(), total, "loaded documents");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_response_object() {
        let raw = r#"{
            "documents": [{
                "id": "doc-1",
                "title": "Notes",
                "summaryEmbedding": [0.6, 0.8],
                "memoryEntries": [
                    {"id": "m1", "memory": "first", "spaceId": "s1"},
                    {"id": "m2", "memory": "second", "spaceContainerTag": "tag", "parentMemoryId": "m1"}
                ]
            }],
            "pagination": {"currentPage": 1}
        }"#;
        let documents = parse_documents(raw).unwrap();
        assert_eq!(documents.len(), 1);
        let document = &documents[0];
        assert_eq!(document.display_title(), "Notes");
        assert_eq!(document.embedding(), Some(&[0.6, 0.8][..]));
        assert_eq!(document.memory_entries[0].space(), "s1");
        assert_eq!(document.memory_entries[1].space(), "tag");
        assert_eq!(document.memory_entries[1].parent_memory_id.as_deref(), Some("m1"));
    }

    #[test]
    fn skips_malformed_documents() {
        let raw = r#"[{"id": "ok", "memoryEntries": []}, {"title": "missing id"}]"#;
        let documents = parse_documents(raw).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "ok");
    }

    #[test]
    fn rejects_payload_without_documents() {
        assert!(parse_documents(r#"{"items": []}"#).is_err());
        assert!(parse_documents("42").is_err());
        assert!(parse_documents(r#"[{"nope": true}]"#).is_err());
        assert!(parse_documents("[]").unwrap().is_empty());
    }
}
