use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::Document;

pub const ALL_SPACES: &str = "all";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpaceFilter {
    #[default]
    All,
    Space(String),
}

impl SpaceFilter {
    pub fn matches(&self, space: &str) -> bool {
        match self {
            Self::All => true,
            Self::Space(selected) => selected == space,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl FromStr for SpaceFilter {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(if value == ALL_SPACES {
            Self::All
        } else {
            Self::Space(value.to_owned())
        })
    }
}

impl fmt::Display for SpaceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_SPACES),
            Self::Space(space) => f.write_str(space),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSummary {
    pub name: String,
    pub memory_count: usize,
}

/// Every space referenced by a memory, sorted by name, with how many memories it holds.
pub fn collect_spaces<'a, I>(documents: I) -> Vec<SpaceSummary>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for document in documents {
        for memory in &document.memory_entries {
            *counts.entry(memory.space()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(name, memory_count)| SpaceSummary {
            name: name.to_owned(),
            memory_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemoryEntry;

    #[test]
    fn parses_all_keyword() {
        assert_eq!("all".parse::<SpaceFilter>(), Ok(SpaceFilter::All));
        assert_eq!(
            "work".parse::<SpaceFilter>(),
            Ok(SpaceFilter::Space("work".into()))
        );
        assert_eq!(SpaceFilter::Space("work".into()).to_string(), "work");
    }

    #[test]
    fn counts_memories_per_space() {
        let documents = [
            Document::new("d1")
                .with_memory(MemoryEntry::new("a").in_space("work"))
                .with_memory(MemoryEntry::new("b")),
            Document::new("d2").with_memory(MemoryEntry::new("c").in_space("work")),
        ];
        let spaces = collect_spaces(&documents);
        assert_eq!(
            spaces,
            vec![
                SpaceSummary {
                    name: "default".into(),
                    memory_count: 1
                },
                SpaceSummary {
                    name: "work".into(),
                    memory_count: 2
                },
            ]
        );
    }
}
