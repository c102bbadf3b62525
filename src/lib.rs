//! Headless engine for the memory graph: layout of documents and their memories,
//! camera control, node interaction and popover placement.

pub mod config;
pub mod engine;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod overrides;
pub mod popover;
pub mod search;
pub mod similarity;
pub mod util;
pub mod viewport;

pub use config::{EngineConfig, GraphVariant, LayoutConfig, ViewportConfig};
pub use engine::MemoryGraph;
pub use model::{Document, GraphEdge, GraphLayout, GraphNode, MemoryEntry, SpaceFilter};
