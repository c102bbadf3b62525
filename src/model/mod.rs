mod color;
mod geometry;
mod graph;
mod parse;
mod record;
mod space;

pub use color::{Color, palette};
pub use geometry::{Point, WorldBounds};
pub use graph::{EdgeType, GraphEdge, GraphLayout, GraphNode, NodeKind, NodePayload, VisualProps};
pub use parse::{load_documents, parse_documents};
pub use record::{DEFAULT_SPACE, Document, MemoryEntry, MemoryRelation, RelationLink};
pub use space::{ALL_SPACES, SpaceFilter, SpaceSummary, collect_spaces};
