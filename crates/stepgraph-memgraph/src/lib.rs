//! In-memory reference engine for stepgraph.
//!
//! [`MemGraph`] implements [`stepgraph_steps::TraversalEngine`] over interned,
//! indexed vertices and edges; [`KeyMapper`] implements
//! [`stepgraph_steps::EntityMapper`] for any [`KeyedEntity`]. Together they let
//! bound steps run end to end without an external database.

pub mod error;
pub mod graph;
pub mod interner;
pub mod mapper;

pub use error::{MemGraphError, MemGraphResult};
pub use graph::{MemGraph, VertexId};
pub use interner::{LabelId, LabelInterner};
pub use mapper::{KeyMapper, KeyedEntity};
