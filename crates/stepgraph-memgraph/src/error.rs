//! Errors raised by the in-memory graph and its entity mapper.

use thiserror::Error;

use crate::graph::VertexId;

pub type MemGraphResult<T> = Result<T, MemGraphError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemGraphError {
    #[error("unknown vertex id {0}")]
    UnknownVertex(VertexId),

    #[error("graph is full: no more {0} fit in u32 ids")]
    Capacity(&'static str),

    #[error("no `{label}` vertex with key `{key}`")]
    UnknownKey { label: String, key: String },

    #[error("vertex {id} is a `{found}`, expected a `{expected}`")]
    LabelMismatch {
        id: VertexId,
        expected: String,
        found: String,
    },

    #[error("cannot build a `{label}` from key `{key}`")]
    Decode { label: String, key: String },
}
