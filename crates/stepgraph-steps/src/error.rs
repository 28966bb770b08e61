//! Error types for step declaration, result shaping and execution.

use thiserror::Error;

use crate::cardinality::CardinalityKind;

pub type StepResult<T> = Result<T, StepError>;

/// Definition-time errors for steps, edge names and edge descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("edge name must not be empty")]
    EmptyEdgeName,

    #[error("edge name `{name}` must not contain whitespace")]
    InvalidEdgeName { name: String },

    /// A step that may never be absent but has no upper bound would be
    /// `ToSingle` and `ToMany` at once.
    #[error(
        "inconsistent cardinality: a step that is never absent must yield at most one result \
         (to_single), but it was declared unbounded (to_many)"
    )]
    InconsistentCardinality,

    #[error("cannot use a `{declared}` step where a `{requested}` step is expected")]
    CardinalityMismatch {
        declared: CardinalityKind,
        requested: CardinalityKind,
    },

    #[error("symmetric edge `{name}` must connect a vertex type to itself, got `{from}` -> `{to}`")]
    AsymmetricEndpoints {
        name: String,
        from: String,
        to: String,
    },

    #[error("unknown edge variant `{0}`")]
    UnknownVariant(String),

    #[error("unknown cardinality `{0}`")]
    UnknownCardinality(String),
}

/// Raw traversal results that do not fit the cardinality a step advertised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a {expected} result but the traversal produced {actual} element(s)")]
pub struct ShapeError {
    pub expected: CardinalityKind,
    pub actual: usize,
}

impl ShapeError {
    pub fn new(expected: CardinalityKind, actual: usize) -> Self {
        Self { expected, actual }
    }
}

/// Failures while handing a bound step to the engine and mapping its results.
///
/// Engine and mapping failures are carried opaquely; this layer only adds the
/// `Shape` classification.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("traversal engine failed: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("entity mapping failed: {0}")]
    Mapping(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("engine returned {actual} result list(s) for {expected} origin(s)")]
    OriginCount { expected: usize, actual: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
