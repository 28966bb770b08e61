//! Registration, declaration-file parse and format errors.

use std::path::PathBuf;

use thiserror::Error;

use stepgraph_steps::{EdgeDescriptor, StepError};

use crate::config::LabelStyle;
use crate::entity::{MemberRef, Role};

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Registration-time errors. Always fatal for the offending declaration; the
/// registry is left as it was before the failing call.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(
        "only one {} may be annotated with {role} in `{entity}`; found `{}` and `{}`",
        .first.kind,
        .first.display_name(),
        .second.display_name()
    )]
    DuplicateRole {
        entity: String,
        role: Role,
        first: MemberRef,
        second: MemberRef,
    },

    /// Same as `DuplicateRole`, but the two members are of different kinds.
    #[error(
        "only one member may be annotated with {role} in `{entity}`; found {first} and {second}"
    )]
    ConflictingRole {
        entity: String,
        role: Role,
        first: MemberRef,
        second: MemberRef,
    },

    #[error("relationship `{entity}` has no member annotated with {role}")]
    MissingRole { entity: String, role: Role },

    #[error("{member} of vertex `{entity}` may not be annotated with {role}")]
    RoleNotAllowed {
        entity: String,
        role: Role,
        member: MemberRef,
    },

    #[error("edge `{0}` is already registered")]
    DuplicateEdgeName(String),

    #[error("edge `{name}` is declared as `{declared}` but registered as `{registered}`")]
    EdgeMismatch {
        name: String,
        registered: EdgeDescriptor,
        declared: EdgeDescriptor,
    },

    #[error("relationship `{entity}` refers to unknown edge `{edge}`")]
    UnknownEdge { entity: String, edge: String },

    #[error("no edge `{0}` in this schema")]
    NoSuchEdge(String),

    #[error("edge `{edge}` connects `{declared}`; a step over `{requested}` was requested")]
    EndpointMismatch {
        edge: String,
        declared: String,
        requested: String,
    },

    #[error("edge `{edge}` refers to unknown vertex type `{vertex}`")]
    UnknownVertex { edge: String, vertex: String },

    #[error("entity `{0}` is already registered")]
    DuplicateEntity(String),

    #[error("edge `{edge}` already has relationship entity `{first}`; cannot also map `{second}`")]
    DuplicateRelationship {
        edge: String,
        first: String,
        second: String,
    },

    #[error("entity `{entity}` is not a relationship on edge `{edge}`")]
    NotARelationship { entity: String, edge: String },

    #[error("edge label `{label}` does not follow the `{style}` label style")]
    LabelStyle { label: String, style: LabelStyle },

    #[error("edge label `{0}` is reserved")]
    ReservedLabel(String),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error("invalid registry config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    /// Two members holding the same exclusive role.
    pub fn duplicate_role(entity: &str, role: Role, first: MemberRef, second: MemberRef) -> Self {
        let entity = entity.to_string();
        if first.kind == second.kind {
            Self::DuplicateRole {
                entity,
                role,
                first,
                second,
            }
        } else {
            Self::ConflictingRole {
                entity,
                role,
                first,
                second,
            }
        }
    }
}

/// Declaration-file syntax errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("parse error on line {line}: {message}")]
    Line { line: usize, message: String },
}

/// Declarations that have no text form in a declaration file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("{what} `{name}` is not an identifier")]
    NotAnIdentifier { what: &'static str, name: String },

    #[error("member name `_` in `{entity}` would read back as an unnamed member")]
    ReservedMemberName { entity: String },

    #[error("`{entity}` is listed with the {expected} declarations but is not one")]
    MisplacedEntity {
        entity: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Edge(#[from] StepError),
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::Line { line, .. } => *line,
        }
    }
}
