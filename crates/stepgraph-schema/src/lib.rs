//! Schema layer for stepgraph.
//!
//! Entities declare their members and the roles those members hold
//! ([`Role::Id`], [`Role::FromVertex`], [`Role::ToVertex`], [`Role::Property`]).
//! The [`SchemaRegistry`] validates each entity once, at registration, and
//! refuses ambiguous metadata such as two members both claiming the
//! from-vertex endpoint. Schemas can be built programmatically or parsed from
//! a declaration file ([`parse_schema_decl`]).

pub mod config;
pub mod decl;
pub mod entity;
pub mod error;
pub mod registry;
pub mod validate;

pub use config::{LabelStyle, RegistryConfig};
pub use decl::{format_schema_decl, parse_schema_decl, SchemaDecl};
pub use entity::{EntityDescriptor, EntityKind, MemberDecl, MemberKind, MemberRef, Role};
pub use error::{FormatError, ParseError, SchemaError, SchemaResult};
pub use registry::{Schema, SchemaRegistry};
pub use validate::{validate_entity, ValidatedEntity};
