//! Entity metadata: members, the roles they are annotated with, and the kind
//! of entity (vertex or relationship) they belong to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use stepgraph_steps::EdgeName;

/// Where a member is declared on its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    ConstructorParameter,
    MemberProperty,
}

impl MemberKind {
    /// Keyword used in declaration files.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::ConstructorParameter => "param",
            Self::MemberProperty => "property",
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::ConstructorParameter => "constructor parameter",
            Self::MemberProperty => "member property",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl FromStr for MemberKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "param" => Ok(Self::ConstructorParameter),
            "property" => Ok(Self::MemberProperty),
            other => Err(format!("unknown member kind `{other}` (expected `param` or `property`)")),
        }
    }
}

/// The annotation a member carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Id,
    FromVertex,
    ToVertex,
    Property,
}

impl Role {
    pub const ALL: [Role; 4] = [Self::Id, Self::FromVertex, Self::ToVertex, Self::Property];

    /// At most one member per entity may hold an exclusive role.
    pub const fn is_exclusive(self) -> bool {
        !matches!(self, Self::Property)
    }

    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::FromVertex | Self::ToVertex)
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FromVertex => "from",
            Self::ToVertex => "to",
            Self::Property => "field",
        }
    }

    pub const fn annotation(self) -> &'static str {
        match self {
            Self::Id => "@ID",
            Self::FromVertex => "@FromVertex",
            Self::ToVertex => "@ToVertex",
            Self::Property => "@Property",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.keyword() == s)
            .ok_or_else(|| format!("unknown role `{s}` (expected `id`, `from`, `to` or `field`)"))
    }
}

/// One annotated member. `name` is `None` when the member's name is not
/// recoverable (e.g. an unnamed constructor parameter).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberDecl {
    pub name: Option<String>,
    pub kind: MemberKind,
    pub role: Role,
}

impl MemberDecl {
    pub fn param(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: Some(name.into()),
            kind: MemberKind::ConstructorParameter,
            role,
        }
    }

    pub fn property(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: Some(name.into()),
            kind: MemberKind::MemberProperty,
            role,
        }
    }

    pub fn unnamed(kind: MemberKind, role: Role) -> Self {
        Self {
            name: None,
            kind,
            role,
        }
    }

    pub fn member_ref(&self) -> MemberRef {
        MemberRef {
            kind: self.kind,
            name: self.name.clone(),
        }
    }
}

/// A member as named in diagnostics: `constructor parameter `a``.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub kind: MemberKind,
    pub name: Option<String>,
}

impl MemberRef {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} `{name}`", self.kind),
            None => write!(f, "unnamed {}", self.kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    Vertex,
    /// An entity stored as an edge with the given label.
    Relationship { edge: EdgeName },
}

/// Declared metadata for one entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    pub kind: EntityKind,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

impl EntityDescriptor {
    pub fn vertex(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Vertex,
            members: Vec::new(),
        }
    }

    pub fn relationship(name: impl Into<String>, edge: EdgeName) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Relationship { edge },
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    pub fn edge(&self) -> Option<&EdgeName> {
        match &self.kind {
            EntityKind::Vertex => None,
            EntityKind::Relationship { edge } => Some(edge),
        }
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self.kind, EntityKind::Vertex)
    }
}
