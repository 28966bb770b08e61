//! Edge specifications: declared relationships between vertex types, from
//! which steps are derived.
//!
//! | spec                              | forward       | inverse                     |
//! |-----------------------------------|---------------|-----------------------------|
//! | [`OneToManyEdgeSpec`]             | `ToMany`      | none                        |
//! | [`ManyToOneEdgeSpec`]             | `ToSingle`    | none                        |
//! | [`ManyToOptionalEdgeSpec`]        | `ToOptional`  | none                        |
//! | [`ManyToManyEdgeSpec`]            | `ToMany`      | `ToMany`, reversed direction |
//! | [`ManyToManySymmetricEdgeSpec`]   | `ToMany`      | itself                      |
//!
//! Typed specs are zero-cost wrappers around an [`EdgeName`]. Schemas work with
//! the untyped [`EdgeDescriptor`] mirror.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use crate::cardinality::{Cardinality, CardinalityKind, ToMany, ToOptional, ToSingle};
use crate::error::StepError;
use crate::plan::{Hop, TraversalPlan};
use crate::step::{Step, StepDescriptor};

/// A vertex type that edges can connect.
pub trait Vertex {
    const LABEL: &'static str;
}

// ============================================================================
// Edge names
// ============================================================================

/// A validated edge label: non-empty, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeName(String);

impl EdgeName {
    pub fn new(name: impl Into<String>) -> Result<Self, StepError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StepError::EmptyEdgeName);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(StepError::InvalidEdgeName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EdgeName {
    type Error = StepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EdgeName> for String {
    fn from(value: EdgeName) -> Self {
        value.0
    }
}

impl AsRef<str> for EdgeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EdgeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Variants and descriptors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeVariant {
    OneToMany,
    ManyToOne,
    ManyToOptional,
    ManyToMany,
    ManyToManySymmetric,
}

impl EdgeVariant {
    pub const ALL: [EdgeVariant; 5] = [
        Self::OneToMany,
        Self::ManyToOne,
        Self::ManyToOptional,
        Self::ManyToMany,
        Self::ManyToManySymmetric,
    ];

    /// The forward-only variant with the given forward cardinality.
    pub const fn forward_only(kind: CardinalityKind) -> Self {
        match kind {
            CardinalityKind::Many => Self::OneToMany,
            CardinalityKind::Single => Self::ManyToOne,
            CardinalityKind::Optional => Self::ManyToOptional,
        }
    }

    pub const fn forward(self) -> CardinalityKind {
        match self {
            Self::ManyToOne => CardinalityKind::Single,
            Self::ManyToOptional => CardinalityKind::Optional,
            Self::OneToMany | Self::ManyToMany | Self::ManyToManySymmetric => {
                CardinalityKind::Many
            }
        }
    }

    /// Cardinality of the inverse traversal, if the variant models one.
    pub const fn inverse(self) -> Option<CardinalityKind> {
        match self {
            Self::ManyToMany | Self::ManyToManySymmetric => Some(CardinalityKind::Many),
            Self::OneToMany | Self::ManyToOne | Self::ManyToOptional => None,
        }
    }

    pub const fn is_symmetric(self) -> bool {
        matches!(self, Self::ManyToManySymmetric)
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::OneToMany => "one_to_many",
            Self::ManyToOne => "many_to_one",
            Self::ManyToOptional => "many_to_optional",
            Self::ManyToMany => "many_to_many",
            Self::ManyToManySymmetric => "many_to_many_symmetric",
        }
    }
}

impl fmt::Display for EdgeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for EdgeVariant {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.keyword() == s)
            .ok_or_else(|| StepError::UnknownVariant(s.to_string()))
    }
}

/// Untyped mirror of an edge spec, in its declared orientation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub name: EdgeName,
    pub variant: EdgeVariant,
    pub from: String,
    pub to: String,
}

impl EdgeDescriptor {
    pub fn new(
        name: EdgeName,
        variant: EdgeVariant,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<Self, StepError> {
        let descriptor = Self {
            name,
            variant,
            from: from.into(),
            to: to.into(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Symmetric edges must connect a vertex type to itself.
    pub fn validate(&self) -> Result<(), StepError> {
        if self.variant.is_symmetric() && self.from != self.to {
            return Err(StepError::AsymmetricEndpoints {
                name: self.name.to_string(),
                from: self.from.clone(),
                to: self.to.clone(),
            });
        }
        Ok(())
    }

    pub fn forward_step(&self) -> StepDescriptor {
        let label = self.name.clone();
        let hop = if self.variant.is_symmetric() {
            Hop::Both { label }
        } else {
            Hop::Out { label }
        };
        StepDescriptor::new(TraversalPlan::single(hop), self.variant.forward())
    }

    pub fn inverse_step(&self) -> Option<StepDescriptor> {
        let cardinality = self.variant.inverse()?;
        let label = self.name.clone();
        let hop = if self.variant.is_symmetric() {
            Hop::Both { label }
        } else {
            Hop::In { label }
        };
        Some(StepDescriptor::new(TraversalPlan::single(hop), cardinality))
    }
}

impl fmt::Display for EdgeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variant.is_symmetric() {
            write!(f, "{}: {}({})", self.name, self.variant, self.from)
        } else {
            write!(f, "{}: {}({}, {})", self.name, self.variant, self.from, self.to)
        }
    }
}

// ============================================================================
// Typed specs
// ============================================================================

pub trait EdgeSpec {
    type From: Vertex;
    type To: Vertex;
    type Forward: Cardinality;

    const VARIANT: EdgeVariant;

    fn name(&self) -> &EdgeName;

    fn forward(&self) -> Step<Self::From, Self::To, Self::Forward>;

    fn descriptor(&self) -> EdgeDescriptor {
        EdgeDescriptor {
            name: self.name().clone(),
            variant: Self::VARIANT,
            from: <Self::From as Vertex>::LABEL.to_string(),
            to: <Self::To as Vertex>::LABEL.to_string(),
        }
    }
}

/// Specs that model the reverse traversal.
pub trait InvertibleEdgeSpec: EdgeSpec {
    type Inverse: EdgeSpec<From = Self::To, To = Self::From>;

    fn inverse(&self) -> Self::Inverse;

    fn backward(&self) -> Step<Self::To, Self::From, <Self::Inverse as EdgeSpec>::Forward> {
        self.inverse().forward()
    }
}

/// A spec traversed in its declared direction only.
pub struct ForwardEdgeSpec<FROM, TO, C> {
    name: EdgeName,
    _marker: PhantomData<(fn(FROM) -> TO, C)>,
}

/// One `FROM` has any number of `TO`s.
pub type OneToManyEdgeSpec<FROM, TO> = ForwardEdgeSpec<FROM, TO, ToMany>;
/// Every `FROM` has exactly one `TO`.
pub type ManyToOneEdgeSpec<FROM, TO> = ForwardEdgeSpec<FROM, TO, ToSingle>;
/// Every `FROM` has at most one `TO`.
pub type ManyToOptionalEdgeSpec<FROM, TO> = ForwardEdgeSpec<FROM, TO, ToOptional>;

impl<FROM, TO, C: Cardinality> ForwardEdgeSpec<FROM, TO, C> {
    pub fn new(name: impl Into<String>) -> Result<Self, StepError> {
        Ok(Self {
            name: EdgeName::new(name)?,
            _marker: PhantomData,
        })
    }
}

impl<FROM: Vertex, TO: Vertex, C: Cardinality> EdgeSpec for ForwardEdgeSpec<FROM, TO, C> {
    type From = FROM;
    type To = TO;
    type Forward = C;

    const VARIANT: EdgeVariant = EdgeVariant::forward_only(C::KIND);

    fn name(&self) -> &EdgeName {
        &self.name
    }

    fn forward(&self) -> Step<FROM, TO, C> {
        Step::new(TraversalPlan::single(Hop::Out {
            label: self.name.clone(),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Out,
    In,
}

impl Direction {
    pub const fn reversed(self) -> Self {
        match self {
            Self::Out => Self::In,
            Self::In => Self::Out,
        }
    }
}

/// Many `FROM`s relate to many `TO`s. The inverse walks the same label
/// backwards, so `spec.inverse().inverse() == spec`.
pub struct ManyToManyEdgeSpec<FROM, TO> {
    name: EdgeName,
    direction: Direction,
    _marker: PhantomData<fn(FROM) -> TO>,
}

impl<FROM, TO> ManyToManyEdgeSpec<FROM, TO> {
    pub fn new(name: impl Into<String>) -> Result<Self, StepError> {
        Ok(Self {
            name: EdgeName::new(name)?,
            direction: Direction::Out,
            _marker: PhantomData,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether this value walks the declared edge backwards.
    pub fn is_inverse(&self) -> bool {
        self.direction == Direction::In
    }
}

impl<FROM: Vertex, TO: Vertex> EdgeSpec for ManyToManyEdgeSpec<FROM, TO> {
    type From = FROM;
    type To = TO;
    type Forward = ToMany;

    const VARIANT: EdgeVariant = EdgeVariant::ManyToMany;

    fn name(&self) -> &EdgeName {
        &self.name
    }

    fn forward(&self) -> Step<FROM, TO, ToMany> {
        let label = self.name.clone();
        let hop = match self.direction {
            Direction::Out => Hop::Out { label },
            Direction::In => Hop::In { label },
        };
        Step::new(TraversalPlan::single(hop))
    }

    fn descriptor(&self) -> EdgeDescriptor {
        let (from, to) = match self.direction {
            Direction::Out => (FROM::LABEL, TO::LABEL),
            Direction::In => (TO::LABEL, FROM::LABEL),
        };
        EdgeDescriptor {
            name: self.name.clone(),
            variant: Self::VARIANT,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl<FROM: Vertex, TO: Vertex> InvertibleEdgeSpec for ManyToManyEdgeSpec<FROM, TO> {
    type Inverse = ManyToManyEdgeSpec<TO, FROM>;

    fn inverse(&self) -> ManyToManyEdgeSpec<TO, FROM> {
        ManyToManyEdgeSpec {
            name: self.name.clone(),
            direction: self.direction.reversed(),
            _marker: PhantomData,
        }
    }
}

/// A bi-directional relationship over one vertex type: forward and inverse
/// share the label and both yield `ToMany`. `inverse` returns an equal spec.
pub struct ManyToManySymmetricEdgeSpec<TYPE> {
    name: EdgeName,
    _marker: PhantomData<fn(TYPE) -> TYPE>,
}

impl<TYPE> ManyToManySymmetricEdgeSpec<TYPE> {
    pub fn new(name: impl Into<String>) -> Result<Self, StepError> {
        Ok(Self {
            name: EdgeName::new(name)?,
            _marker: PhantomData,
        })
    }
}

impl<TYPE: Vertex> EdgeSpec for ManyToManySymmetricEdgeSpec<TYPE> {
    type From = TYPE;
    type To = TYPE;
    type Forward = ToMany;

    const VARIANT: EdgeVariant = EdgeVariant::ManyToManySymmetric;

    fn name(&self) -> &EdgeName {
        &self.name
    }

    fn forward(&self) -> Step<TYPE, TYPE, ToMany> {
        Step::new(TraversalPlan::single(Hop::Both {
            label: self.name.clone(),
        }))
    }
}

impl<TYPE: Vertex> InvertibleEdgeSpec for ManyToManySymmetricEdgeSpec<TYPE> {
    type Inverse = Self;

    fn inverse(&self) -> Self {
        self.clone()
    }
}

// Value semantics for the phantom-typed specs, independent of FROM/TO/C.

impl<FROM, TO, C> Clone for ForwardEdgeSpec<FROM, TO, C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<FROM, TO, C> PartialEq for ForwardEdgeSpec<FROM, TO, C> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<FROM, TO, C> Eq for ForwardEdgeSpec<FROM, TO, C> {}

impl<FROM, TO, C> Hash for ForwardEdgeSpec<FROM, TO, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<FROM, TO, C: Cardinality> fmt::Debug for ForwardEdgeSpec<FROM, TO, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardEdgeSpec")
            .field("name", &self.name)
            .field("forward", &C::KIND)
            .finish()
    }
}

impl<FROM, TO> Clone for ManyToManyEdgeSpec<FROM, TO> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            direction: self.direction,
            _marker: PhantomData,
        }
    }
}

impl<FROM, TO> PartialEq for ManyToManyEdgeSpec<FROM, TO> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.direction == other.direction
    }
}

impl<FROM, TO> Eq for ManyToManyEdgeSpec<FROM, TO> {}

impl<FROM, TO> Hash for ManyToManyEdgeSpec<FROM, TO> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.direction.hash(state);
    }
}

impl<FROM, TO> fmt::Debug for ManyToManyEdgeSpec<FROM, TO> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManyToManyEdgeSpec")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .finish()
    }
}

impl<TYPE> Clone for ManyToManySymmetricEdgeSpec<TYPE> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<TYPE> PartialEq for ManyToManySymmetricEdgeSpec<TYPE> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<TYPE> Eq for ManyToManySymmetricEdgeSpec<TYPE> {}

impl<TYPE> Hash for ManyToManySymmetricEdgeSpec<TYPE> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<TYPE> fmt::Debug for ManyToManySymmetricEdgeSpec<TYPE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManyToManySymmetricEdgeSpec")
            .field("name", &self.name)
            .finish()
    }
}
