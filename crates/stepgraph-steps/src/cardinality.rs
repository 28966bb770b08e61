//! Cardinality taxonomy.
//!
//! Every step carries a type-level tag saying how many `TO` objects a single
//! origin produces:
//!
//! | tag          | count  | `Shape<T>`  |
//! |--------------|--------|-------------|
//! | [`ToSingle`] | 1      | `T`         |
//! | [`ToOptional`] | 0..1 | `Option<T>` |
//! | [`ToMany`]   | 0..N   | `Vec<T>`    |
//!
//! [`ToOne`] is not a tag of its own: it is the supertrait shared by
//! `ToSingle` and `ToOptional`, so code generic over `C: ToOne` accepts both.
//!
//! The tags are totally ordered by refinement (`ToSingle` ⊑ `ToOptional` ⊑
//! `ToMany`). [`WidensTo`] encodes that order; it has no impl pointing down the
//! lattice, so narrowing a step is a compile-time error. [`Compose`] is the
//! join used when two steps are chained.
//!
//! [`CardinalityKind`] is the runtime mirror used by descriptors, schemas and
//! diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ShapeError, StepError};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::ToSingle {}
    impl Sealed for super::ToOptional {}
    impl Sealed for super::ToMany {}
}

// ============================================================================
// Runtime mirror
// ============================================================================

/// Runtime cardinality of a step.
///
/// Variants are declared in refinement order, so the derived `Ord` is the
/// lattice order and `join` is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalityKind {
    /// Exactly one result per origin.
    Single,
    /// Zero or one result per origin.
    Optional,
    /// Zero or more results per origin.
    Many,
}

impl CardinalityKind {
    pub const ALL: [CardinalityKind; 3] = [Self::Single, Self::Optional, Self::Many];

    /// Build a kind from its two structural properties.
    ///
    /// `(permits_absence = false, at_most_one = false)` would be "never absent
    /// and unbounded", i.e. `ToSingle` and `ToMany` at once; it is rejected.
    pub fn from_bounds(permits_absence: bool, at_most_one: bool) -> Result<Self, StepError> {
        match (permits_absence, at_most_one) {
            (false, true) => Ok(Self::Single),
            (true, true) => Ok(Self::Optional),
            (true, false) => Ok(Self::Many),
            (false, false) => Err(StepError::InconsistentCardinality),
        }
    }

    pub const fn permits_absence(self) -> bool {
        !matches!(self, Self::Single)
    }

    pub const fn at_most_one(self) -> bool {
        !matches!(self, Self::Many)
    }

    /// Cardinality of `self` followed by `next`.
    pub fn join(self, next: CardinalityKind) -> CardinalityKind {
        self.max(next)
    }

    /// Whether a step of this kind may be used where `target` is expected.
    pub fn widens_to(self, target: CardinalityKind) -> bool {
        self <= target
    }

    /// Cardinality after truncating to the first result.
    pub const fn first(self) -> CardinalityKind {
        match self {
            Self::Many => Self::Optional,
            other => other,
        }
    }

    /// Check a per-origin result count against this kind.
    pub fn check_count(self, actual: usize) -> Result<(), ShapeError> {
        let ok = match self {
            Self::Single => actual == 1,
            Self::Optional => actual <= 1,
            Self::Many => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ShapeError::new(self, actual))
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "to_single",
            Self::Optional => "to_optional",
            Self::Many => "to_many",
        }
    }
}

impl fmt::Display for CardinalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardinalityKind {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_single" | "single" => Ok(Self::Single),
            "to_optional" | "optional" => Ok(Self::Optional),
            "to_many" | "many" => Ok(Self::Many),
            other => Err(StepError::UnknownCardinality(other.to_string())),
        }
    }
}

// ============================================================================
// Type-level tags
// ============================================================================

/// Exactly one result per origin.
#[derive(Debug)]
pub enum ToSingle {}

/// Zero or one result per origin.
#[derive(Debug)]
pub enum ToOptional {}

/// Zero or more results per origin.
#[derive(Debug)]
pub enum ToMany {}

/// A cardinality tag. Sealed: the three tags above are the only implementors.
pub trait Cardinality: sealed::Sealed + 'static {
    const KIND: CardinalityKind;

    /// What one origin's results look like once the count is enforced.
    type Shape<T>;

    /// Enforce the count on one origin's raw results.
    fn shape<T>(items: Vec<T>) -> Result<Self::Shape<T>, ShapeError>;

    /// Forget the count guarantee.
    fn flatten<T>(shape: Self::Shape<T>) -> Vec<T>;

    fn permits_absence() -> bool {
        Self::KIND.permits_absence()
    }

    fn at_most_one() -> bool {
        Self::KIND.at_most_one()
    }
}

/// Tags bounded to at most one result: [`ToSingle`] and [`ToOptional`].
pub trait ToOne: Cardinality {
    fn into_option<T>(shape: Self::Shape<T>) -> Option<T>;
}

impl Cardinality for ToSingle {
    const KIND: CardinalityKind = CardinalityKind::Single;
    type Shape<T> = T;

    fn shape<T>(items: Vec<T>) -> Result<Self::Shape<T>, ShapeError> {
        let actual = items.len();
        let mut items = items.into_iter();
        match (items.next(), items.next()) {
            (Some(item), None) => Ok(item),
            _ => Err(ShapeError::new(Self::KIND, actual)),
        }
    }

    fn flatten<T>(shape: Self::Shape<T>) -> Vec<T> {
        vec![shape]
    }
}

impl Cardinality for ToOptional {
    const KIND: CardinalityKind = CardinalityKind::Optional;
    type Shape<T> = Option<T>;

    fn shape<T>(items: Vec<T>) -> Result<Self::Shape<T>, ShapeError> {
        let actual = items.len();
        let mut items = items.into_iter();
        match (items.next(), items.next()) {
            (first, None) => Ok(first),
            _ => Err(ShapeError::new(Self::KIND, actual)),
        }
    }

    fn flatten<T>(shape: Self::Shape<T>) -> Vec<T> {
        shape.into_iter().collect()
    }
}

impl Cardinality for ToMany {
    const KIND: CardinalityKind = CardinalityKind::Many;
    type Shape<T> = Vec<T>;

    fn shape<T>(items: Vec<T>) -> Result<Self::Shape<T>, ShapeError> {
        Ok(items)
    }

    fn flatten<T>(shape: Self::Shape<T>) -> Vec<T> {
        shape
    }
}

impl ToOne for ToSingle {
    fn into_option<T>(shape: Self::Shape<T>) -> Option<T> {
        Some(shape)
    }
}

impl ToOne for ToOptional {
    fn into_option<T>(shape: Self::Shape<T>) -> Option<T> {
        shape
    }
}

// ============================================================================
// Widening
// ============================================================================

/// `Self` may stand in wherever `Target` is expected.
///
/// Implemented only up the lattice: `ToMany` never widens to a `ToOne` tag.
pub trait WidensTo<Target: Cardinality>: Cardinality {
    fn widen_shape<T>(shape: Self::Shape<T>) -> Target::Shape<T>;
}

impl WidensTo<ToSingle> for ToSingle {
    fn widen_shape<T>(shape: T) -> T {
        shape
    }
}

impl WidensTo<ToOptional> for ToSingle {
    fn widen_shape<T>(shape: T) -> Option<T> {
        Some(shape)
    }
}

impl WidensTo<ToMany> for ToSingle {
    fn widen_shape<T>(shape: T) -> Vec<T> {
        vec![shape]
    }
}

impl WidensTo<ToOptional> for ToOptional {
    fn widen_shape<T>(shape: Option<T>) -> Option<T> {
        shape
    }
}

impl WidensTo<ToMany> for ToOptional {
    fn widen_shape<T>(shape: Option<T>) -> Vec<T> {
        shape.into_iter().collect()
    }
}

impl WidensTo<ToMany> for ToMany {
    fn widen_shape<T>(shape: Vec<T>) -> Vec<T> {
        shape
    }
}

// ============================================================================
// Composition and truncation
// ============================================================================

/// Cardinality of a step with tag `Self` followed by a step with tag `Next`.
///
/// Any `ToMany` leg makes the result `ToMany`; otherwise any `ToOptional` leg
/// makes it `ToOptional`; only `ToSingle ∘ ToSingle` stays `ToSingle`.
pub trait Compose<Next: Cardinality>: Cardinality {
    type Output: Cardinality;
}

macro_rules! compose {
    ($($left:ty, $right:ty => $out:ty;)*) => {
        $(
            impl Compose<$right> for $left {
                type Output = $out;
            }
        )*
    };
}

compose! {
    ToSingle, ToSingle => ToSingle;
    ToSingle, ToOptional => ToOptional;
    ToSingle, ToMany => ToMany;
    ToOptional, ToSingle => ToOptional;
    ToOptional, ToOptional => ToOptional;
    ToOptional, ToMany => ToMany;
    ToMany, ToSingle => ToMany;
    ToMany, ToOptional => ToMany;
    ToMany, ToMany => ToMany;
}

/// Cardinality after keeping only the first result.
pub trait Truncate: Cardinality {
    type Output: ToOne;
}

impl Truncate for ToSingle {
    type Output = ToSingle;
}

impl Truncate for ToOptional {
    type Output = ToOptional;
}

impl Truncate for ToMany {
    type Output = ToOptional;
}
