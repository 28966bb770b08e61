//! Traversal plans: the engine-facing description carried by every step.
//!
//! A plan is an ordered list of hops applied to each origin independently.
//! The plan does not know about cardinality; the owning [`crate::Step`] does.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::edge_spec::EdgeName;

/// One traversal instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "hop", rename_all = "snake_case")]
pub enum Hop {
    /// Follow edges with this label from their source to their target.
    Out { label: EdgeName },
    /// Follow edges with this label from their target back to their source.
    In { label: EdgeName },
    /// Follow edges with this label in either direction.
    Both { label: EdgeName },
    /// Drop repeated elements, keeping first occurrences.
    Dedup,
    /// Keep at most `max` elements.
    Limit { max: usize },
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hop::Out { label } => write!(f, "out({label})"),
            Hop::In { label } => write!(f, "in({label})"),
            Hop::Both { label } => write!(f, "both({label})"),
            Hop::Dedup => f.write_str("dedup()"),
            Hop::Limit { max } => write!(f, "limit({max})"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraversalPlan {
    hops: Vec<Hop>,
}

impl TraversalPlan {
    /// The empty plan: every origin maps to itself.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn single(hop: Hop) -> Self {
        Self { hops: vec![hop] }
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// This plan with `hop` appended.
    pub fn with(&self, hop: Hop) -> Self {
        let mut hops = self.hops.clone();
        hops.push(hop);
        Self { hops }
    }

    /// This plan followed by `next`.
    pub fn concat(&self, next: &TraversalPlan) -> Self {
        let mut hops = Vec::with_capacity(self.hops.len() + next.hops.len());
        hops.extend_from_slice(&self.hops);
        hops.extend_from_slice(&next.hops);
        Self { hops }
    }
}

impl FromIterator<Hop> for TraversalPlan {
    fn from_iter<I: IntoIterator<Item = Hop>>(iter: I) -> Self {
        Self {
            hops: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for TraversalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hops.is_empty() {
            return f.write_str("identity()");
        }
        for (i, hop) in self.hops.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{hop}")?;
        }
        Ok(())
    }
}
