//! Bound steps: a [`Step`] paired with the concrete origin(s) to start from.
//!
//! A bound step's cardinality is the cardinality parameter of its step, so a
//! `ToMany` step can only ever produce a `ToMany` bound step.

use std::fmt;

use crate::cardinality::{Cardinality, ToOne, WidensTo};
use crate::error::ExecuteError;
use crate::execute::{execute_bound, EntityMapper, TraversalEngine};
use crate::step::Step;

/// Uniform view over single- and multi-origin bindings.
pub trait BoundStep {
    type From;
    type To;
    type Card: Cardinality;

    /// Origins in binding order.
    fn froms(&self) -> &[Self::From];

    fn step(&self) -> &Step<Self::From, Self::To, Self::Card>;
}

// ============================================================================
// Single origin
// ============================================================================

/// A step and the single `FROM` object to start the traversal from.
pub struct SingleBoundStep<FROM, TO, C> {
    from: FROM,
    step: Step<FROM, TO, C>,
}

impl<FROM, TO, C: Cardinality> SingleBoundStep<FROM, TO, C> {
    pub fn new(from: FROM, step: Step<FROM, TO, C>) -> Self {
        Self { from, step }
    }

    pub fn from(&self) -> &FROM {
        &self.from
    }

    pub fn into_parts(self) -> (FROM, Step<FROM, TO, C>) {
        (self.from, self.step)
    }

    pub fn widen<W>(self) -> SingleBoundStep<FROM, TO, W>
    where
        C: WidensTo<W>,
        W: Cardinality,
    {
        SingleBoundStep {
            step: self.step.widen(),
            from: self.from,
        }
    }

    /// Hand the binding to `engine` and map the results back through `mapper`.
    pub fn execute<E, M>(self, engine: &E, mapper: &M) -> Result<C::Shape<TO>, ExecuteError>
    where
        E: TraversalEngine,
        M: EntityMapper<FROM, Element = E::Element> + EntityMapper<TO, Element = E::Element>,
    {
        let mut shapes = execute_bound(&self, engine, mapper)?.into_iter();
        shapes.next().ok_or(ExecuteError::OriginCount {
            expected: 1,
            actual: 0,
        })
    }
}

impl<FROM, TO, C: ToOne> SingleBoundStep<FROM, TO, C> {
    /// Execute any to-one binding and read the result as an `Option`.
    pub fn execute_optional<E, M>(
        self,
        engine: &E,
        mapper: &M,
    ) -> Result<Option<TO>, ExecuteError>
    where
        E: TraversalEngine,
        M: EntityMapper<FROM, Element = E::Element> + EntityMapper<TO, Element = E::Element>,
    {
        self.execute(engine, mapper).map(C::into_option)
    }
}

impl<FROM, TO, C: Cardinality> BoundStep for SingleBoundStep<FROM, TO, C> {
    type From = FROM;
    type To = TO;
    type Card = C;

    fn froms(&self) -> &[FROM] {
        std::slice::from_ref(&self.from)
    }

    fn step(&self) -> &Step<FROM, TO, C> {
        &self.step
    }
}

impl<FROM: Clone, TO, C> Clone for SingleBoundStep<FROM, TO, C> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            step: self.step.clone(),
        }
    }
}

impl<FROM: PartialEq, TO, C> PartialEq for SingleBoundStep<FROM, TO, C> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.step == other.step
    }
}

impl<FROM: fmt::Debug, TO, C: Cardinality> fmt::Debug for SingleBoundStep<FROM, TO, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleBoundStep")
            .field("from", &self.from)
            .field("step", &self.step)
            .finish()
    }
}

// ============================================================================
// Multiple origins
// ============================================================================

/// A step and several `FROM` objects, each traversed independently.
pub struct MultiBoundStep<FROM, TO, C> {
    froms: Vec<FROM>,
    step: Step<FROM, TO, C>,
}

impl<FROM, TO, C: Cardinality> MultiBoundStep<FROM, TO, C> {
    pub fn new<I>(froms: I, step: Step<FROM, TO, C>) -> Self
    where
        I: IntoIterator<Item = FROM>,
    {
        Self {
            froms: froms.into_iter().collect(),
            step,
        }
    }

    pub fn len(&self) -> usize {
        self.froms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.froms.is_empty()
    }

    pub fn into_parts(self) -> (Vec<FROM>, Step<FROM, TO, C>) {
        (self.froms, self.step)
    }

    pub fn widen<W>(self) -> MultiBoundStep<FROM, TO, W>
    where
        C: WidensTo<W>,
        W: Cardinality,
    {
        MultiBoundStep {
            step: self.step.widen(),
            froms: self.froms,
        }
    }

    /// Execute and pair every origin with its shaped result, in binding order.
    pub fn execute<E, M>(
        self,
        engine: &E,
        mapper: &M,
    ) -> Result<Vec<(FROM, C::Shape<TO>)>, ExecuteError>
    where
        E: TraversalEngine,
        M: EntityMapper<FROM, Element = E::Element> + EntityMapper<TO, Element = E::Element>,
    {
        let shapes = execute_bound(&self, engine, mapper)?;
        Ok(self.froms.into_iter().zip(shapes).collect())
    }
}

impl<FROM, TO, C: Cardinality> BoundStep for MultiBoundStep<FROM, TO, C> {
    type From = FROM;
    type To = TO;
    type Card = C;

    fn froms(&self) -> &[FROM] {
        &self.froms
    }

    fn step(&self) -> &Step<FROM, TO, C> {
        &self.step
    }
}

impl<FROM: Clone, TO, C> Clone for MultiBoundStep<FROM, TO, C> {
    fn clone(&self) -> Self {
        Self {
            froms: self.froms.clone(),
            step: self.step.clone(),
        }
    }
}

impl<FROM: PartialEq, TO, C> PartialEq for MultiBoundStep<FROM, TO, C> {
    fn eq(&self, other: &Self) -> bool {
        self.froms == other.froms && self.step == other.step
    }
}

impl<FROM: fmt::Debug, TO, C: Cardinality> fmt::Debug for MultiBoundStep<FROM, TO, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiBoundStep")
            .field("froms", &self.froms)
            .field("step", &self.step)
            .finish()
    }
}
