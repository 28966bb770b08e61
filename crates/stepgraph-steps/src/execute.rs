//! Seams to the collaborators that actually run traversals.
//!
//! - a [`TraversalEngine`] takes origin elements plus a [`TraversalPlan`] and
//!   returns one raw result list per origin;
//! - an [`EntityMapper`] converts between typed entities and engine elements.
//!
//! This module only wires them together and enforces the result shape the
//! bound step's cardinality advertises. Failures inside either collaborator
//! are passed through opaquely.

use crate::bound::BoundStep;
use crate::cardinality::Cardinality;
use crate::error::ExecuteError;
use crate::plan::TraversalPlan;

pub trait TraversalEngine {
    type Element;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run `plan` from every origin. The result must hold one list per
    /// origin, in origin order.
    fn traverse(
        &self,
        origins: Vec<Self::Element>,
        plan: &TraversalPlan,
    ) -> Result<Vec<Vec<Self::Element>>, Self::Error>;
}

pub trait EntityMapper<T> {
    type Element;
    type Error: std::error::Error + Send + Sync + 'static;

    fn to_element(&self, entity: &T) -> Result<Self::Element, Self::Error>;

    fn from_element(&self, element: Self::Element) -> Result<T, Self::Error>;
}

/// Execute any bound step, returning one shaped result per origin.
pub fn execute_bound<B, E, M>(
    bound: &B,
    engine: &E,
    mapper: &M,
) -> Result<Vec<<B::Card as Cardinality>::Shape<B::To>>, ExecuteError>
where
    B: BoundStep,
    E: TraversalEngine,
    M: EntityMapper<B::From, Element = E::Element> + EntityMapper<B::To, Element = E::Element>,
{
    let origins = bound
        .froms()
        .iter()
        .map(|from| <M as EntityMapper<B::From>>::to_element(mapper, from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ExecuteError::Mapping(Box::new(err)))?;

    let expected = origins.len();
    let plan = bound.step().plan();
    tracing::debug!(
        origins = expected,
        cardinality = %<B::Card as Cardinality>::KIND,
        plan = %plan,
        "executing bound step"
    );

    let raw = engine
        .traverse(origins, plan)
        .map_err(|err| ExecuteError::Engine(Box::new(err)))?;
    if raw.len() != expected {
        return Err(ExecuteError::OriginCount {
            expected,
            actual: raw.len(),
        });
    }

    raw.into_iter()
        .map(|elements| -> Result<_, ExecuteError> {
            let entities = elements
                .into_iter()
                .map(|element| <M as EntityMapper<B::To>>::from_element(mapper, element))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| ExecuteError::Mapping(Box::new(err)))?;
            Ok(<B::Card as Cardinality>::shape(entities)?)
        })
        .collect()
}
