//! Unbound steps.
//!
//! A [`Step<FROM, TO, C>`] says how to get from one `FROM` to `TO` objects and
//! how many of them to expect (`C`). It owns only a [`TraversalPlan`]; all
//! execution is deferred to binding and to the engine.
//!
//! The cardinality sub-interfaces are spelled as type aliases
//! ([`ToSingleStep`], [`ToOptionalStep`], [`ToManyStep`]) plus the `C: ToOne`
//! bound for "either of the to-one refinements".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::bound::{MultiBoundStep, SingleBoundStep};
use crate::cardinality::{
    Cardinality, CardinalityKind, Compose, ToMany, ToOptional, ToSingle, Truncate, WidensTo,
};
use crate::error::StepError;
use crate::plan::{Hop, TraversalPlan};

pub struct Step<FROM, TO, C> {
    plan: TraversalPlan,
    // `fn(FROM) -> TO` keeps the step `Send + Sync` whatever the entity types are.
    _marker: PhantomData<(fn(FROM) -> TO, C)>,
}

pub type ToSingleStep<FROM, TO> = Step<FROM, TO, ToSingle>;
pub type ToOptionalStep<FROM, TO> = Step<FROM, TO, ToOptional>;
pub type ToManyStep<FROM, TO> = Step<FROM, TO, ToMany>;

impl<FROM, TO, C: Cardinality> Step<FROM, TO, C> {
    /// Declare a step explicitly from a plan.
    pub fn new(plan: TraversalPlan) -> Self {
        Self {
            plan,
            _marker: PhantomData,
        }
    }

    pub fn plan(&self) -> &TraversalPlan {
        &self.plan
    }

    pub fn kind(&self) -> CardinalityKind {
        C::KIND
    }

    pub fn descriptor(&self) -> StepDescriptor {
        StepDescriptor::new(self.plan.clone(), C::KIND)
    }

    /// Chain `next` after this step. The result cardinality is the join of
    /// both legs, computed by [`Compose`].
    pub fn then<NEXT, C2>(
        &self,
        next: &Step<TO, NEXT, C2>,
    ) -> Step<FROM, NEXT, <C as Compose<C2>>::Output>
    where
        C: Compose<C2>,
        C2: Cardinality,
    {
        Step::new(self.plan.concat(&next.plan))
    }

    pub fn dedup(&self) -> Self {
        Self::new(self.plan.with(Hop::Dedup))
    }

    /// Keep only the first result.
    pub fn first(&self) -> Step<FROM, TO, <C as Truncate>::Output>
    where
        C: Truncate,
    {
        if C::KIND.at_most_one() {
            Step::new(self.plan.clone())
        } else {
            Step::new(self.plan.with(Hop::Limit { max: 1 }))
        }
    }

    /// Use this step where a coarser cardinality is expected.
    pub fn widen<W>(&self) -> Step<FROM, TO, W>
    where
        C: WidensTo<W>,
        W: Cardinality,
    {
        Step::new(self.plan.clone())
    }

    pub fn bind(&self, from: FROM) -> SingleBoundStep<FROM, TO, C> {
        SingleBoundStep::new(from, self.clone())
    }

    pub fn bind_all<I>(&self, froms: I) -> MultiBoundStep<FROM, TO, C>
    where
        I: IntoIterator<Item = FROM>,
    {
        MultiBoundStep::new(froms, self.clone())
    }
}

impl<T> Step<T, T, ToSingle> {
    /// The unit of composition: every origin maps to itself.
    pub fn identity() -> Self {
        Self::new(TraversalPlan::identity())
    }
}

impl<FROM, TO> Step<FROM, TO, ToMany> {
    pub fn limit(&self, max: usize) -> Self {
        Self::new(self.plan.with(Hop::Limit { max }))
    }
}

impl<FROM, TO, C> Clone for Step<FROM, TO, C> {
    fn clone(&self) -> Self {
        Self {
            plan: self.plan.clone(),
            _marker: PhantomData,
        }
    }
}

impl<FROM, TO, C> PartialEq for Step<FROM, TO, C> {
    fn eq(&self, other: &Self) -> bool {
        self.plan == other.plan
    }
}

impl<FROM, TO, C> Eq for Step<FROM, TO, C> {}

impl<FROM, TO, C> Hash for Step<FROM, TO, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plan.hash(state);
    }
}

impl<FROM, TO, C: Cardinality> fmt::Debug for Step<FROM, TO, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("cardinality", &C::KIND)
            .field("plan", &self.plan)
            .finish()
    }
}

impl<FROM, TO, C: Cardinality> fmt::Display for Step<FROM, TO, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.plan, C::KIND)
    }
}

// ============================================================================
// Runtime descriptor
// ============================================================================

/// A step with its cardinality held as a value.
///
/// Schemas and declaration files produce descriptors; [`StepDescriptor::typed`]
/// turns one back into a [`Step`] once the caller names the tag it expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub plan: TraversalPlan,
    pub cardinality: CardinalityKind,
}

impl StepDescriptor {
    pub fn new(plan: TraversalPlan, cardinality: CardinalityKind) -> Self {
        Self { plan, cardinality }
    }

    pub fn from_bounds(
        plan: TraversalPlan,
        permits_absence: bool,
        at_most_one: bool,
    ) -> Result<Self, StepError> {
        let cardinality = CardinalityKind::from_bounds(permits_absence, at_most_one)?;
        Ok(Self::new(plan, cardinality))
    }

    pub fn then(&self, next: &StepDescriptor) -> Self {
        Self::new(
            self.plan.concat(&next.plan),
            self.cardinality.join(next.cardinality),
        )
    }

    /// Recover a typed step. The declared cardinality must widen to `C`.
    pub fn typed<FROM, TO, C: Cardinality>(&self) -> Result<Step<FROM, TO, C>, StepError> {
        if !self.cardinality.widens_to(C::KIND) {
            return Err(StepError::CardinalityMismatch {
                declared: self.cardinality,
                requested: C::KIND,
            });
        }
        Ok(Step::new(self.plan.clone()))
    }
}

impl fmt::Display for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.plan, self.cardinality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cardinality::ToOne;
    use crate::edge_spec::EdgeName;

    struct Person;
    struct Company;
    struct City;

    fn out<FROM, TO, C: Cardinality>(label: &str) -> Step<FROM, TO, C> {
        Step::new(TraversalPlan::single(Hop::Out {
            label: EdgeName::new(label).expect("valid label"),
        }))
    }

    fn is_to_one<FROM, TO, C: ToOne>(_step: &Step<FROM, TO, C>) -> bool {
        C::at_most_one()
    }

    #[test]
    fn composition_joins_cardinalities_statically() {
        let employer: Step<Person, Company, ToSingle> = out("WORKS_AT");
        let hq: Step<Company, City, ToOptional> = out("HEADQUARTERED_IN");
        let staff: Step<Company, Person, ToMany> = out("EMPLOYS");

        let s_o: Step<Person, City, ToOptional> = employer.then(&hq);
        let s_m: Step<Person, Person, ToMany> = employer.then(&staff);
        let s_s: Step<Person, Company, ToSingle> =
            Step::<Person, Person, ToSingle>::identity().then(&employer);

        assert_eq!(s_o.kind(), CardinalityKind::Optional);
        assert_eq!(s_m.kind(), CardinalityKind::Many);
        assert_eq!(s_s.kind(), CardinalityKind::Single);
        assert_eq!(s_o.plan().to_string(), "out(WORKS_AT).out(HEADQUARTERED_IN)");
    }

    #[test]
    fn single_steps_are_usable_as_any_coarser_cardinality() {
        let employer: Step<Person, Company, ToSingle> = out("WORKS_AT");

        assert!(is_to_one(&employer));
        let optional: Step<Person, Company, ToOptional> = employer.widen();
        assert!(is_to_one(&optional));
        let many: Step<Person, Company, ToMany> = employer.widen();

        assert_eq!(optional.plan(), employer.plan());
        assert_eq!(many.kind(), CardinalityKind::Many);
    }

    #[test]
    fn first_truncates_many_to_optional() {
        let staff: Step<Company, Person, ToMany> = out("EMPLOYS");
        let one: Step<Company, Person, ToOptional> = staff.first();
        assert_eq!(one.plan().to_string(), "out(EMPLOYS).limit(1)");

        let employer: Step<Person, Company, ToSingle> = out("WORKS_AT");
        let same: Step<Person, Company, ToSingle> = employer.first();
        assert_eq!(same, employer);
    }

    #[test]
    fn dedup_and_limit_keep_cardinality() {
        let staff: Step<Company, Person, ToMany> = out("EMPLOYS");
        let trimmed = staff.dedup().limit(10);
        assert_eq!(trimmed.kind(), CardinalityKind::Many);
        assert_eq!(trimmed.plan().len(), 3);
    }

    #[test]
    fn descriptor_round_trips_into_a_compatible_tag() {
        let employer: Step<Person, Company, ToSingle> = out("WORKS_AT");
        let descriptor = employer.descriptor();

        let back: Step<Person, Company, ToSingle> = descriptor.typed().expect("same tag");
        assert_eq!(back, employer);
        let wider: Step<Person, Company, ToMany> = descriptor.typed().expect("wider tag");
        assert_eq!(wider.plan(), employer.plan());

        let staff: Step<Company, Person, ToMany> = out("EMPLOYS");
        let err = staff
            .descriptor()
            .typed::<Company, Person, ToSingle>()
            .expect_err("narrowing must fail");
        assert_eq!(
            err,
            StepError::CardinalityMismatch {
                declared: CardinalityKind::Many,
                requested: CardinalityKind::Single,
            }
        );
    }

    #[test]
    fn descriptor_from_bounds_rejects_inconsistent_declarations() {
        let err = StepDescriptor::from_bounds(TraversalPlan::identity(), false, false)
            .expect_err("single and many at once");
        assert_eq!(err, StepError::InconsistentCardinality);
    }

    #[test]
    fn steps_are_send_and_sync_for_any_entity_type() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Step<std::rc::Rc<u8>, std::cell::Cell<u8>, ToMany>>();
    }
}
