//! Cardinality-typed traversal steps.
//!
//! This crate is the typing and composition layer that sits above a graph
//! traversal engine:
//!
//! - **cardinality tags** ([`ToSingle`], [`ToOptional`], [`ToMany`] and the
//!   [`ToOne`] bound) say how many results a traversal yields per origin;
//! - a **[`Step`]** is an immutable, reusable `FROM -> TO` traversal carrying
//!   one of those tags;
//! - **edge specs** ([`OneToManyEdgeSpec`], [`ManyToManyEdgeSpec`],
//!   [`ManyToManySymmetricEdgeSpec`], ...) declare relationships and derive
//!   steps;
//! - **bound steps** ([`SingleBoundStep`], [`MultiBoundStep`]) pair a step
//!   with concrete origins and hand it to a [`TraversalEngine`].
//!
//! Cardinality is tracked at compile time. A to-single step widens to any
//! coarser tag:
//!
//! ```
//! use stepgraph_steps::{EdgeSpec, ManyToOneEdgeSpec, Step, ToMany, ToSingle, Vertex};
//!
//! struct Person;
//! impl Vertex for Person {
//!     const LABEL: &'static str = "Person";
//! }
//!
//! struct Company;
//! impl Vertex for Company {
//!     const LABEL: &'static str = "Company";
//! }
//!
//! let works_at = ManyToOneEdgeSpec::<Person, Company>::new("WORKS_AT").unwrap();
//! let employer: Step<Person, Company, ToSingle> = works_at.forward();
//! let as_many: Step<Person, Company, ToMany> = employer.widen();
//! assert_eq!(as_many.plan().to_string(), "out(WORKS_AT)");
//! ```
//!
//! but a to-many step never narrows:
//!
//! ```compile_fail
//! use stepgraph_steps::{Step, ToMany, ToSingle, TraversalPlan};
//!
//! struct Company;
//! struct Person;
//!
//! let staff: Step<Company, Person, ToMany> = Step::new(TraversalPlan::identity());
//! let one: Step<Company, Person, ToSingle> = staff.widen();
//! ```
//!
//! and binding keeps the tag, so a to-many binding cannot be read as a single
//! value:
//!
//! ```compile_fail
//! use stepgraph_steps::{SingleBoundStep, Step, ToMany, ToSingle, TraversalPlan};
//!
//! struct Company;
//! struct Person;
//!
//! let staff: Step<Company, Person, ToMany> = Step::new(TraversalPlan::identity());
//! let bound: SingleBoundStep<Company, Person, ToSingle> = staff.bind(Company);
//! ```

pub mod bound;
pub mod cardinality;
pub mod edge_spec;
pub mod error;
pub mod execute;
pub mod plan;
pub mod step;

pub use bound::{BoundStep, MultiBoundStep, SingleBoundStep};
pub use cardinality::{
    Cardinality, CardinalityKind, Compose, ToMany, ToOne, ToOptional, ToSingle, Truncate,
    WidensTo,
};
pub use edge_spec::{
    Direction, EdgeDescriptor, EdgeName, EdgeSpec, EdgeVariant, ForwardEdgeSpec,
    InvertibleEdgeSpec, ManyToManyEdgeSpec, ManyToManySymmetricEdgeSpec, ManyToOneEdgeSpec,
    ManyToOptionalEdgeSpec, OneToManyEdgeSpec, Vertex,
};
pub use error::{ExecuteError, ShapeError, StepError, StepResult};
pub use execute::{execute_bound, EntityMapper, TraversalEngine};
pub use plan::{Hop, TraversalPlan};
pub use step::{Step, StepDescriptor, ToManyStep, ToOptionalStep, ToSingleStep};
