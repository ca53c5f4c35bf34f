//! The building blocks of propagators.
//!
//! # Background
//!
//! A propagator takes a set of variables with their domains and removes values which cannot be
//! part of any solution of its constraint. A propagator is at fix-point if applying it again would
//! not remove anything; it is idempotent if a single call always leaves it at fix-point.
//!
//! # Practical
//!
//! Each concrete propagator implements [`Propagator`]. It is created by a
//! [`PropagatorConstructor`], which registers the propagator for the [`DomainEvents`] it needs on
//! each of its variables and sets up its (backtrackable) state.
//!
//! The engine wakes a propagator through the hook which matches the event:
//! [`Propagator::awake_on_inst`], [`Propagator::awake_on_inf`], [`Propagator::awake_on_sup`] or
//! [`Propagator::awake_on_removals`]. Every hook defaults to [`Propagator::propagate`], so the
//! simplest correct propagator only implements `propagate`. A propagator is woken once through
//! [`Propagator::awake`] after it is added, once every variable event has been processed.
//!
//! Expensive propagators can coalesce their reactions: a hook may call
//! [`PropagationContext::request_propagation`], after which `propagate` is called once when all
//! variable events have been dispatched.
//!
//! State of a propagator which has to survive between calls but be undone on backtracking is kept
//! in cells of the [`Environment`](crate::environment::Environment), which the contexts expose.
mod constructor;
mod contexts;
mod domains;
mod ids;
mod propagator;
pub(crate) mod store;

pub use constructor::*;
pub use contexts::*;
pub use domains::*;
pub use ids::LocalId;
pub use ids::PropagatorId;
pub use propagator::*;
pub use store::PropagatorHandle;

pub use crate::basic_types::EmptyDomainConflict;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagationStatus;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::domains::DeltaIterator;
pub use crate::engine::events::DomainEvent;
pub use crate::engine::events::DomainEvents;
