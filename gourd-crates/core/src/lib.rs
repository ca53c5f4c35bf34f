//! # Gourd
//! The propagation engine of a finite-domain constraint solver.
//!
//! A [`State`] holds the integer variables, whose domains are kept in backtrackable cells of an
//! [`Environment`](environment::Environment), together with the propagators posted over them.
//! Changes to the domains are queued as events and dispatched to the propagators that subscribed
//! to them, by priority, until a fixed point is reached or a propagator derives a
//! [`Contradiction`]. Opening and restoring worlds undoes every change made since.
//!
//! ```rust
//! use gourd_core::propagation::ReadDomains;
//! use gourd_core::propagators::arithmetic::LessOrEqualPropagatorArgs;
//! use gourd_core::State;
//!
//! let mut state = State::new();
//! let x = state.new_interval_variable(0, 10).unwrap();
//! let y = state.new_interval_variable(0, 5).unwrap();
//! let _ = state
//!     .add_propagator(LessOrEqualPropagatorArgs { a: x, b: y, offset: 2 })
//!     .unwrap();
//!
//! state.propagate_to_fixed_point().unwrap();
//! assert_eq!(state.domains().upper_bound(x), 3);
//! ```
//!
//! The propagators are found in [`propagators`]; the contract they implement is described in
//! [`propagation`]. A simple depth-first search is provided by [`search`], driven by the
//! strategies of [`branching`].
pub(crate) mod basic_types;
pub mod branching;
pub mod containers;
pub(crate) mod engine;
pub mod environment;
pub(crate) mod gourd_asserts;
pub mod propagation;
pub mod propagators;
pub mod search;
pub mod statistics;

pub use convert_case;
pub use rand;

pub use crate::basic_types::Contradiction;
pub use crate::basic_types::ModelError;
pub use crate::basic_types::Random;
pub use crate::basic_types::Solution;
pub use crate::engine::domains::DomainKind;
pub use crate::engine::domains::DomainValues;
pub use crate::engine::domains::EmptyDomain;
pub use crate::engine::domains::MAX_DENSE_WIDTH;
pub use crate::engine::EngineOptions;
pub use crate::engine::State;

pub mod variables {
    //! The handles of the decision variables.
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::Literal;
}
