//! Contains the propagator implementations of the engine.
//!
//! See [`crate::propagation`] for the contract every propagator implements.
pub mod arithmetic;
pub mod clause_store;
pub mod cumulative;
pub mod table;

pub use clause_store::ClauseStore;
pub use clause_store::ClauseStoreConstructor;
