//! Backtrackable storage.
//!
//! Every piece of state which has to be undone on backtracking (domains, auxiliary data of
//! propagators, activity flags) lives in cells owned by an [`Environment`]. The environment keeps a
//! stack of worlds; the first write to a cell within a world saves the previous value on the trail,
//! and popping the world writes these values back. Handles such as [`StoredInt`] are plain
//! identifiers which are only meaningful together with the environment that created them.
mod store;
mod stored_bitset;
mod stored_int;
mod stored_int_vector;
mod world;

pub use store::Environment;
pub use stored_bitset::StoredBitSet;
pub use stored_int::StoredInt;
pub use stored_int_vector::StoredIntVector;
pub use world::World;
