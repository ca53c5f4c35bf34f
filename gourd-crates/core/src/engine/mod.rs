//! The propagation engine: the domains of the variables, the events raised when they change, and
//! the [`State`] which dispatches those events to the propagators until a fixed point is reached.
pub(crate) mod assignments;
pub(crate) mod domains;
pub(crate) mod event_queue;
pub(crate) mod events;
pub(crate) mod notification_engine;
mod state;
#[cfg(test)]
pub(crate) mod test_solver;
pub mod variables;
pub(crate) mod watch_list;

pub use assignments::Assignments;
pub use state::EngineOptions;
pub use state::State;
