//! Contains structures and traits to define the decision making procedure of the search.
//!
//! In general, it provides 3 traits:
//! - The [`Brancher`] which selects the next [`Decision`]; the main method of this trait is the
//!   [`Brancher::next_decision`] method. An example implementation of this trait is the
//!   [`IndependentVariableValueBrancher`].
//! - The [`VariableSelector`] which picks the variable to branch on; the main method of this trait
//!   is [`VariableSelector::select_variable`]. An example is the [`FirstFail`] strategy.
//! - The [`ValueSelector`] which picks the value the selected variable is assigned to in the left
//!   branch; the main method of this trait is [`ValueSelector::select_value`].
//!
//! A [`Brancher`] is expected to be passed to
//! [`DepthFirstSearch::solve`](crate::search::DepthFirstSearch::solve).
mod brancher;
mod independent_variable_value_brancher;
mod selection_context;
pub mod value_selection;
pub mod variable_selection;

pub use brancher::*;
pub use independent_variable_value_brancher::IndependentVariableValueBrancher;
pub use selection_context::SelectionContext;

#[cfg(doc)]
use crate::branching::value_selection::ValueSelector;
#[cfg(doc)]
use crate::branching::variable_selection::FirstFail;
#[cfg(doc)]
use crate::branching::variable_selection::VariableSelector;
