//! Provides the [`VariableSelector`] trait which is required for variable selectors to implement;
//! the main method in this trait is [`VariableSelector::select_variable`].
mod first_fail;
mod input_order;

pub use first_fail::FirstFail;
pub use input_order::InputOrder;

use super::SelectionContext;
use crate::engine::variables::DomainId;

/// A trait containing the interface for [`VariableSelector`]s, specifying the appropriate hooks
/// and methods.
pub trait VariableSelector {
    /// Determines which variable to select next if there are any left to branch on. Should only
    /// return [`None`] when all variables which have been passed to the [`VariableSelector`] have
    /// been fixed.
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId>;
}
