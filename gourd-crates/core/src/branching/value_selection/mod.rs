//! Provides the [`ValueSelector`] trait which is required for value selectors to implement; the
//! main method in this trait is [`ValueSelector::select_value`].
mod in_domain_min;
mod in_domain_random;

pub use in_domain_min::InDomainMin;
pub use in_domain_random::InDomainRandom;

use super::SelectionContext;
use crate::engine::variables::DomainId;

/// A trait containing the interface for [`ValueSelector`]s, specifying the appropriate hooks and
/// methods.
pub trait ValueSelector {
    /// Determines which value in the domain of `decision_variable` (according to the
    /// [`SelectionContext`]) to assign it to in the left branch. The variable is not fixed.
    fn select_value(&mut self, context: &mut SelectionContext, decision_variable: DomainId) -> i32;
}
