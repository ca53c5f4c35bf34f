use std::fmt::Display;

use super::SelectionContext;
use crate::engine::variables::DomainId;

/// A binary decision: the left branch assigns `variable` to `value`, the right branch removes
/// `value` from its domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decision {
    pub variable: DomainId,
    pub value: i32,
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.variable, self.value)
    }
}

/// A trait for definining a branching strategy.
///
/// The search asks for a new decision after every propagation which did not lead to a
/// contradiction. A brancher which returns [`None`] while variables are unfixed leaves those
/// variables to the search, which then fixes them in input order to their smallest value.
pub trait Brancher {
    /// Returns the next decision, or [`None`] if every variable of the brancher is fixed.
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision>;
}

impl<B: Brancher + ?Sized> Brancher for Box<B> {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        self.as_mut().next_decision(context)
    }
}
