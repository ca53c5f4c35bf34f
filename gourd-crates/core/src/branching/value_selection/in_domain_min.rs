use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;
use crate::propagation::ReadDomains;

/// [`ValueSelector`] which chooses the smallest value in the domain.
#[derive(Debug, Copy, Clone, Default)]
pub struct InDomainMin;

impl ValueSelector for InDomainMin {
    fn select_value(&mut self, context: &mut SelectionContext, decision_variable: DomainId) -> i32 {
        context.lower_bound(decision_variable)
    }
}
