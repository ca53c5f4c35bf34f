use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;
use crate::propagation::ReadDomains;

/// A [`ValueSelector`] which assigns to a value drawn uniformly from the domain.
#[derive(Debug, Copy, Clone, Default)]
pub struct InDomainRandom;

impl ValueSelector for InDomainRandom {
    fn select_value(&mut self, context: &mut SelectionContext, decision_variable: DomainId) -> i32 {
        context.random_value(decision_variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::tests::TestRandom;
    use crate::engine::State;

    #[test]
    fn the_drawn_value_is_in_the_domain() {
        let mut state = State::new();
        let variable = state.new_sparse_variable(vec![1, 4, 9, 16]).expect("non-empty");
        let _ = state.post_remove(variable, 4).expect("not the last value");
        let mut random = TestRandom {
            positions: vec![1],
        };

        let mut context = SelectionContext::new(&state, &mut random);
        let value = InDomainRandom.select_value(&mut context, variable);

        assert_eq!(value, 9);
    }
}
