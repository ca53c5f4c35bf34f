use log::warn;

use super::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;
use crate::propagation::ReadDomains;

/// A [`VariableSelector`] which selects the unfixed variable with the fewest values in its domain.
///
/// Ties are broken on the order of the provided list.
#[derive(Debug)]
pub struct FirstFail {
    variables: Vec<DomainId>,
}

impl FirstFail {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The FirstFail variable selector was not provided with any variables");
        }
        FirstFail {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for FirstFail {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .copied()
            .filter(|&variable| !context.is_fixed(variable))
            .enumerate()
            .min_by_key(|&(index, variable)| (context.size(variable), index))
            .map(|(_, variable)| variable)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::State;

    #[test]
    fn the_smallest_domain_is_selected() {
        let mut state = State::new();
        let wide = state.new_interval_variable(0, 10).expect("non-empty");
        let sparse = state.new_sparse_variable(vec![0, 5, 10]).expect("non-empty");
        let narrow = state.new_interval_variable(0, 3).expect("non-empty");
        let mut random = SmallRng::seed_from_u64(42);
        let mut strategy = FirstFail::new(&[wide, sparse, narrow]);

        let mut context = SelectionContext::new(&state, &mut random);
        assert_eq!(strategy.select_variable(&mut context), Some(sparse));
    }

    #[test]
    fn ties_are_broken_on_input_order() {
        let mut state = State::new();
        let first = state.new_interval_variable(0, 3).expect("non-empty");
        let second = state.new_interval_variable(4, 7).expect("non-empty");
        let mut random = SmallRng::seed_from_u64(42);
        let mut strategy = FirstFail::new(&[first, second]);

        let mut context = SelectionContext::new(&state, &mut random);
        assert_eq!(strategy.select_variable(&mut context), Some(first));
    }
}
