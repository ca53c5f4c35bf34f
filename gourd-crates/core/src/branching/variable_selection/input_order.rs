use log::warn;

use super::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;
use crate::propagation::ReadDomains;

/// A [`VariableSelector`] which selects the first variable which is not fixed given the order in
/// the provided list.
#[derive(Debug)]
pub struct InputOrder {
    variables: Vec<DomainId>,
}

impl InputOrder {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The InputOrder variable selector was not provided with any variables");
        }
        InputOrder {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for InputOrder {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .find(|&&variable| !context.is_fixed(variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::State;

    #[test]
    fn the_first_unfixed_variable_is_selected() {
        let mut state = State::new();
        let variables = (0..3)
            .map(|_| state.new_interval_variable(0, 5).expect("non-empty"))
            .collect::<Vec<_>>();
        let _ = state.post_assign(variables[0], 2).expect("in the domain");
        let mut random = SmallRng::seed_from_u64(42);
        let mut strategy = InputOrder::new(&variables);

        let mut context = SelectionContext::new(&state, &mut random);
        assert_eq!(strategy.select_variable(&mut context), Some(variables[1]));
    }

    #[test]
    fn nothing_is_selected_when_all_variables_are_fixed() {
        let mut state = State::new();
        let variable = state.new_interval_variable(3, 3).expect("non-empty");
        let mut random = SmallRng::seed_from_u64(42);
        let mut strategy = InputOrder::new(&[variable]);

        let mut context = SelectionContext::new(&state, &mut random);
        assert_eq!(strategy.select_variable(&mut context), None);
    }
}
