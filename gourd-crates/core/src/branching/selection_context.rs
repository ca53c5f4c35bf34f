use crate::basic_types::Random;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::engine::State;
use crate::environment::Environment;
use crate::propagation::HasAssignments;
#[cfg(doc)]
use crate::propagation::ReadDomains;

/// The context provided to the [`Brancher`](super::Brancher): read access to the domains through
/// [`ReadDomains`], and the source of randomness of the search.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    state: &'a State,
    random: &'a mut dyn Random,
}

impl<'a> SelectionContext<'a> {
    pub fn new(state: &'a State, random: &'a mut dyn Random) -> Self {
        SelectionContext { state, random }
    }

    pub fn random(&mut self) -> &mut dyn Random {
        &mut *self.random
    }

    /// A value of the domain of `var`, drawn uniformly.
    pub fn random_value(&mut self, var: DomainId) -> i32 {
        self.state.random_value(var, &mut *self.random)
    }
}

impl HasAssignments for SelectionContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.state.assignments()
    }

    fn environment(&self) -> &Environment {
        self.state.environment()
    }
}
