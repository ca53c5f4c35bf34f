use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`BinaryNotEqualsPropagator`].
#[derive(Clone, Debug)]
pub struct BinaryNotEqualsPropagatorArgs {
    pub a: DomainId,
    pub b: DomainId,
    pub offset: i32,
}

impl PropagatorConstructor for BinaryNotEqualsPropagatorArgs {
    type PropagatorImpl = BinaryNotEqualsPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError> {
        let BinaryNotEqualsPropagatorArgs { a, b, offset } = self;

        // We only care about the case where one of the two is assigned
        context.register(a, DomainEvents::ASSIGN, LocalId::from(0));
        context.register(b, DomainEvents::ASSIGN, LocalId::from(1));

        Ok(BinaryNotEqualsPropagator { a, b, offset })
    }
}

/// Propagator for the constraint `a != b + offset`.
#[derive(Clone, Debug)]
pub struct BinaryNotEqualsPropagator {
    a: DomainId,
    b: DomainId,
    offset: i32,
}

impl Propagator for BinaryNotEqualsPropagator {
    fn name(&self) -> &str {
        "BinaryNotEq"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        // Removing the value of a fixed variable from the other domain cannot fix the other
        // variable to a value which has to be removed from the first one, so one pass suffices.
        if let Some(value) = context.fixed_value(self.a) {
            let _ = context.remove_value(self.b, value - self.offset)?;
        }
        if let Some(value) = context.fixed_value(self.b) {
            let _ = context.remove_value(self.a, value + self.offset)?;
        }

        Ok(())
    }

    fn is_satisfied(&self, tuple: &[i32]) -> bool {
        tuple[0] != tuple[1] + self.offset
    }

    fn is_entailed(&self, domains: Domains) -> Option<bool> {
        let a_lb = domains.lower_bound(self.a);
        let a_ub = domains.upper_bound(self.a);
        let b_lb = domains.lower_bound(self.b) + self.offset;
        let b_ub = domains.upper_bound(self.b) + self.offset;

        if a_ub < b_lb || b_ub < a_lb {
            return Some(true);
        }

        match (domains.fixed_value(self.a), domains.fixed_value(self.b)) {
            (Some(a), Some(b)) => Some(a != b + self.offset),
            (Some(a), None) => (!domains.contains(self.b, a - self.offset)).then_some(true),
            (None, Some(b)) => (!domains.contains(self.a, b + self.offset)).then_some(true),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn detects_conflict() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 0);
        let b = solver.new_variable(0, 0);

        let _ = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b, offset: 0 })
            .expect_err("Expected conflict to be detected");
    }

    #[test]
    fn propagate_when_one_is_fixed() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(3, 3);
        let b = solver.new_variable(0, 5);

        let _ = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b, offset: 1 })
            .expect("no conflict");

        assert!(!solver.contains(b, 2));
        assert_eq!(5, solver.size(b));
    }

    #[test]
    fn propagates_on_assignment() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 5);
        let b = solver.new_variable(0, 5);
        let handle = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b, offset: 0 })
            .expect("no conflict");
        assert_eq!(None, solver.state.is_entailed(handle));

        solver.assign(b, 4).expect("no conflict");

        assert!(!solver.contains(a, 4));
        assert_eq!(Some(true), solver.state.is_entailed(handle));
    }

    #[test]
    fn disjoint_domains_are_entailed() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 2);
        let b = solver.new_variable(5, 8);
        let handle = solver
            .new_propagator(BinaryNotEqualsPropagatorArgs { a, b, offset: 0 })
            .expect("no conflict");

        assert_eq!(Some(true), solver.state.is_entailed(handle));
        assert!(!solver.state.is_active(handle.propagator_id()));
    }
}
