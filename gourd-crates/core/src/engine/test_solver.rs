//! This module exposes helpers that aid testing of propagators. The [`TestSolver`] allows setting
//! up specific scenarios under which to test the various operations of a propagator.
use super::domains::DomainKind;
use super::variables::DomainId;
use super::variables::Literal;
use super::Assignments;
use super::State;
use crate::basic_types::Contradiction;
use crate::environment::Environment;
use crate::environment::World;
use crate::propagation::HasAssignments;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagation::ReadDomains;

/// A container for variables and propagators, which can be used to test propagators.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl HasAssignments for TestSolver {
    fn assignments(&self) -> &Assignments {
        &self.state.assignments
    }

    fn environment(&self) -> &Environment {
        &self.state.environment
    }
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state
            .new_interval_variable(lb, ub)
            .expect("non-empty domain")
    }

    pub(crate) fn new_variable_with_kind(&mut self, lb: i32, ub: i32, kind: DomainKind) -> DomainId {
        self.state
            .new_interval_variable_with_kind(lb, ub, kind)
            .expect("non-empty domain")
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.state
            .new_sparse_variable(values)
            .expect("non-empty domain")
    }

    pub(crate) fn new_literal(&mut self) -> Literal {
        Literal::new(self.state.new_boolean_variable())
    }

    /// Add the propagator and propagate to a fixed point.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Contradiction>
    where
        Constructor: PropagatorConstructor,
    {
        let handle = self
            .state
            .add_propagator(constructor)
            .expect("the propagator is well-formed");
        self.state.propagate_to_fixed_point()?;
        Ok(handle)
    }

    pub(crate) fn propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> &P {
        self.state
            .get_propagator(handle)
            .expect("the handle refers to a propagator of this type")
    }

    pub(crate) fn propagate(&mut self) -> Result<(), Contradiction> {
        self.state.propagate_to_fixed_point()
    }

    pub(crate) fn increase_lower_bound(
        &mut self,
        var: DomainId,
        bound: i32,
    ) -> Result<(), Contradiction> {
        let _ = self.state.post_lower_bound(var, bound)?;
        self.propagate()
    }

    pub(crate) fn decrease_upper_bound(
        &mut self,
        var: DomainId,
        bound: i32,
    ) -> Result<(), Contradiction> {
        let _ = self.state.post_upper_bound(var, bound)?;
        self.propagate()
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) -> Result<(), Contradiction> {
        let _ = self.state.post_remove(var, value)?;
        self.propagate()
    }

    pub(crate) fn assign(&mut self, var: DomainId, value: i32) -> Result<(), Contradiction> {
        let _ = self.state.post_assign(var, value)?;
        self.propagate()
    }

    pub(crate) fn world_push(&mut self) -> World {
        self.state.world_push()
    }

    pub(crate) fn restore_to(&mut self, world: World) {
        self.state.restore_to(world)
    }

    pub(crate) fn values(&self, var: DomainId) -> Vec<i32> {
        self.iterate_domain(var).collect()
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub), (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }
}
