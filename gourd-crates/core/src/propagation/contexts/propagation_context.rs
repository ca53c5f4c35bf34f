use enumset::EnumSet;

use crate::basic_types::EmptyDomainConflict;
use crate::engine::notification_engine::ConstraintEvent;
use crate::engine::notification_engine::NotificationEngine;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::Assignments;
use crate::environment::Environment;
use crate::environment::StoredInt;
use crate::propagation::DomainEvent;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::PropagatorId;
#[cfg(doc)]
use crate::propagation::ReadDomains;

/// Provides information about the state of the solver to a propagator.
///
/// Domains can be read through the implementation of [`ReadDomains`], and changes to the domains
/// are made through the domain operations of the context. Every change is recorded as an event of
/// the propagator, so the engine can skip an idempotent propagator for its own changes.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) environment: &'a mut Environment,
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) notification_engine: &'a mut NotificationEngine,
    pub(crate) propagator_id: PropagatorId,
    active: StoredInt,
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn environment(&self) -> &Environment {
        self.environment
    }
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        environment: &'a mut Environment,
        assignments: &'a mut Assignments,
        notification_engine: &'a mut NotificationEngine,
        propagator_id: PropagatorId,
        active: StoredInt,
    ) -> Self {
        PropagationContext {
            environment,
            assignments,
            notification_engine,
            propagator_id,
            active,
        }
    }

    /// Get the current domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.environment)
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// The environment, for reading and writing the backtrackable state of the propagator.
    pub fn environment_mut(&mut self) -> &mut Environment {
        self.environment
    }

    /// Reborrow the current context to a new value with a shorter lifetime. Should be used when
    /// passing `Self` to another function that takes ownership, but the value is still needed
    /// afterwards.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            environment: self.environment,
            assignments: self.assignments,
            notification_engine: self.notification_engine,
            propagator_id: self.propagator_id,
            active: self.active,
        }
    }

    /// Ask for [`Propagator::propagate`] to be called once no variable events are pending.
    pub fn request_propagation(&mut self) {
        self.notification_engine
            .enqueue_constraint_event(self.propagator_id, ConstraintEvent::Propagate);
    }

    /// Deactivate the propagator until the engine backtracks past the current world; it is not
    /// woken by any event in the meantime.
    pub fn set_passive(&mut self) {
        self.active.write(self.environment, 0);
    }

    /// Remove all values smaller than `bound`. Returns whether the domain changed.
    pub fn update_lower_bound(
        &mut self,
        var: DomainId,
        bound: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        let events = self
            .assignments
            .update_lower_bound(var, bound, self.environment)
            .map_err(|_| EmptyDomainConflict { domain: var })?;
        Ok(self.record(var, events))
    }

    /// Remove all values larger than `bound`. Returns whether the domain changed.
    pub fn update_upper_bound(
        &mut self,
        var: DomainId,
        bound: i32,
    ) -> Result<bool, EmptyDomainConflict> {
        let events = self
            .assignments
            .update_upper_bound(var, bound, self.environment)
            .map_err(|_| EmptyDomainConflict { domain: var })?;
        Ok(self.record(var, events))
    }

    /// Remove `value` from the domain of `var`. Returns whether the domain changed.
    pub fn remove_value(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomainConflict> {
        let events = self
            .assignments
            .remove(var, value, self.environment)
            .map_err(|_| EmptyDomainConflict { domain: var })?;
        Ok(self.record(var, events))
    }

    /// Fix `var` to `value`. Assigning a value outside of the domain is a conflict.
    pub fn instantiate(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomainConflict> {
        let events = self
            .assignments
            .instantiate(var, value, self.environment)
            .map_err(|_| EmptyDomainConflict { domain: var })?;
        Ok(self.record(var, events))
    }

    /// Make `literal` true.
    pub fn assign_literal(&mut self, literal: Literal) -> Result<bool, EmptyDomainConflict> {
        self.instantiate(literal.domain(), literal.true_value())
    }

    fn record(&mut self, var: DomainId, events: EnumSet<DomainEvent>) -> bool {
        let changed = !events.is_empty();
        self.notification_engine
            .record_domain_event(var, events, Some(self.propagator_id));
        changed
    }
}
