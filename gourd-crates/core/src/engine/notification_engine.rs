use enumset::EnumSet;

use super::event_queue::EventQueue;
use super::events::DomainEvent;
use super::events::VariableEvent;
use super::variables::DomainId;
use super::Assignments;
use crate::containers::KeyedVec;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;

/// A request for a propagator to be called outside of the variable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintEvent {
    /// The first full propagation after the propagator was added.
    Awake,
    /// A propagation the propagator asked for itself.
    Propagate,
}

/// The pending work of the engine: one event record per variable, queued by priority, and the
/// constraint-awake queue which is only drained when no variable event is pending.
#[derive(Debug, Default)]
pub(crate) struct NotificationEngine {
    variable_events: KeyedVec<DomainId, VariableEvent>,
    variable_priorities: KeyedVec<DomainId, Priority>,
    variable_queue: EventQueue<DomainId>,
    constraint_events: KeyedVec<PropagatorId, Option<ConstraintEvent>>,
    constraint_priorities: KeyedVec<PropagatorId, Priority>,
    constraint_queue: EventQueue<PropagatorId>,
}

impl NotificationEngine {
    pub(crate) fn new(num_priority_levels: u32) -> Self {
        NotificationEngine {
            variable_queue: EventQueue::new(num_priority_levels),
            constraint_queue: EventQueue::new(num_priority_levels),
            ..Default::default()
        }
    }

    pub(crate) fn grow(&mut self) {
        let _ = self.variable_events.push(VariableEvent::default());
        let _ = self.variable_priorities.push(Priority::VeryLow);
    }

    pub(crate) fn register_propagator(&mut self, propagator: PropagatorId, priority: Priority) {
        self.constraint_events.accomodate(propagator, None);
        self.constraint_priorities
            .accomodate(propagator, Priority::VeryLow);
        self.constraint_priorities[propagator] = priority;
    }

    /// Events of `var` are queued with the best priority among its watchers.
    pub(crate) fn watch_with_priority(&mut self, var: DomainId, priority: Priority) {
        let current = &mut self.variable_priorities[var];
        *current = (*current).min(priority);
    }

    pub(crate) fn record_domain_event(
        &mut self,
        var: DomainId,
        events: EnumSet<DomainEvent>,
        cause: Option<PropagatorId>,
    ) {
        if events.is_empty() {
            return;
        }

        self.variable_events[var].add(events, cause);
        self.variable_queue
            .enqueue(var, self.variable_priorities[var]);
    }

    pub(crate) fn enqueue_constraint_event(
        &mut self,
        propagator: PropagatorId,
        event: ConstraintEvent,
    ) {
        let pending = &mut self.constraint_events[propagator];
        *pending = match (*pending, event) {
            (Some(ConstraintEvent::Awake), _) | (_, ConstraintEvent::Awake) => {
                Some(ConstraintEvent::Awake)
            }
            _ => Some(ConstraintEvent::Propagate),
        };
        self.constraint_queue
            .enqueue(propagator, self.constraint_priorities[propagator]);
    }

    /// Whether the first propagation of `propagator` is still pending; such a propagator is not
    /// woken by variable events.
    pub(crate) fn is_awaiting_awake(&self, propagator: PropagatorId) -> bool {
        self.constraint_events.get(propagator).copied().flatten() == Some(ConstraintEvent::Awake)
    }

    pub(crate) fn pop_variable_event(&mut self) -> Option<(DomainId, VariableEvent)> {
        let var = self.variable_queue.pop()?;
        Some((var, std::mem::take(&mut self.variable_events[var])))
    }

    pub(crate) fn pop_constraint_event(&mut self) -> Option<(PropagatorId, ConstraintEvent)> {
        let propagator = self.constraint_queue.pop()?;
        let event = self.constraint_events[propagator]
            .take()
            .unwrap_or(ConstraintEvent::Propagate);
        Some((propagator, event))
    }

    pub(crate) fn has_variable_events(&self) -> bool {
        !self.variable_queue.is_empty()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.variable_queue.is_empty() && self.constraint_queue.is_empty()
    }

    /// Discard everything that is pending, including the deltas of the queued variables.
    ///
    /// Propagators which were still waiting for their first propagation stay queued for it.
    pub(crate) fn flush(&mut self, assignments: &mut Assignments) {
        while let Some((var, _)) = self.pop_variable_event() {
            assignments.clear_delta(var);
        }

        let mut awaiting = vec![];
        while let Some((propagator, event)) = self.pop_constraint_event() {
            if event == ConstraintEvent::Awake {
                awaiting.push(propagator);
            }
        }
        for propagator in awaiting {
            self.enqueue_constraint_event(propagator, ConstraintEvent::Awake);
        }
    }

    pub(crate) fn num_pending_variable_events(&self) -> usize {
        self.variable_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn variable_is_queued_once_with_combined_events() {
        let mut notifications = NotificationEngine::new(Priority::NUM_PRIORITIES);
        notifications.grow();
        let x = DomainId::create_from_index(0);

        notifications.record_domain_event(x, enum_set!(DomainEvent::LowerBound), None);
        notifications.record_domain_event(x, enum_set!(DomainEvent::Removal), None);
        assert_eq!(1, notifications.num_pending_variable_events());

        let (var, event) = notifications.pop_variable_event().expect("queued");
        assert_eq!(x, var);
        assert_eq!(
            enum_set!(DomainEvent::LowerBound | DomainEvent::Removal),
            event.mask
        );
        assert!(notifications.is_empty());
    }

    #[test]
    fn awake_is_not_downgraded_by_propagation_requests() {
        let mut notifications = NotificationEngine::new(Priority::NUM_PRIORITIES);
        let propagator = PropagatorId(0);
        notifications.register_propagator(propagator, Priority::Low);

        notifications.enqueue_constraint_event(propagator, ConstraintEvent::Awake);
        notifications.enqueue_constraint_event(propagator, ConstraintEvent::Propagate);
        assert!(notifications.is_awaiting_awake(propagator));

        assert_eq!(
            Some((propagator, ConstraintEvent::Awake)),
            notifications.pop_constraint_event()
        );
        assert_eq!(None, notifications.pop_constraint_event());
    }
}
