use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

use crate::propagation::PropagatorId;

/// The kinds of changes a domain can undergo. A single domain operation can produce several of
/// them: every operation which removes values produces [`DomainEvent::Removal`], together with
/// the bound events of the bounds that moved and [`DomainEvent::Instantiate`] if one value is left.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    Instantiate,
    LowerBound,
    UpperBound,
    Removal,
}

/// The events a propagator subscribes to for one of its variables.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Lower and upper bound changes.
    pub const BOUNDS: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound));
    /// Every change.
    pub const ANY: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Instantiate
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    ));
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::UpperBound));
    /// The variable became fixed.
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Instantiate));
    /// Values were removed. Since every change removes values, a propagator which only subscribes
    /// to this is always woken through its removal hook with the full delta.
    pub const REMOVAL: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Removal));

    pub const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }
}

/// The pending change of one variable: every event raised since the variable was last dispatched,
/// and the propagator which raised them.
///
/// There is one record per variable which is reused; a variable is in the queue at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VariableEvent {
    pub(crate) mask: EnumSet<DomainEvent>,
    pub(crate) cause: EventCause,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum EventCause {
    /// No event is pending.
    #[default]
    Nothing,
    /// All pending events come from this propagator.
    Propagator(PropagatorId),
    /// The events come from the search, or from more than one propagator.
    Unknown,
}

impl VariableEvent {
    pub(crate) fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub(crate) fn add(&mut self, events: EnumSet<DomainEvent>, cause: Option<PropagatorId>) {
        self.cause = match (self.cause, cause) {
            (EventCause::Nothing, Some(propagator)) => EventCause::Propagator(propagator),
            (EventCause::Propagator(current), Some(propagator)) if current == propagator => {
                EventCause::Propagator(propagator)
            }
            _ => EventCause::Unknown,
        };
        self.mask |= events;
    }

    pub(crate) fn caused_by(&self, propagator: PropagatorId) -> bool {
        self.cause == EventCause::Propagator(propagator)
    }
}
