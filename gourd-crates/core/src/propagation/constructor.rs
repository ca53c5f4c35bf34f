use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use crate::basic_types::ModelError;
use crate::engine::variables::DomainId;
use crate::engine::State;
use crate::environment::Environment;
use crate::propagation::DomainEvents;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// enqueued, for validating its configuration, and for creating the backtrackable state of the
/// propagator in the [`Environment`].
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    ///
    /// A malformed configuration (mismatched lengths, invalid relations, ...) is reported as a
    /// [`ModelError`]; the state is then left as if the propagator was never added.
    fn create(
        self,
        context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError>;
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// Propagators use it to register to domain changes of variables, to read the current domains and
/// to create their backtrackable state.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    state: &'a mut State,
    pub(crate) propagator_id: PropagatorId,
}

impl PropagatorConstructorContext<'_> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        state: &mut State,
    ) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            state,
            propagator_id,
        }
    }

    /// Get domain information.
    pub fn domains(&self) -> Domains<'_> {
        self.state.domains()
    }

    /// The environment in which the backtrackable state of the propagator is created.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.state.environment
    }

    /// Subscribes the propagator to the given [`DomainEvents`].
    ///
    /// The [`LocalId`] identifies the variable when the propagator is woken, and is the index of
    /// the value of the variable in the tuple passed to [`Propagator::is_satisfied`]. Each variable
    /// *must* have a unique [`LocalId`]; most often this is the index of the variable in the
    /// internal array of variables.
    pub fn register(&mut self, var: DomainId, domain_events: DomainEvents, local_id: LocalId) {
        self.state
            .watch_lists
            .watch(var, self.propagator_id, local_id, domain_events.events());
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }
}
