use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::DeltaIterator;
use super::Domains;
use super::LocalId;
use super::PropagationContext;
use super::PropagationStatus;
use crate::statistics::StatisticLogger;

// Allows retrieving the concrete propagator from a `Box<dyn Propagator>`, e.g. to add clauses to a
// clause store after it was added to the state.
impl_downcast!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution of its
/// constraint, or reports that the constraint cannot be satisfied any more.
///
/// The required functions are [`Propagator::name`], [`Propagator::propagate`] and
/// [`Propagator::is_satisfied`]; the incremental hooks all default to `propagate`.
///
/// See the [`crate::propagation`] documentation for more details.
pub trait Propagator: Downcast {
    /// Return the name of the propagator, used for printing.
    fn name(&self) -> &str;

    /// Re-derive all prunings from the current domains.
    ///
    /// Prunings are made through the domain operations of the [`PropagationContext`]; an operation
    /// which would empty a domain returns an error which should be propagated with `?`. Other
    /// failures are reported as a [`PropagatorConflict`](super::PropagatorConflict).
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Called once for the first full propagation, after every variable event pending at the time
    /// the propagator was added has been dispatched.
    fn awake(&mut self, context: PropagationContext) -> PropagationStatus {
        self.propagate(context)
    }

    /// The variable with `local_id` became fixed. When this hook is called for an event, the
    /// other hooks are not called for the same event.
    fn awake_on_inst(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// The lower bound of the variable with `local_id` increased.
    fn awake_on_inf(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// The upper bound of the variable with `local_id` decreased.
    fn awake_on_sup(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// `value` was removed from the variable with `local_id`. The engine does not call this hook
    /// itself; an implementation of [`Propagator::awake_on_removals`] can forward each value here.
    fn awake_on_rem(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
        _value: i32,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// Values were removed from the variable with `local_id`; `removed` iterates over all of them.
    ///
    /// By default the propagator is propagated once for the whole batch.
    fn awake_on_removals(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
        _removed: DeltaIterator<'_>,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// Whether the constraint holds for a complete assignment of the variables. `tuple` holds one
    /// value per variable, indexed by the [`LocalId`] the variable was registered with.
    fn is_satisfied(&self, tuple: &[i32]) -> bool;

    /// `Some(true)` if the constraint holds for every assignment of the current domains,
    /// `Some(false)` if it holds for none of them, `None` if this cannot be decided (cheaply).
    ///
    /// The engine deactivates a propagator which reports a definite answer until backtracking.
    /// When every variable of the propagator is fixed the engine decides through
    /// [`Propagator::is_satisfied`] instead.
    fn is_entailed(&self, _domains: Domains) -> Option<bool> {
        None
    }

    /// Whether a single call leaves the propagator at fix-point with respect to its own prunings.
    /// An idempotent propagator is not woken for events it caused itself.
    fn is_idempotent(&self) -> bool {
        false
    }

    /// The [`Priority`] of the propagator, determining the order of the queued events.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the
    /// [`create_statistics_struct!`](crate::create_statistics_struct) macro.
    fn log_statistics(&self, _statistic_logger: StatisticLogger<'_>) {}
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// Propagators with high priority are propagated before propagators with low(er) priority. Events
/// of a variable are queued with the best priority among the propagators watching it.
///
/// Typically, propagators with low computational complexity should be assigned a high
/// priority (i.e., should be propagated before computationally expensive propagators).
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl Priority {
    pub const NUM_PRIORITIES: u32 = 4;
}
