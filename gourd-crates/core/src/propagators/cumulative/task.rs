use crate::engine::variables::DomainId;
use crate::propagation::ReadDomains;

/// A task of a [`CumulativePropagator`](super::CumulativePropagator): it starts at `start`, runs
/// for `duration` time units and ends at `end`, using `height` units of the resource throughout.
///
/// Durations and heights may not be negative.
#[derive(Clone, Copy, Debug)]
pub struct ArgTask {
    pub start: DomainId,
    pub duration: DomainId,
    pub end: DomainId,
    pub height: DomainId,
}

/// Structure which stores the variables related to a task, together with its index in the
/// propagator.
#[derive(Clone, Copy, Debug)]
pub(super) struct Task {
    pub(super) start: DomainId,
    pub(super) duration: DomainId,
    pub(super) end: DomainId,
    pub(super) height: DomainId,
    pub(super) id: usize,
}

impl Task {
    pub(super) fn new(task: ArgTask, id: usize) -> Task {
        Task {
            start: task.start,
            duration: task.duration,
            end: task.end,
            height: task.height,
            id,
        }
    }

    pub(super) fn earliest_start(&self, domains: &impl ReadDomains) -> i32 {
        domains.lower_bound(self.start)
    }

    pub(super) fn latest_start(&self, domains: &impl ReadDomains) -> i32 {
        domains.upper_bound(self.start)
    }

    pub(super) fn earliest_completion(&self, domains: &impl ReadDomains) -> i32 {
        domains.lower_bound(self.end)
    }

    pub(super) fn latest_completion(&self, domains: &impl ReadDomains) -> i32 {
        domains.upper_bound(self.end)
    }

    pub(super) fn min_duration(&self, domains: &impl ReadDomains) -> i32 {
        domains.lower_bound(self.duration)
    }

    pub(super) fn min_height(&self, domains: &impl ReadDomains) -> i32 {
        domains.lower_bound(self.height)
    }

    /// The energy the task consumes in every schedule.
    pub(super) fn min_energy(&self, domains: &impl ReadDomains) -> i64 {
        i64::from(self.min_duration(domains)) * i64::from(self.min_height(domains))
    }

    /// Whether the task runs in `[latest start, earliest completion)` in every schedule.
    pub(super) fn has_compulsory_part(&self, domains: &impl ReadDomains) -> bool {
        self.latest_start(domains) < self.earliest_completion(domains)
    }
}
