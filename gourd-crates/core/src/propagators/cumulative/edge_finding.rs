//! Edge finding over task intervals.
//!
//! A task interval is the set of tasks which run within `[est_j, lct_k)` for a pair of tasks `j`
//! and `k`. If the energy of an interval exceeds the energy the resource offers over its window,
//! the resource is overloaded. Otherwise, if a task `i` outside of the interval cannot run
//! together with all of it before `lct_k`, it ends after the interval, and its start can be pushed
//! past the part of the interval's energy which does not fit next to it. The mirrored rule pulls
//! in the end of a task which has to start before an interval.
use super::task::Task;
use super::CumulativeStatistics;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::DomainId;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;

/// The bounds of a task, as far as edge finding is concerned.
#[derive(Clone, Copy, Debug)]
struct TaskBounds {
    earliest_start: i64,
    latest_completion: i64,
    height: i64,
    energy: i64,
}

/// The tasks of an interval, with their combined energy and window.
#[derive(Clone, Copy, Debug)]
struct TaskInterval {
    earliest_start: i64,
    latest_completion: i64,
    energy: i64,
}

impl TaskInterval {
    fn contains(&self, task: &TaskBounds) -> bool {
        task.earliest_start >= self.earliest_start
            && task.latest_completion <= self.latest_completion
    }
}

fn collect_bounds(context: &PropagationContext, tasks: &[Task]) -> Vec<TaskBounds> {
    tasks
        .iter()
        .map(|task| TaskBounds {
            earliest_start: i64::from(task.earliest_start(context)),
            latest_completion: i64::from(task.latest_completion(context)),
            height: i64::from(task.min_height(context)),
            energy: task.min_energy(context),
        })
        .collect()
}

/// Gathers the tasks with energy which run within `[lower, upper)`; the window of the returned
/// interval is the tightest one around those tasks.
fn task_interval(bounds: &[TaskBounds], lower: i64, upper: i64) -> Option<TaskInterval> {
    let mut interval: Option<TaskInterval> = None;
    for task in bounds.iter().filter(|task| {
        task.energy > 0 && task.earliest_start >= lower && task.latest_completion <= upper
    }) {
        let current = interval.get_or_insert(TaskInterval {
            earliest_start: task.earliest_start,
            latest_completion: task.latest_completion,
            energy: 0,
        });
        current.earliest_start = current.earliest_start.min(task.earliest_start);
        current.latest_completion = current.latest_completion.max(task.latest_completion);
        current.energy += task.energy;
    }
    interval
}

/// Ceiled division of two positive numbers.
fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}

/// Runs the overload check and both edge finding passes. Returns whether a domain changed.
pub(super) fn propagate_edge_finding(
    context: &mut PropagationContext,
    tasks: &[Task],
    capacity: DomainId,
    statistics: &mut CumulativeStatistics,
) -> Result<bool, Inconsistency> {
    let capacity = i64::from(context.upper_bound(capacity));
    let bounds = collect_bounds(context, tasks);

    let mut intervals = Vec::new();
    for lower in bounds.iter().map(|task| task.earliest_start) {
        for upper in bounds.iter().map(|task| task.latest_completion) {
            if lower >= upper {
                continue;
            }
            let Some(interval) = task_interval(&bounds, lower, upper) else {
                continue;
            };
            if interval.energy
                > capacity * (interval.latest_completion - interval.earliest_start)
            {
                statistics.num_overloads += 1;
                return Err(PropagatorConflict::new("the resource is overloaded").into());
            }
            intervals.push(interval);
        }
    }

    let mut changed = false;
    for (task, task_bounds) in tasks.iter().zip(&bounds) {
        if task_bounds.energy <= 0 {
            continue;
        }

        let mut earliest_start = task_bounds.earliest_start;
        let mut latest_completion = task_bounds.latest_completion;
        for interval in intervals.iter().filter(|interval| !interval.contains(task_bounds)) {
            let energy = interval.energy + task_bounds.energy;
            let rest_width = interval.latest_completion - interval.earliest_start;
            let rest = interval.energy - (capacity - task_bounds.height) * rest_width;
            if rest <= 0 {
                continue;
            }

            // The task ends after the interval.
            let window = interval.latest_completion
                - interval.earliest_start.min(task_bounds.earliest_start);
            if energy > capacity * window {
                earliest_start = earliest_start
                    .max(interval.earliest_start + div_ceil(rest, task_bounds.height));
            }

            // The task starts before the interval.
            let window = interval.latest_completion.max(task_bounds.latest_completion)
                - interval.earliest_start;
            if energy > capacity * window {
                latest_completion = latest_completion
                    .min(interval.latest_completion - div_ceil(rest, task_bounds.height));
            }
        }

        let mut pruned = false;
        if earliest_start > task_bounds.earliest_start {
            pruned |= context.update_lower_bound(task.start, clamp(earliest_start))?;
        }
        if latest_completion < task_bounds.latest_completion {
            pruned |= context.update_upper_bound(task.end, clamp(latest_completion))?;
        }
        if pruned {
            statistics.num_edge_finding_prunings += 1;
        }
        changed |= pruned;
    }

    Ok(changed)
}

fn clamp(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
