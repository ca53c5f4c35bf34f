use super::task::Task;
use super::CumulativeStatistics;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::DomainId;
use crate::gourd_asserts::gourd_assert_extreme;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;

/// A maximal segment `[start, end)` of the time-table in which the same tasks have their
/// compulsory part, using `height` units of the resource in total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ResourceProfile {
    pub(super) start: i32,
    pub(super) end: i32,
    pub(super) height: i32,
    /// The ids of the tasks which contribute to the profile.
    pub(super) tasks: Vec<usize>,
}

impl ResourceProfile {
    /// The height of the profile when the compulsory part of `task` is left out.
    fn height_without(&self, task: &Task, min_height: i32) -> i32 {
        if self.tasks.contains(&task.id) {
            self.height - min_height
        } else {
            self.height
        }
    }
}

/// The start or end of a compulsory part.
#[derive(Clone, Copy, Debug)]
struct Event {
    time_stamp: i32,
    change_in_resource_usage: i32,
    task: usize,
}

/// Creates the time-table of the compulsory parts of `tasks`, sorted on start time. Consecutive
/// profiles do not overlap, and profiles of height zero are left out.
pub(super) fn create_time_table(
    domains: &impl ReadDomains,
    tasks: &[Task],
) -> Vec<ResourceProfile> {
    let mut events = Vec::new();
    for task in tasks {
        let height = task.min_height(domains);
        if height > 0 && task.has_compulsory_part(domains) {
            events.push(Event {
                time_stamp: task.latest_start(domains),
                change_in_resource_usage: height,
                task: task.id,
            });
            events.push(Event {
                time_stamp: task.earliest_completion(domains),
                change_in_resource_usage: -height,
                task: task.id,
            });
        }
    }
    // On ties, the ends of compulsory parts come first.
    events.sort_by_key(|event| (event.time_stamp, event.change_in_resource_usage, event.task));

    let mut time_table: Vec<ResourceProfile> = Vec::new();
    let mut current_tasks: Vec<usize> = Vec::new();
    let mut current_height = 0;
    let mut previous_time_stamp = i32::MIN;

    for event in events {
        if event.time_stamp != previous_time_stamp && current_height > 0 {
            time_table.push(ResourceProfile {
                start: previous_time_stamp,
                end: event.time_stamp,
                height: current_height,
                tasks: current_tasks.clone(),
            });
        }

        current_height += event.change_in_resource_usage;
        if event.change_in_resource_usage > 0 {
            current_tasks.push(event.task);
        } else {
            current_tasks.retain(|&task| task != event.task);
        }
        previous_time_stamp = event.time_stamp;
    }

    gourd_assert_extreme!(
        time_table
            .windows(2)
            .all(|profiles| profiles[0].end <= profiles[1].start),
        "the profiles are sorted and do not overlap"
    );
    time_table
}

/// Checks the time-table against the capacity and moves every task out of the profiles in which
/// it does not fit. Returns whether a domain changed.
pub(super) fn propagate_time_table(
    context: &mut PropagationContext,
    tasks: &[Task],
    capacity: DomainId,
    allow_holes_in_domain: bool,
    statistics: &mut CumulativeStatistics,
) -> Result<bool, Inconsistency> {
    let time_table = create_time_table(context, tasks);

    let max_height = time_table
        .iter()
        .map(|profile| profile.height)
        .max()
        .unwrap_or(0);
    if max_height > context.upper_bound(capacity) {
        statistics.num_overloads += 1;
        return Err(PropagatorConflict::new("the resource is overloaded").into());
    }

    let mut changed = context.update_lower_bound(capacity, max_height)?;
    for task in tasks {
        let duration = task.min_duration(context);
        let height = task.min_height(context);
        if duration <= 0 || height <= 0 {
            continue;
        }

        // A task which runs at some point needs its full height.
        changed |= context.update_lower_bound(capacity, height)?;

        let pruned = if allow_holes_in_domain {
            remove_overloaded_starts(context, task, &time_table, capacity)?
        } else {
            sweep_forward(context, task, &time_table, capacity)?
                | sweep_backward(context, task, &time_table, capacity)?
        };
        if pruned {
            statistics.num_time_table_prunings += 1;
        }
        changed |= pruned;
    }

    Ok(changed)
}

fn overloads(
    context: &PropagationContext,
    task: &Task,
    profile: &ResourceProfile,
    capacity: DomainId,
) -> bool {
    let height = task.min_height(context);
    profile.height_without(task, height) + height > context.upper_bound(capacity)
}

/// Propagates the lower-bound of the start of `task`, making use of the fact that the
/// `time_table` is sorted chronologically.
fn sweep_forward(
    context: &mut PropagationContext,
    task: &Task,
    time_table: &[ResourceProfile],
    capacity: DomainId,
) -> Result<bool, Inconsistency> {
    let duration = task.min_duration(context);
    let mut earliest_start = task.earliest_start(context);

    for profile in time_table {
        if profile.end <= earliest_start {
            continue;
        }
        if profile.start >= earliest_start + duration {
            break;
        }
        if overloads(context, task, profile, capacity) {
            earliest_start = profile.end;
        }
    }

    Ok(context.update_lower_bound(task.start, earliest_start)?)
}

/// Propagates the upper-bound of the end of `task`; the mirror of [`sweep_forward`].
fn sweep_backward(
    context: &mut PropagationContext,
    task: &Task,
    time_table: &[ResourceProfile],
    capacity: DomainId,
) -> Result<bool, Inconsistency> {
    let duration = task.min_duration(context);
    let mut latest_completion = task.latest_completion(context);

    for profile in time_table.iter().rev() {
        if profile.start >= latest_completion {
            continue;
        }
        if profile.end <= latest_completion - duration {
            break;
        }
        if overloads(context, task, profile, capacity) {
            latest_completion = profile.start;
        }
    }

    Ok(context.update_upper_bound(task.end, latest_completion)?)
}

/// Removes every start time of `task` for which it would overlap a profile in which it does not
/// fit.
fn remove_overloaded_starts(
    context: &mut PropagationContext,
    task: &Task,
    time_table: &[ResourceProfile],
    capacity: DomainId,
) -> Result<bool, Inconsistency> {
    let duration = task.min_duration(context);
    let mut changed = false;

    for profile in time_table {
        if !overloads(context, task, profile, capacity) {
            continue;
        }

        let first = i32::max(task.earliest_start(context), profile.start - duration + 1);
        let last = i32::min(task.latest_start(context), profile.end - 1);
        for value in first..=last {
            if context.contains(task.start, value) {
                changed |= context.remove_value(task.start, value)?;
            }
        }
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagators::cumulative::ArgTask;

    fn task(solver: &mut TestSolver, id: usize, start: (i32, i32), duration: i32) -> Task {
        let start_variable = solver.new_variable(start.0, start.1);
        let duration_variable = solver.new_variable(duration, duration);
        let end = solver.new_variable(start.0 + duration, start.1 + duration);
        let height = solver.new_variable(1, 1);
        Task::new(
            ArgTask {
                start: start_variable,
                duration: duration_variable,
                end,
                height,
            },
            id,
        )
    }

    #[test]
    fn profiles_are_maximal_segments_of_compulsory_parts() {
        let mut solver = TestSolver::default();
        let tasks = vec![
            task(&mut solver, 0, (0, 1), 4),
            task(&mut solver, 1, (2, 3), 3),
            task(&mut solver, 2, (0, 5), 1),
        ];

        let time_table = create_time_table(&solver, &tasks);

        assert_eq!(
            time_table,
            vec![
                ResourceProfile {
                    start: 1,
                    end: 3,
                    height: 1,
                    tasks: vec![0],
                },
                ResourceProfile {
                    start: 3,
                    end: 4,
                    height: 2,
                    tasks: vec![0, 1],
                },
                ResourceProfile {
                    start: 4,
                    end: 5,
                    height: 1,
                    tasks: vec![1],
                },
            ]
        );
    }

    #[test]
    fn touching_compulsory_parts_do_not_overlap() {
        let mut solver = TestSolver::default();
        let tasks = vec![
            task(&mut solver, 0, (0, 0), 2),
            task(&mut solver, 1, (2, 2), 2),
        ];

        let time_table = create_time_table(&solver, &tasks);

        assert_eq!(time_table.len(), 2);
        assert!(time_table.iter().all(|profile| profile.height == 1));
    }
}
