use log::debug;

use super::edge_finding::propagate_edge_finding;
use super::task::ArgTask;
use super::task::Task;
use super::time_table::create_time_table;
use super::time_table::propagate_time_table;
use super::CumulativeOptions;
use super::CumulativeStatistics;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::Inconsistency;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`CumulativePropagator`].
#[derive(Clone, Debug)]
pub struct CumulativePropagatorArgs {
    pub tasks: Vec<ArgTask>,
    pub capacity: DomainId,
    pub options: CumulativeOptions,
}

impl PropagatorConstructor for CumulativePropagatorArgs {
    type PropagatorImpl = CumulativePropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError> {
        let CumulativePropagatorArgs {
            tasks,
            capacity,
            options,
        } = self;

        for task in &tasks {
            if context.domains().lower_bound(task.duration) < 0 {
                return Err(ModelError::NegativeValue {
                    what: "the duration",
                    variable: task.duration,
                });
            }
            if context.domains().lower_bound(task.height) < 0 {
                return Err(ModelError::NegativeValue {
                    what: "the height",
                    variable: task.height,
                });
            }
        }

        // The scope is laid out as [starts, ends, durations, heights, capacity].
        let num_tasks = tasks.len() as u32;
        let tasks: Box<[Task]> = tasks
            .into_iter()
            .enumerate()
            .map(|(index, task)| Task::new(task, index))
            .collect();
        for (index, task) in tasks.iter().enumerate() {
            let index = index as u32;
            context.register(task.start, DomainEvents::BOUNDS, LocalId::from(index));
            context.register(
                task.end,
                DomainEvents::BOUNDS,
                LocalId::from(num_tasks + index),
            );
            context.register(
                task.duration,
                DomainEvents::BOUNDS,
                LocalId::from(2 * num_tasks + index),
            );
            context.register(
                task.height,
                DomainEvents::BOUNDS,
                LocalId::from(3 * num_tasks + index),
            );
        }
        context.register(capacity, DomainEvents::BOUNDS, LocalId::from(4 * num_tasks));

        debug!(
            "cumulative over {num_tasks} tasks, edge finding: {}",
            options.edge_finding
        );

        Ok(CumulativePropagator {
            tasks,
            capacity,
            options,
            statistics: CumulativeStatistics::default(),
        })
    }
}

/// Propagator for the cumulative constraint; see the [module documentation](super) for the
/// filtering rules.
///
/// Bound changes of the tasks are coalesced: the hooks only request a propagation, which then runs
/// the rules until neither of them prunes.
#[derive(Clone, Debug)]
pub struct CumulativePropagator {
    tasks: Box<[Task]>,
    capacity: DomainId,
    options: CumulativeOptions,
    statistics: CumulativeStatistics,
}

impl CumulativePropagator {
    /// Enforces `start + duration = end` on the bounds of every task.
    fn propagate_task_bounds(
        &self,
        context: &mut PropagationContext,
    ) -> Result<bool, Inconsistency> {
        let mut changed = false;
        for task in self.tasks.iter() {
            let (start, duration, end) = (task.start, task.duration, task.end);

            let bound = context.lower_bound(start) + context.lower_bound(duration);
            changed |= context.update_lower_bound(end, bound)?;
            let bound = context.upper_bound(start) + context.upper_bound(duration);
            changed |= context.update_upper_bound(end, bound)?;

            let bound = context.lower_bound(end) - context.upper_bound(duration);
            changed |= context.update_lower_bound(start, bound)?;
            let bound = context.upper_bound(end) - context.lower_bound(duration);
            changed |= context.update_upper_bound(start, bound)?;

            let bound = context.lower_bound(end) - context.upper_bound(start);
            changed |= context.update_lower_bound(duration, bound)?;
            let bound = context.upper_bound(end) - context.lower_bound(start);
            changed |= context.update_upper_bound(duration, bound)?;
        }
        Ok(changed)
    }

    /// The largest total height at the start of any task, when every task runs with the largest
    /// height it can take. Assumes the start and end of every task are fixed.
    fn max_load(&self, domains: &Domains) -> i64 {
        self.tasks
            .iter()
            .map(|task| {
                let time = domains.lower_bound(task.start);
                self.tasks
                    .iter()
                    .filter(|other| {
                        domains.lower_bound(other.start) <= time
                            && time < domains.lower_bound(other.end)
                    })
                    .map(|other| i64::from(domains.upper_bound(other.height)))
                    .sum()
            })
            .max()
            .unwrap_or(0)
    }
}

impl Propagator for CumulativePropagator {
    fn name(&self) -> &str {
        "Cumulative"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.statistics.num_calls += 1;

        loop {
            let mut changed = self.propagate_task_bounds(&mut context)?;
            changed |= propagate_time_table(
                &mut context,
                &self.tasks,
                self.capacity,
                self.options.allow_holes_in_domain,
                &mut self.statistics,
            )?;
            if self.options.edge_finding {
                changed |= propagate_edge_finding(
                    &mut context,
                    &self.tasks,
                    self.capacity,
                    &mut self.statistics,
                )?;
            }

            if !changed {
                return Ok(());
            }
        }
    }

    fn awake_on_inst(&mut self, mut context: PropagationContext, _: LocalId) -> PropagationStatus {
        context.request_propagation();
        Ok(())
    }

    fn awake_on_inf(&mut self, mut context: PropagationContext, _: LocalId) -> PropagationStatus {
        context.request_propagation();
        Ok(())
    }

    fn awake_on_sup(&mut self, mut context: PropagationContext, _: LocalId) -> PropagationStatus {
        context.request_propagation();
        Ok(())
    }

    fn is_satisfied(&self, tuple: &[i32]) -> bool {
        let num_tasks = self.tasks.len();
        let capacity = tuple[4 * num_tasks];
        let task = |index: usize| {
            (
                tuple[index],
                tuple[num_tasks + index],
                tuple[2 * num_tasks + index],
                tuple[3 * num_tasks + index],
            )
        };

        let well_formed = (0..num_tasks).all(|index| {
            let (start, end, duration, height) = task(index);
            duration >= 0 && height >= 0 && start + duration == end
        });

        well_formed
            && (0..num_tasks).all(|index| {
                let time = task(index).0;
                let load: i64 = (0..num_tasks)
                    .map(|other| task(other))
                    .filter(|&(start, end, _, _)| start <= time && time < end)
                    .map(|(_, _, _, height)| i64::from(height))
                    .sum();
                load <= i64::from(capacity)
            })
    }

    fn is_entailed(&self, domains: Domains) -> Option<bool> {
        let capacity = domains.upper_bound(self.capacity);
        let task_exceeds_capacity = self.tasks.iter().any(|task| {
            task.min_duration(&domains) > 0 && task.min_height(&domains) > capacity
        });
        let profile_exceeds_capacity = create_time_table(&domains, &self.tasks)
            .iter()
            .any(|profile| profile.height > capacity);
        if task_exceeds_capacity || profile_exceeds_capacity {
            return Some(false);
        }

        let all_fixed = self.tasks.iter().all(|task| {
            domains.is_fixed(task.start)
                && domains.is_fixed(task.duration)
                && domains.is_fixed(task.end)
        });
        if !all_fixed {
            return None;
        }

        let inconsistent_task = self.tasks.iter().any(|task| {
            domains.lower_bound(task.start) + domains.lower_bound(task.duration)
                != domains.lower_bound(task.end)
        });
        if inconsistent_task {
            return Some(false);
        }

        (self.max_load(&domains) <= i64::from(domains.lower_bound(self.capacity))).then_some(true)
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger<'_>) {
        self.statistics.log(statistic_logger);
    }
}
