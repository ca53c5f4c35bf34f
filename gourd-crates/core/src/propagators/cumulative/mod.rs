//! The cumulative resource constraint: at every point in time, the total height of the tasks
//! which are running may not exceed the capacity of the resource.
//!
//! The [`CumulativePropagator`] combines two filtering rules, applied until neither prunes further:
//! - time-tabling, which sweeps over the profile of the compulsory parts of the tasks (the interval
//!   `[latest start, earliest completion)` in which a task runs in every schedule) and moves tasks
//!   out of the segments in which they do not fit [1];
//! - optionally, edge finding over task intervals, which compares the energy of a set of tasks with
//!   the energy available in their time window [2].
//!
//! Every task is given by a start, a duration, an end and a height variable, linked by
//! `start + duration = end`.
//!
//! # Bibliography
//! \[1\] A. Schutt, Improving scheduling by learning. University of Melbourne, Department of
//! Computer Science and Software Engineering, 2011.
//!
//! \[2\] P. Vilím, ‘Edge finding filtering algorithm for discrete cumulative resources in
//! O(kn log n)’, in Principles and Practice of Constraint Programming (CP 2009), 2009, pp.
//! 802–816.
mod edge_finding;
mod options;
mod propagator;
mod task;
mod time_table;

pub use options::CumulativeOptions;
pub use propagator::*;
pub use task::ArgTask;

use crate::create_statistics_struct;

create_statistics_struct!(CumulativeStatistics {
    num_calls: u64,
    num_time_table_prunings: u64,
    num_edge_finding_prunings: u64,
    num_overloads: u64,
});
