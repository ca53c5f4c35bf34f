//! Statistics of the engine and its propagators.
//!
//! Statistics are written through a [`StatisticOptions`] which the caller constructs (prefix,
//! optional closing line, optional casing and the writer) and hands to the engine whenever the
//! statistics should be logged; see [`State::log_statistics`](crate::State::log_statistics).
mod statistic_logger;
mod statistic_logging;

use std::fmt::Display;
use std::fmt::Write;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::StatisticOptions;

/// A loggable statistic.
///
/// See [`create_statistics_struct!`] for creating a statistic struct automatically.
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger<'_>);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, mut statistic_logger: StatisticLogger<'_>) {
        // Writing to the logger itself cannot fail; errors of the writer are dropped.
        let _ = write!(statistic_logger, "{self}");
    }
}

/// Generates a struct of statistics which logs each of its fields under the field name.
///
/// # Example
/// ```rust
/// # use gourd_core::create_statistics_struct;
/// create_statistics_struct!(Statistics {
///     number_of_calls: usize
/// });
///
/// let statistics = Statistics::default();
///
/// assert_eq!(statistics.number_of_calls, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub(crate) struct $name {
            $($(#[$variable_documentation])* pub(crate) $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, mut statistic_logger: $crate::statistics::StatisticLogger<'_>) {
                $($crate::statistics::Statistic::log(&self.$field, statistic_logger.attach_to_prefix(stringify!($field))));+
            }
        }
    };
}
