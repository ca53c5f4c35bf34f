//! Writing statistics with a specific prefix and closing line.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use convert_case::Case;
use convert_case::Casing;

use super::StatisticLogger;

/// Where and how statistics are written. Each statistic is written on its own line in the form
/// `{PREFIX} {NAME}={VALUE}`.
pub struct StatisticOptions {
    statistic_prefix: String,
    /// Printed after all statistics have been printed.
    after_statistics: Option<String>,
    statistics_casing: Option<Case>,
    statistics_writer: Box<dyn Write>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("statistic_prefix", &self.statistic_prefix)
            .field("after_statistics", &self.after_statistics)
            .field("statistics_casing", &self.statistics_casing)
            .field("statistics_writer", &"<Writer>")
            .finish()
    }
}

impl StatisticOptions {
    pub fn new(
        prefix: impl Into<String>,
        after: Option<String>,
        casing: Option<Case>,
        writer: Box<dyn Write>,
    ) -> Self {
        StatisticOptions {
            statistic_prefix: prefix.into(),
            after_statistics: after,
            statistics_casing: casing,
            statistics_writer: writer,
        }
    }

    /// A logger whose statistic names all start with `name_prefix`.
    pub fn logger(&mut self, name_prefix: impl Display) -> StatisticLogger<'_> {
        StatisticLogger::new(self, name_prefix)
    }

    pub fn log_statistic(&mut self, name: impl Display, value: impl Display) {
        let name = match self.statistics_casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let _ = writeln!(
            self.statistics_writer,
            "{} {name}={value}",
            self.statistic_prefix
        );
    }

    /// Some output formats require a block of statistics to be followed by a closing line; this
    /// writes it if one is configured.
    pub fn log_statistic_postfix(&mut self) {
        if let Some(postfix) = &self.after_statistics {
            let _ = writeln!(self.statistics_writer, "{postfix}");
        }
    }
}
