use std::fmt::Display;

use super::StatisticOptions;

/// Logs statistics under a name prefix; attaching to the prefix gives a logger for a nested
/// component, e.g. a single propagator.
#[derive(Debug)]
pub struct StatisticLogger<'a> {
    options: &'a mut StatisticOptions,
    name_prefix: String,
}

impl<'a> StatisticLogger<'a> {
    pub(crate) fn new(options: &'a mut StatisticOptions, name_prefix: impl Display) -> Self {
        Self {
            options,
            name_prefix: name_prefix.to_string(),
        }
    }

    pub fn attach_to_prefix(&mut self, addition_to_prefix: impl Display) -> StatisticLogger<'_> {
        let name_prefix = if self.name_prefix.is_empty() {
            addition_to_prefix.to_string()
        } else {
            format!("{}_{}", self.name_prefix, addition_to_prefix)
        };
        StatisticLogger {
            options: &mut *self.options,
            name_prefix,
        }
    }
}

impl std::fmt::Write for StatisticLogger<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.options.log_statistic(&self.name_prefix, s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    use convert_case::Case;

    use crate::statistics::Statistic;
    use crate::statistics::StatisticOptions;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    crate::create_statistics_struct!(ExampleStatistics {
        num_calls: usize,
        num_prunings: u64,
    });

    #[test]
    fn statistics_are_written_with_prefix_casing_and_postfix() {
        let buffer = SharedBuffer::default();
        let mut options = StatisticOptions::new(
            "%%%mzn-stat:",
            Some("%%%mzn-stat-end".to_owned()),
            Some(Case::Camel),
            Box::new(buffer.clone()),
        );

        let statistics = ExampleStatistics {
            num_calls: 3,
            num_prunings: 10,
        };
        statistics.log(options.logger("table"));
        options.log_statistic_postfix();

        let written = String::from_utf8(buffer.0.borrow().clone()).expect("utf8");
        assert_eq!(
            "%%%mzn-stat: tableNumCalls=3\n%%%mzn-stat: tableNumPrunings=10\n%%%mzn-stat-end\n",
            written
        );
    }
}
