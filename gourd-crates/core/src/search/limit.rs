//! Limits which end a search before it is complete.

/// Consulted by [`DepthFirstSearch`](super::DepthFirstSearch) before every node. Once the limit is
/// reached the search gives up with [`SearchResult::Unknown`](super::SearchResult::Unknown).
pub trait SearchLimit {
    fn is_reached(&self) -> bool;

    /// The search took a decision and opened a world for it.
    fn on_decision(&mut self) {}

    /// The search met a contradiction and backtracks.
    fn on_failure(&mut self) {}
}

/// A budget of decisions and of failures. The search stops as soon as either count reaches its
/// maximum; without maxima it runs until it is complete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchBudget {
    max_decisions: Option<u64>,
    max_failures: Option<u64>,
    num_decisions: u64,
    num_failures: u64,
}

impl SearchBudget {
    pub fn unlimited() -> SearchBudget {
        SearchBudget::default()
    }

    pub fn with_max_decisions(self, max_decisions: u64) -> SearchBudget {
        SearchBudget {
            max_decisions: Some(max_decisions),
            ..self
        }
    }

    pub fn with_max_failures(self, max_failures: u64) -> SearchBudget {
        SearchBudget {
            max_failures: Some(max_failures),
            ..self
        }
    }

    pub fn num_decisions(&self) -> u64 {
        self.num_decisions
    }

    pub fn num_failures(&self) -> u64 {
        self.num_failures
    }
}

impl SearchLimit for SearchBudget {
    fn is_reached(&self) -> bool {
        self.max_decisions
            .is_some_and(|max| self.num_decisions >= max)
            || self.max_failures.is_some_and(|max| self.num_failures >= max)
    }

    fn on_decision(&mut self) {
        self.num_decisions += 1;
    }

    fn on_failure(&mut self) {
        self.num_failures += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_first_exhausted_count_reaches_the_limit() {
        let mut budget = SearchBudget::unlimited()
            .with_max_decisions(3)
            .with_max_failures(1);
        budget.on_decision();
        assert!(!budget.is_reached());

        budget.on_failure();
        assert!(budget.is_reached());
        assert_eq!(1, budget.num_decisions());
    }

    #[test]
    fn an_unlimited_budget_is_never_reached() {
        let mut budget = SearchBudget::unlimited();
        for _ in 0..1_000 {
            budget.on_decision();
            budget.on_failure();
        }

        assert!(!budget.is_reached());
    }
}
