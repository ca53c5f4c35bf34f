use log::debug;
use log::trace;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::SearchLimit;
use crate::basic_types::Random;
use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::branching::Decision;
use crate::branching::SelectionContext;
use crate::create_statistics_struct;
use crate::engine::State;
use crate::environment::World;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticOptions;

/// The result of [`DepthFirstSearch::solve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// Indicates that a solution was found.
    Satisfiable(Solution),
    /// Indicates that there is no solution.
    Unsatisfiable,
    /// Indicates that it is not known whether a solution exists, as the [`SearchLimit`]
    /// triggered first.
    Unknown,
}

create_statistics_struct!(SearchStatistics {
    num_decisions: u64,
    num_failures: u64,
    max_depth: u64,
});

/// Chronological backtracking search over binary decisions.
///
/// Every decision `x = v` opens a world for its left branch. When a branch fails, the search
/// restores the world of the most recent open decision and continues with its right branch
/// `x != v` in that same world.
#[derive(Debug)]
pub struct DepthFirstSearch {
    random: Box<dyn Random>,
    statistics: SearchStatistics,
}

impl Default for DepthFirstSearch {
    fn default() -> Self {
        DepthFirstSearch::new(SmallRng::seed_from_u64(42))
    }
}

impl DepthFirstSearch {
    /// Creates a search which uses `random` for the randomised strategies of the brancher.
    pub fn new(random: impl Random + 'static) -> Self {
        DepthFirstSearch {
            random: Box::new(random),
            statistics: SearchStatistics::default(),
        }
    }

    /// Searches for an assignment of every variable of the state which satisfies all propagators.
    ///
    /// The state is first propagated in its current world; the search itself runs in worlds on top
    /// of it which are all closed again before returning, so the state ends up as it was after
    /// that first propagation.
    pub fn solve(
        &mut self,
        state: &mut State,
        brancher: &mut impl Brancher,
        limit: &mut impl SearchLimit,
    ) -> SearchResult {
        if let Err(contradiction) = state.propagate_to_fixed_point() {
            debug!("contradiction before search: {contradiction}");
            return SearchResult::Unsatisfiable;
        }

        let root = state.world_push();
        let mut open_decisions: Vec<(World, Decision)> = Vec::new();

        let result = 'search: loop {
            if limit.is_reached() {
                break SearchResult::Unknown;
            }

            let mut consistent = state.propagate_to_fixed_point().is_ok();
            if consistent {
                let mut context = SelectionContext::new(state, self.random.as_mut());
                let decision = brancher
                    .next_decision(&mut context)
                    .or_else(|| Self::first_unfixed(state));
                let Some(decision) = decision else {
                    break state
                        .solution()
                        .map_or(SearchResult::Unknown, SearchResult::Satisfiable);
                };

                trace!("decision {decision}");
                self.statistics.num_decisions += 1;
                limit.on_decision();
                let world = state.world_push();
                open_decisions.push((world, decision));
                self.statistics.max_depth =
                    self.statistics.max_depth.max(open_decisions.len() as u64);
                consistent = state
                    .post_assign(decision.variable, decision.value)
                    .is_ok();
            }
            if consistent {
                continue;
            }

            // Backtrack to the most recent decision whose right branch is not empty.
            loop {
                self.statistics.num_failures += 1;
                limit.on_failure();

                let Some((world, decision)) = open_decisions.pop() else {
                    break 'search SearchResult::Unsatisfiable;
                };
                state.restore_to(world);
                if state.post_remove(decision.variable, decision.value).is_ok() {
                    break;
                }
            }
        };

        state.restore_to(root);
        result
    }

    /// The decision for variables which the brancher left unfixed.
    fn first_unfixed(state: &State) -> Option<Decision> {
        state
            .assignments
            .domain_ids()
            .find(|&variable| !state.is_fixed(variable))
            .map(|variable| Decision {
                variable,
                value: state.lower_bound(variable),
            })
    }

    /// Writes the statistics of the search; [`State::log_statistics`] can be called afterwards to
    /// write those of the engine and close the block.
    pub fn log_statistics(&self, options: &mut StatisticOptions) {
        self.statistics.log(options.logger("search"));
    }
}
