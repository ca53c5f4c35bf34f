//! A store of clauses over 0/1 variables, propagated with two watched literals per clause.
//!
//! Every clause of two or more literals watches its first two literals. The store is only woken
//! when a watched literal becomes false; it then looks for another literal which is not false to
//! watch instead. If there is none, the clause is unit and its other watched literal is made true,
//! or, if that literal is false as well, the clause is falsified.
use std::cmp::Reverse;

use log::trace;

use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::create_statistics_struct;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConflict;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`ClauseStore`]. More clauses can be added later through
/// [`State::add_clause`](crate::State::add_clause).
#[derive(Clone, Debug, Default)]
pub struct ClauseStoreConstructor {
    pub clauses: Vec<Vec<Literal>>,
}

impl PropagatorConstructor for ClauseStoreConstructor {
    type PropagatorImpl = ClauseStore;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError> {
        let mut store = ClauseStore::default();

        for clause in self.clauses {
            for literal in &clause {
                let var = literal.domain();
                let domains = context.domains();
                if domains.lower_bound(var) < 0 || domains.upper_bound(var) > 1 {
                    return Err(ModelError::NonBooleanVariable(var));
                }
            }

            for (var, local_id) in store.add_clause(clause) {
                context.register(var, DomainEvents::ASSIGN, local_id);
            }
        }

        Ok(store)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct ClauseId(u32);

impl StorageKey for ClauseId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ClauseId(index as u32)
    }
}

/// Watcher for a single clause.
///
/// The blocker is another literal of the clause; if it is true, the clause is satisfied and can be
/// skipped without looking at its literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Watcher {
    clause: ClauseId,
    blocker: Literal,
}

create_statistics_struct!(ClauseStoreStatistics {
    num_clauses: u64,
    num_unit_propagations: u64,
    num_conflicts: u64,
    num_watch_updates: u64,
});

/// Propagator for a conjunction of clauses over 0/1 variables.
///
/// The clauses are kept when the engine backtracks; only the assignments they caused are undone.
#[derive(Clone, Debug, Default)]
pub struct ClauseStore {
    /// The variables of the clauses, indexed by the local id they were registered with.
    variables: KeyedVec<LocalId, DomainId>,
    local_ids: HashMap<DomainId, LocalId>,
    /// The literals of every clause; the first two literals are watched.
    clauses: KeyedVec<ClauseId, Vec<Literal>>,
    /// The watchers of every literal, indexed by [`watch_index`].
    watch_lists: Vec<Vec<Watcher>>,
    statistics: ClauseStoreStatistics,
}

/// The index of the watch list of `literal`: two lists per variable, one for each polarity.
fn watch_index(local_ids: &HashMap<DomainId, LocalId>, literal: Literal) -> usize {
    2 * local_ids[&literal.domain()].index() + usize::from(literal.is_positive())
}

fn unwatch(
    watch_lists: &mut [Vec<Watcher>],
    local_ids: &HashMap<DomainId, LocalId>,
    literal: Literal,
    clause: ClauseId,
) {
    watch_lists[watch_index(local_ids, literal)].retain(|watcher| watcher.clause != clause);
}

impl ClauseStore {
    /// The number of clauses in the store, including the empty clause if it was added.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Adds a clause and watches its first two literals. Duplicated literals are removed, and a
    /// clause which contains a literal and its negation is not stored at all.
    ///
    /// Returns the variables which were not yet part of the store, which the engine has to
    /// subscribe the store to.
    pub(crate) fn add_clause(&mut self, mut literals: Vec<Literal>) -> Vec<(DomainId, LocalId)> {
        literals.sort_by_key(|literal| (literal.domain(), literal.is_positive()));
        literals.dedup();
        if literals
            .windows(2)
            .any(|pair| pair[0].domain() == pair[1].domain())
        {
            trace!("dropping a tautological clause");
            return vec![];
        }

        let mut new_variables = vec![];
        for literal in &literals {
            let var = literal.domain();
            if !self.local_ids.contains_key(&var) {
                let local_id = self.variables.push(var);
                let _ = self.local_ids.insert(var, local_id);
                self.watch_lists.extend([vec![], vec![]]);
                new_variables.push((var, local_id));
            }
        }

        let clause = self.clauses.push(literals);
        let literals = &self.clauses[clause];
        if literals.len() >= 2 {
            self.watch_lists[watch_index(&self.local_ids, literals[0])].push(Watcher {
                clause,
                blocker: literals[1],
            });
            self.watch_lists[watch_index(&self.local_ids, literals[1])].push(Watcher {
                clause,
                blocker: literals[0],
            });
        }
        self.statistics.num_clauses += 1;

        new_variables
    }

    fn conflict(&mut self, reason: &'static str) -> PropagatorConflict {
        self.statistics.num_conflicts += 1;
        PropagatorConflict::new(reason)
    }
}

impl Propagator for ClauseStore {
    fn name(&self) -> &str {
        "ClauseStore"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    /// Scans every clause, moves the literals which are not false to the front, and watches the
    /// first two literals. The false literals are ordered on the world in which they became false,
    /// the latest first, so backtracking frees the watched literals before the others.
    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        for index in 0..self.clauses.len() {
            let clause = ClauseId::create_from_index(index);
            let literals = &mut self.clauses[clause];
            let Some(&first) = literals.first() else {
                return Err(self.conflict("the clause is empty").into());
            };
            let second = literals.get(1).copied();

            literals.sort_by_key(|&literal| match context.literal_value(literal) {
                Some(true) => (0, Reverse(0)),
                None => (1, Reverse(0)),
                Some(false) => (
                    2,
                    Reverse(context.fixed_in_world(literal.domain()).unwrap_or(0)),
                ),
            });

            if let Some(second) = second {
                let (new_first, new_second) = (literals[0], literals[1]);
                let unchanged = (new_first == first && new_second == second)
                    || (new_first == second && new_second == first);
                if !unchanged {
                    self.statistics.num_watch_updates += 1;
                    for old in [first, second] {
                        unwatch(&mut self.watch_lists, &self.local_ids, old, clause);
                    }
                    self.watch_lists[watch_index(&self.local_ids, new_first)].push(Watcher {
                        clause,
                        blocker: new_second,
                    });
                    self.watch_lists[watch_index(&self.local_ids, new_second)].push(Watcher {
                        clause,
                        blocker: new_first,
                    });
                }
            }

            let literals = &self.clauses[clause];
            let first = literals[0];
            if context.is_literal_false(first) {
                return Err(self.conflict("the clause is falsified").into());
            }
            let is_unit = literals
                .get(1)
                .map_or(true, |&second| context.is_literal_false(second));
            if is_unit && context.literal_value(first).is_none() {
                self.statistics.num_unit_propagations += 1;
                let _ = context.assign_literal(first)?;
            }
        }

        Ok(())
    }

    fn awake_on_inst(
        &mut self,
        mut context: PropagationContext,
        local_id: LocalId,
    ) -> PropagationStatus {
        let var = self.variables[local_id];
        let Some(value) = context.fixed_value(var) else {
            return Ok(());
        };
        let false_literal = if value == 1 {
            !Literal::new(var)
        } else {
            Literal::new(var)
        };

        let list = watch_index(&self.local_ids, false_literal);
        let mut watchers = std::mem::take(&mut self.watch_lists[list]);
        let mut result = Ok(());
        let mut kept = 0;
        let mut index = 0;

        while index < watchers.len() {
            let watcher = watchers[index];
            index += 1;

            if context.is_literal_true(watcher.blocker) {
                watchers[kept] = watcher;
                kept += 1;
                continue;
            }

            // Place the false literal at position 1.
            let literals = &mut self.clauses[watcher.clause];
            if literals[0] == false_literal {
                literals.swap(0, 1);
            }
            let other = literals[0];

            if other != watcher.blocker && context.is_literal_true(other) {
                watchers[kept] = Watcher {
                    clause: watcher.clause,
                    blocker: other,
                };
                kept += 1;
                continue;
            }

            let replacement =
                (2..literals.len()).find(|&position| !context.is_literal_false(literals[position]));
            if let Some(position) = replacement {
                literals.swap(1, position);
                let new_watch = literals[1];
                self.statistics.num_watch_updates += 1;
                self.watch_lists[watch_index(&self.local_ids, new_watch)].push(Watcher {
                    clause: watcher.clause,
                    blocker: other,
                });
                continue;
            }

            watchers[kept] = watcher;
            kept += 1;

            let status: PropagationStatus = if context.is_literal_false(other) {
                self.statistics.num_conflicts += 1;
                Err(PropagatorConflict::new("the clause is falsified").into())
            } else {
                self.statistics.num_unit_propagations += 1;
                context.assign_literal(other).map(|_| ()).map_err(Into::into)
            };
            if status.is_err() {
                result = status;
                break;
            }
        }

        // On a conflict the watchers which were not visited stay in place.
        while index < watchers.len() {
            watchers[kept] = watchers[index];
            kept += 1;
            index += 1;
        }
        watchers.truncate(kept);
        watchers.append(&mut self.watch_lists[list]);
        self.watch_lists[list] = watchers;

        result
    }

    fn is_satisfied(&self, tuple: &[i32]) -> bool {
        self.clauses.iter().all(|literals| {
            literals.iter().any(|literal| {
                let local_id = self.local_ids[&literal.domain()];
                literal.is_satisfied_by(tuple[local_id.index()])
            })
        })
    }

    fn is_entailed(&self, domains: Domains) -> Option<bool> {
        let mut all_satisfied = true;
        for literals in self.clauses.iter() {
            if literals.iter().all(|&literal| domains.is_literal_false(literal)) {
                return Some(false);
            }
            all_satisfied &= literals.iter().any(|&literal| domains.is_literal_true(literal));
        }
        all_satisfied.then_some(true)
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger<'_>) {
        self.statistics.log(statistic_logger);
    }
}
