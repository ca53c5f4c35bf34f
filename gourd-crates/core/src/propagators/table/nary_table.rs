use itertools::Itertools;

use super::GacAlgorithm;
use super::TableStatistics;
use super::TupleRelation;
use crate::basic_types::EmptyDomainConflict;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::containers::HashMap;
use crate::engine::variables::DomainId;
use crate::environment::StoredInt;
use crate::propagation::DeltaIterator;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`PropagatorConstructor`] for the [`TablePropagator`].
#[derive(Clone, Debug)]
pub struct TablePropagatorArgs {
    pub variables: Vec<DomainId>,
    pub relation: TupleRelation,
    pub algorithm: GacAlgorithm,
}

impl PropagatorConstructor for TablePropagatorArgs {
    type PropagatorImpl = TablePropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError> {
        let TablePropagatorArgs {
            variables,
            relation,
            algorithm,
        } = self;

        if variables.len() != relation.arity() {
            return Err(ModelError::MismatchedLengths {
                what: "scope of the table",
                expected: relation.arity(),
                actual: variables.len(),
            });
        }
        // A tuple is checked position by position, which cannot express that two positions hold
        // the same variable.
        if let Some(&variable) = variables.iter().duplicates().next() {
            return Err(ModelError::RepeatedVariable {
                what: "scope of the table",
                variable,
            });
        }
        if algorithm == GacAlgorithm::Gac2001 && !relation.is_feasible() {
            return Err(ModelError::MalformedRelation(
                "GAC2001 needs a relation of allowed tuples".to_owned(),
            ));
        }

        for (index, &var) in variables.iter().enumerate() {
            context.register(var, DomainEvents::REMOVAL, LocalId::from(index as u32));
        }

        let last_indices = if algorithm == GacAlgorithm::Gac2001 {
            (0..variables.len())
                .map(|position| {
                    relation
                        .values_at(position)
                        .map(|value| (value, context.environment_mut().make_int(0)))
                        .collect()
                })
                .collect()
        } else {
            vec![]
        };

        Ok(TablePropagator {
            residues: vec![HashMap::default(); variables.len()],
            variables,
            relation,
            algorithm,
            last_indices,
            values_buffer: vec![],
            statistics: TableStatistics::default(),
        })
    }
}

/// Generalized arc consistency on a [`TupleRelation`] over any number of variables.
///
/// After propagation every value of every variable is part of a tuple which is allowed by the
/// relation and lies within the current domains.
#[derive(Clone, Debug)]
pub struct TablePropagator {
    variables: Vec<DomainId>,
    relation: TupleRelation,
    algorithm: GacAlgorithm,
    /// Per position and value, the index in the list of occurrences from which the search for a
    /// support resumes.
    last_indices: Vec<HashMap<i32, StoredInt>>,
    /// Per position and value, the last support found.
    residues: Vec<HashMap<i32, Box<[i32]>>>,
    values_buffer: Vec<i32>,
    statistics: TableStatistics,
}

impl TablePropagator {
    fn is_valid(&self, domains: Domains, tuple: &[i32]) -> bool {
        self.variables
            .iter()
            .zip(tuple)
            .all(|(&var, &value)| domains.contains(var, value))
    }

    fn has_support(
        &mut self,
        context: &mut PropagationContext,
        position: usize,
        value: i32,
    ) -> bool {
        self.statistics.num_support_checks += 1;
        match self.algorithm {
            GacAlgorithm::Gac2001 => self.has_support_after_last(context, position, value),
            GacAlgorithm::Gac3rm => {
                if let Some(residue) = self.residues[position].get(&value) {
                    if self.is_valid(context.domains(), residue) {
                        return true;
                    }
                }

                let support = if self.relation.is_feasible() {
                    self.relation
                        .occurrences(position, value)
                        .iter()
                        .map(|&index| self.relation.tuple(index))
                        .find(|tuple| self.is_valid(context.domains(), tuple))
                        .map(Box::from)
                } else {
                    self.first_allowed_tuple(context.domains(), position, value)
                };

                match support {
                    Some(support) => {
                        let _ = self.residues[position].insert(value, support);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// The tuples in the list of occurrences before the last index were found to be invalid, and
    /// stay invalid until backtracking restores the last index as well.
    fn has_support_after_last(
        &self,
        context: &mut PropagationContext,
        position: usize,
        value: i32,
    ) -> bool {
        let Some(&last_index) = self.last_indices[position].get(&value) else {
            return false;
        };

        let start = last_index.read(context.environment()) as usize;
        let found = self.relation.occurrences(position, value)[start..]
            .iter()
            .position(|&index| self.is_valid(context.domains(), self.relation.tuple(index)));

        match found {
            Some(offset) => {
                if offset > 0 {
                    last_index.write(context.environment_mut(), (start + offset) as i64);
                }
                true
            }
            None => false,
        }
    }

    /// The lexicographically smallest tuple within the current domains with `value` at `position`
    /// which the relation allows.
    fn first_allowed_tuple(
        &self,
        domains: Domains,
        position: usize,
        value: i32,
    ) -> Option<Box<[i32]>> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, &var)| {
                if index == position {
                    vec![value]
                } else {
                    domains.iterate_domain(var).collect()
                }
            })
            .multi_cartesian_product()
            .find(|tuple| self.relation.is_consistent(tuple))
            .map(Vec::into_boxed_slice)
    }

    fn revise(
        &mut self,
        context: &mut PropagationContext,
        position: usize,
    ) -> Result<bool, EmptyDomainConflict> {
        let var = self.variables[position];
        let mut values = std::mem::take(&mut self.values_buffer);
        values.clear();
        values.extend(context.iterate_domain(var));

        let mut changed = false;
        let mut result = Ok(());
        for &value in &values {
            if !self.has_support(context, position, value) {
                self.statistics.num_prunings += 1;
                match context.remove_value(var, value) {
                    Ok(removed) => changed |= removed,
                    Err(conflict) => {
                        result = Err(conflict);
                        break;
                    }
                }
            }
        }

        self.values_buffer = values;
        result.map(|_| changed)
    }

    fn filter(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.statistics.num_calls += 1;
        loop {
            let mut changed = false;
            for position in 0..self.variables.len() {
                changed |= self.revise(context, position)?;
            }
            if !changed {
                return Ok(());
            }
        }
    }
}

impl Propagator for TablePropagator {
    fn name(&self) -> &str {
        "Table"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.filter(&mut context)
    }

    fn awake_on_removals(
        &mut self,
        mut context: PropagationContext,
        _local_id: LocalId,
        _removed: DeltaIterator<'_>,
    ) -> PropagationStatus {
        self.filter(&mut context)
    }

    fn is_satisfied(&self, tuple: &[i32]) -> bool {
        self.relation.is_consistent(tuple)
    }

    fn is_entailed(&self, domains: Domains) -> Option<bool> {
        let any_listed_tuple_valid = (0..self.relation.num_tuples())
            .any(|index| self.is_valid(domains, self.relation.tuple(index)));

        match (self.relation.is_feasible(), any_listed_tuple_valid) {
            (true, false) => Some(false),
            (false, false) => Some(true),
            _ => None,
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger<'_>) {
        self.statistics.log(statistic_logger);
    }
}
