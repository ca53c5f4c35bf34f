use super::AcAlgorithm;
use super::BinaryRelation;
use super::TableStatistics;
use crate::basic_types::EmptyDomainConflict;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::environment::StoredIntVector;
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

const NO_SUPPORT: i32 = i32::MIN;

/// The [`PropagatorConstructor`] for the [`BinaryTablePropagator`].
#[derive(Clone, Debug)]
pub struct BinaryTablePropagatorArgs {
    pub x: DomainId,
    pub y: DomainId,
    pub relation: BinaryRelation,
    pub algorithm: AcAlgorithm,
}

impl PropagatorConstructor for BinaryTablePropagatorArgs {
    type PropagatorImpl = BinaryTablePropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError> {
        let BinaryTablePropagatorArgs {
            x,
            y,
            relation,
            algorithm,
        } = self;

        if x == y {
            return Err(ModelError::RepeatedVariable {
                what: "scope of the binary table",
                variable: x,
            });
        }

        context.register(x, DomainEvents::REMOVAL, LocalId::from(0));
        context.register(y, DomainEvents::REMOVAL, LocalId::from(1));

        let variables = [x, y];
        // Supports are indexed over the ranges of the relation rather than the current domains,
        // which may be narrower when the propagator is added below the root.
        let offsets = relation.offsets();
        let widths = relation.widths();

        let last_supports = (algorithm == AcAlgorithm::Ac2001).then(|| {
            widths.map(|width| {
                context
                    .environment_mut()
                    .make_int_vector(std::iter::repeat(NO_SUPPORT as i64).take(width))
            })
        });
        let residues = match algorithm {
            AcAlgorithm::Ac3rm | AcAlgorithm::Ac3rmBitSet => {
                widths.map(|width| vec![NO_SUPPORT; width])
            }
            AcAlgorithm::Ac3 | AcAlgorithm::Ac2001 => [vec![], vec![]],
        };

        Ok(BinaryTablePropagator {
            variables,
            relation,
            algorithm,
            offsets,
            widths,
            last_supports,
            residues,
            values_buffer: vec![],
            statistics: TableStatistics::default(),
        })
    }
}

/// Arc consistency on a [`BinaryRelation`] between `x` (side 0) and `y` (side 1).
///
/// A removal from one variable can only take away supports of the values of the other variable;
/// the propagator revises that variable, and continues with the revisions until neither domain
/// changes.
#[derive(Clone, Debug)]
pub struct BinaryTablePropagator {
    variables: [DomainId; 2],
    relation: BinaryRelation,
    algorithm: AcAlgorithm,
    /// The lower ends of the ranges of the relation, to index the supports by value.
    offsets: [i32; 2],
    widths: [usize; 2],
    last_supports: Option<[StoredIntVector; 2]>,
    residues: [Vec<i32>; 2],
    values_buffer: Vec<i32>,
    statistics: TableStatistics,
}

impl BinaryTablePropagator {
    fn value_index(&self, side: usize, value: i32) -> Option<usize> {
        let index = value as i64 - self.offsets[side] as i64;
        (0..self.widths[side] as i64)
            .contains(&index)
            .then_some(index as usize)
    }

    fn is_consistent(&self, side: usize, value: i32, other_value: i32) -> bool {
        if side == 0 {
            self.relation.is_consistent(value, other_value)
        } else {
            self.relation.is_consistent(other_value, value)
        }
    }

    fn has_support(&mut self, context: &mut PropagationContext, side: usize, value: i32) -> bool {
        self.statistics.num_support_checks += 1;
        let other = self.variables[1 - side];
        let Some(index) = self.value_index(side, value) else {
            return false;
        };

        match self.algorithm {
            AcAlgorithm::Ac3 => context
                .iterate_domain(other)
                .any(|other_value| self.is_consistent(side, value, other_value)),
            AcAlgorithm::Ac2001 => self.find_support_after_last(context, side, index, value),
            AcAlgorithm::Ac3rm | AcAlgorithm::Ac3rmBitSet => {
                let residue = self.residues[side][index];
                if residue != NO_SUPPORT && context.contains(other, residue) {
                    return true;
                }

                let support = if self.algorithm == AcAlgorithm::Ac3rm {
                    context
                        .iterate_domain(other)
                        .find(|&other_value| self.is_consistent(side, value, other_value))
                } else if side == 0 {
                    self.relation
                        .supports_of_x(value)
                        .find(|&other_value| context.contains(other, other_value))
                } else {
                    self.relation
                        .supports_of_y(value)
                        .find(|&other_value| context.contains(other, other_value))
                };

                match support {
                    Some(support) => {
                        self.residues[side][index] = support;
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// The values of the other variable before the last support were found to be incompatible,
    /// and domains only shrink until backtracking restores the last support as well.
    fn find_support_after_last(
        &self,
        context: &mut PropagationContext,
        side: usize,
        index: usize,
        value: i32,
    ) -> bool {
        let Some(last_supports) = self.last_supports else {
            return false;
        };
        let other = self.variables[1 - side];

        let last = last_supports[side].read(context.environment(), index) as i32;
        if last != NO_SUPPORT && context.contains(other, last) {
            return true;
        }

        let mut candidate = if last == NO_SUPPORT {
            Some(context.lower_bound(other))
        } else {
            context.next_value(other, last)
        };
        while let Some(other_value) = candidate {
            if self.is_consistent(side, value, other_value) {
                last_supports[side].write(context.environment_mut(), index, other_value as i64);
                return true;
            }
            candidate = context.next_value(other, other_value);
        }

        false
    }

    /// Remove the values of the variable at `side` without support; returns whether any value was
    /// removed.
    fn revise(
        &mut self,
        context: &mut PropagationContext,
        side: usize,
    ) -> Result<bool, EmptyDomainConflict> {
        let var = self.variables[side];
        let mut values = std::mem::take(&mut self.values_buffer);
        values.clear();
        values.extend(context.iterate_domain(var));

        let mut changed = false;
        let mut result = Ok(());
        for &value in &values {
            if !self.has_support(context, side, value) {
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

    fn filter(
        &mut self,
        context: &mut PropagationContext,
        mut revise_x: bool,
        mut revise_y: bool,
    ) -> PropagationStatus {
        self.statistics.num_calls += 1;
        while revise_x || revise_y {
            if revise_x {
                revise_x = false;
                revise_y |= self.revise(context, 0)?;
            }
            if revise_y {
                revise_y = false;
                revise_x |= self.revise(context, 1)?;
            }
        }
        Ok(())
    }
}

impl Propagator for BinaryTablePropagator {
    fn name(&self) -> &str {
        "BinaryTable"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.filter(&mut context, true, true)
    }

    fn awake_on_removals(
        &mut self,
        mut context: PropagationContext,
        local_id: LocalId,
        _removed: DeltaIterator<'_>,
    ) -> PropagationStatus {
        // Removals from x can only take away supports of the values of y, and vice versa.
        let removed_from_x = local_id.unpack() == 0;
        self.filter(&mut context, !removed_from_x, removed_from_x)
    }

    fn is_satisfied(&self, tuple: &[i32]) -> bool {
        self.relation.is_consistent(tuple[0], tuple[1])
    }

    fn is_entailed(&self, domains: Domains) -> Option<bool> {
        let [x, y] = self.variables;
        let mut any_consistent = false;
        let mut all_consistent = true;
        for x_value in domains.iterate_domain(x) {
            for y_value in domains.iterate_domain(y) {
                let consistent = self.relation.is_consistent(x_value, y_value);
                any_consistent |= consistent;
                all_consistent &= consistent;
            }
        }

        if all_consistent {
            Some(true)
        } else if !any_consistent {
            Some(false)
        } else {
            None
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger<'_>) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    const ALGORITHMS: [AcAlgorithm; 4] = [
        AcAlgorithm::Ac3,
        AcAlgorithm::Ac2001,
        AcAlgorithm::Ac3rm,
        AcAlgorithm::Ac3rmBitSet,
    ];

    fn not_both_two() -> BinaryRelation {
        BinaryRelation::from_tuples(1..=3, 1..=3, &[(2, 2)], false).unwrap()
    }

    fn assert_arc_consistent(
        solver: &TestSolver,
        x: DomainId,
        y: DomainId,
        relation: &BinaryRelation,
    ) {
        for x_value in solver.values(x) {
            assert!(
                solver
                    .values(y)
                    .into_iter()
                    .any(|y_value| relation.is_consistent(x_value, y_value)),
                "x = {x_value} has no support"
            );
        }
        for y_value in solver.values(y) {
            assert!(
                solver
                    .values(x)
                    .into_iter()
                    .any(|x_value| relation.is_consistent(x_value, y_value)),
                "y = {y_value} has no support"
            );
        }
    }

    #[test]
    fn consistent_relation_prunes_nothing() {
        for algorithm in ALGORITHMS {
            let mut solver = TestSolver::default();
            let x = solver.new_variable(1, 3);
            let y = solver.new_variable(1, 3);

            let _ = solver
                .new_propagator(BinaryTablePropagatorArgs {
                    x,
                    y,
                    relation: not_both_two(),
                    algorithm,
                })
                .expect("no conflict");

            assert_eq!(vec![1, 2, 3], solver.values(x), "{algorithm:?}");
            assert_eq!(vec![1, 2, 3], solver.values(y), "{algorithm:?}");

            solver.remove(x, 1).expect("no conflict");
            solver.remove(y, 1).expect("no conflict");
            assert_arc_consistent(&solver, x, y, &not_both_two());

            solver.assign(x, 2).expect("no conflict");
            assert_eq!(vec![3], solver.values(y), "{algorithm:?}");
        }
    }

    #[test]
    fn a_variable_cannot_be_related_to_itself() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 3);

        let result = solver.state.add_propagator(BinaryTablePropagatorArgs {
            x,
            y: x,
            relation: not_both_two(),
            algorithm: AcAlgorithm::Ac3,
        });

        assert!(matches!(
            result,
            Err(ModelError::RepeatedVariable { variable, .. }) if variable == x
        ));
    }

    #[test]
    fn values_outside_the_relation_are_removed() {
        for algorithm in ALGORITHMS {
            let mut solver = TestSolver::default();
            let x = solver.new_variable(0, 5);
            let y = solver.new_variable(0, 5);
            let relation =
                BinaryRelation::from_tuples(1..=3, 1..=3, &[(1, 2), (2, 3), (3, 3)], true)
                    .unwrap();

            let _ = solver
                .new_propagator(BinaryTablePropagatorArgs {
                    x,
                    y,
                    relation: relation.clone(),
                    algorithm,
                })
                .expect("no conflict");

            assert_eq!(vec![1, 2, 3], solver.values(x), "{algorithm:?}");
            assert_eq!(vec![2, 3], solver.values(y), "{algorithm:?}");

            solver.remove(y, 3).expect("no conflict");
            assert_eq!(vec![1], solver.values(x), "{algorithm:?}");
            assert_arc_consistent(&solver, x, y, &relation);
        }
    }

    #[test]
    fn supports_are_found_again_after_backtracking() {
        for algorithm in ALGORITHMS {
            let mut solver = TestSolver::default();
            let x = solver.new_variable(1, 3);
            let y = solver.new_variable(1, 3);
            let relation = BinaryRelation::from_tuples(
                1..=3,
                1..=3,
                &[(1, 1), (1, 2), (2, 2), (2, 3), (3, 3)],
                true,
            )
            .unwrap();
            let _ = solver
                .new_propagator(BinaryTablePropagatorArgs {
                    x,
                    y,
                    relation,
                    algorithm,
                })
                .expect("no conflict");

            let world = solver.world_push();
            solver.remove(y, 2).expect("no conflict");
            solver.remove(y, 3).expect("no conflict");
            assert_eq!(vec![1], solver.values(x), "{algorithm:?}");
            solver.restore_to(world);

            let _ = solver.world_push();
            solver.remove(y, 1).expect("no conflict");
            solver.remove(y, 2).expect("no conflict");
            assert_eq!(vec![2, 3], solver.values(x), "{algorithm:?}");
        }
    }

    #[test]
    fn wipe_out_is_a_contradiction() {
        for algorithm in ALGORITHMS {
            let mut solver = TestSolver::default();
            let x = solver.new_variable(1, 2);
            let y = solver.new_variable(1, 2);
            let relation = BinaryRelation::from_tuples(1..=2, 1..=2, &[(1, 1), (2, 2)], true)
                .unwrap();
            let _ = solver
                .new_propagator(BinaryTablePropagatorArgs {
                    x,
                    y,
                    relation,
                    algorithm,
                })
                .expect("no conflict");

            let _ = solver.state.post_assign(x, 1).expect("in the domain");
            let _ = solver.state.post_assign(y, 2).expect("in the domain");
            assert!(solver.propagate().is_err(), "{algorithm:?}");
        }
    }
}
