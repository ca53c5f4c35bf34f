#![cfg(test)]
use gourd_core::propagation::ReadDomains;
use gourd_core::propagators::arithmetic::LessOrEqualPropagatorArgs;
use gourd_core::propagators::cumulative::ArgTask;
use gourd_core::propagators::cumulative::CumulativeOptions;
use gourd_core::propagators::cumulative::CumulativePropagatorArgs;
use gourd_core::propagators::table::AcAlgorithm;
use gourd_core::propagators::table::BinaryRelation;
use gourd_core::propagators::table::BinaryTablePropagatorArgs;
use gourd_core::propagators::table::GacAlgorithm;
use gourd_core::propagators::table::TablePropagatorArgs;
use gourd_core::propagators::table::TupleRelation;
use gourd_core::propagators::ClauseStoreConstructor;
use gourd_core::rand::rngs::SmallRng;
use gourd_core::rand::Rng;
use gourd_core::rand::SeedableRng;
use gourd_core::variables::DomainId;
use gourd_core::variables::Literal;
use gourd_core::DomainKind;
use gourd_core::State;
use itertools::Itertools;

fn snapshot(state: &State, variables: &[DomainId]) -> Vec<Vec<i32>> {
    variables
        .iter()
        .map(|&var| state.iterate_domain(var).collect())
        .collect()
}

/// Applies a random bound change or removal to a random variable; failed changes are ignored.
fn random_change(state: &mut State, variables: &[DomainId], rng: &mut SmallRng) {
    let var = variables[rng.gen_range(0..variables.len())];
    let value = rng.gen_range(-2..=22);
    let _ = match rng.gen_range(0..4) {
        0 => state.post_lower_bound(var, value),
        1 => state.post_upper_bound(var, value),
        2 => state.post_remove(var, value),
        _ => state.post_assign(var, value),
    };
}

#[test]
fn restoring_a_world_gives_back_its_domains() {
    let _ = env_logger::builder().is_test(true).try_init();

    for kind in [DomainKind::BitSet, DomainKind::LinkedList, DomainKind::Bipartite] {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut state = State::new();
        let variables = (0..4)
            .map(|_| {
                state
                    .new_interval_variable_with_kind(0, 20, kind)
                    .expect("non-empty")
            })
            .collect::<Vec<_>>();

        for _ in 0..20 {
            let mut worlds = vec![];
            for _ in 0..rng.gen_range(1..6) {
                let before = snapshot(&state, &variables);
                worlds.push((state.world_push(), before));
                for _ in 0..rng.gen_range(1..8) {
                    random_change(&mut state, &variables, &mut rng);
                }
            }

            while let Some((world, before)) = worlds.pop() {
                state.restore_to(world);
                assert_eq!(snapshot(&state, &variables), before, "{kind:?}");
            }
        }

        assert_eq!(
            snapshot(&state, &variables),
            vec![(0..=20).collect::<Vec<_>>(); 4],
            "{kind:?}"
        );
    }
}

#[test]
fn restoring_skips_intermediate_worlds() {
    let mut state = State::new();
    let x = state.new_interval_variable(0, 10).expect("non-empty");

    let root = state.world_push();
    let _ = state.post_lower_bound(x, 3).expect("x contains 3");
    let _ = state.world_push();
    let _ = state.post_remove(x, 5).expect("x is not fixed");
    let _ = state.world_push();
    let _ = state.post_upper_bound(x, 7).expect("x contains 7");

    state.restore_to(root);

    assert_eq!(state.current_world(), root);
    assert_eq!(state.iterate_domain(x).collect::<Vec<_>>(), (0..=10).collect::<Vec<_>>());
}

#[test]
fn propagation_is_undone_on_backtracking() {
    let mut state = State::new();
    let x = state.new_interval_variable(0, 10).expect("non-empty");
    let y = state.new_interval_variable(0, 10).expect("non-empty");
    let z = state.new_interval_variable(0, 10).expect("non-empty");
    let _ = state
        .add_propagator(LessOrEqualPropagatorArgs { a: x, b: y, offset: 1 })
        .expect("well-formed");
    let _ = state
        .add_propagator(LessOrEqualPropagatorArgs { a: y, b: z, offset: 1 })
        .expect("well-formed");
    state.propagate_to_fixed_point().expect("consistent");
    let root_domains = snapshot(&state, &[x, y, z]);

    let world = state.world_push();
    let _ = state.post_lower_bound(x, 4).expect("x contains 4");
    state.propagate_to_fixed_point().expect("consistent");
    assert_eq!(state.lower_bound(z), 6);

    state.restore_to(world);
    assert_eq!(snapshot(&state, &[x, y, z]), root_domains);
    assert_eq!(state.lower_bound(z), 2);
}

/// Posts a cumulative for both option sets, a binary table for every arc consistency algorithm,
/// an n-ary table for every generalized arc consistency algorithm and a clause store, each over
/// its own variables. Returns all variables.
fn post_every_kind_of_propagator(state: &mut State) -> Vec<DomainId> {
    let mut variables = vec![];

    for options in [
        CumulativeOptions::default(),
        CumulativeOptions {
            edge_finding: false,
            allow_holes_in_domain: true,
        },
    ] {
        let tasks = [(2, 2), (3, 1), (2, 1), (1, 2)]
            .into_iter()
            .map(|(duration, height)| ArgTask {
                start: state.new_interval_variable(0, 8 - duration).expect("non-empty"),
                duration: state
                    .new_interval_variable(duration, duration)
                    .expect("non-empty"),
                end: state.new_interval_variable(duration, 8).expect("non-empty"),
                height: state.new_interval_variable(height, height).expect("non-empty"),
            })
            .collect::<Vec<_>>();
        variables.extend(tasks.iter().flat_map(|task| [task.start, task.end]));
        let capacity = state.new_interval_variable(2, 2).expect("non-empty");
        let _ = state
            .add_propagator(CumulativePropagatorArgs {
                tasks,
                capacity,
                options,
            })
            .expect("durations and heights are non-negative");
    }

    let pairs = (0..=6)
        .flat_map(|x| (0..=6).map(move |y| (x, y)))
        .filter(|&(x, y)| (x + 2 * y) % 3 == 0)
        .collect::<Vec<_>>();
    for algorithm in [
        AcAlgorithm::Ac3,
        AcAlgorithm::Ac2001,
        AcAlgorithm::Ac3rm,
        AcAlgorithm::Ac3rmBitSet,
    ] {
        let x = state.new_interval_variable(0, 6).expect("non-empty");
        let y = state.new_interval_variable(0, 6).expect("non-empty");
        variables.extend([x, y]);
        let _ = state
            .add_propagator(BinaryTablePropagatorArgs {
                x,
                y,
                relation: BinaryRelation::from_tuples(0..=6, 0..=6, &pairs, true)
                    .expect("pairs lie in the ranges"),
                algorithm,
            })
            .expect("well-formed");
    }

    let tuples = (0..4)
        .map(|_| 0..=4)
        .multi_cartesian_product()
        .filter(|tuple| tuple.iter().sum::<i32>() == 7)
        .collect::<Vec<_>>();
    for algorithm in [GacAlgorithm::Gac2001, GacAlgorithm::Gac3rm] {
        let scope = (0..4)
            .map(|_| state.new_interval_variable(0, 4).expect("non-empty"))
            .collect::<Vec<_>>();
        variables.extend(scope.iter().copied());
        let _ = state
            .add_propagator(TablePropagatorArgs {
                variables: scope,
                relation: TupleRelation::new(4, tuples.clone(), true)
                    .expect("every tuple has four values"),
                algorithm,
            })
            .expect("well-formed");
    }

    let literals = (0..5)
        .map(|_| Literal::new(state.new_boolean_variable()))
        .collect::<Vec<_>>();
    variables.extend(literals.iter().map(|literal| literal.domain()));
    let [a, b, c, d, e] = literals[..] else {
        unreachable!("five literals were created")
    };
    let _ = state
        .add_propagator(ClauseStoreConstructor {
            clauses: vec![vec![a, b], vec![!a, c], vec![!c, !b, d], vec![!d, e], vec![!e, !a]],
        })
        .expect("the clauses are over 0/1 variables");

    variables
}

#[test]
fn the_fixed_point_is_stable() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = SmallRng::seed_from_u64(11);
    let mut state = State::new();
    let variables = post_every_kind_of_propagator(&mut state);
    state.propagate_to_fixed_point().expect("the model is consistent");

    let mut num_fixed_points = 0;
    for _ in 0..40 {
        let root = state.world_push();
        for _ in 0..rng.gen_range(1..4) {
            let _ = state.world_push();
            for _ in 0..rng.gen_range(1..4) {
                random_change(&mut state, &variables, &mut rng);
            }
            if state.propagate_to_fixed_point().is_err() {
                break;
            }
            num_fixed_points += 1;

            let fixed_point = snapshot(&state, &variables);
            state.request_full_propagation();
            state
                .propagate_to_fixed_point()
                .expect("a fixed point stays consistent");
            assert_eq!(snapshot(&state, &variables), fixed_point);
        }
        state.restore_to(root);
    }

    assert!(num_fixed_points > 0);
}

#[test]
fn entailed_propagator_added_in_a_world_prunes_after_backtracking() {
    let mut state = State::new();
    let x = state.new_interval_variable(0, 10).expect("non-empty");
    let y = state.new_interval_variable(0, 10).expect("non-empty");

    let root = state.world_push();
    let _ = state.post_upper_bound(x, 2).expect("x contains 2");
    let _ = state.post_lower_bound(y, 5).expect("y contains 5");
    let handle = state
        .add_propagator(LessOrEqualPropagatorArgs { a: x, b: y, offset: 0 })
        .expect("well-formed");
    state.propagate_to_fixed_point().expect("consistent");
    assert!(!state.is_active(handle.propagator_id()));

    state.restore_to(root);
    assert!(state.is_active(handle.propagator_id()));
    let _ = state.post_lower_bound(x, 8).expect("x contains 8");
    let _ = state.post_upper_bound(y, 3).expect("y contains 3");

    assert!(state.propagate_to_fixed_point().is_err());
}

#[test]
fn binary_table_added_in_a_world_keeps_supports_after_backtracking() {
    for algorithm in [
        AcAlgorithm::Ac3,
        AcAlgorithm::Ac2001,
        AcAlgorithm::Ac3rm,
        AcAlgorithm::Ac3rmBitSet,
    ] {
        let mut state = State::new();
        let x = state.new_interval_variable(1, 3).expect("non-empty");
        let y = state.new_interval_variable(1, 3).expect("non-empty");
        let relation =
            BinaryRelation::from_tuples(1..=3, 1..=3, &[(1, 1), (2, 2), (3, 1), (3, 3)], true)
                .expect("pairs lie in the ranges");

        let root = state.world_push();
        let _ = state.post_lower_bound(y, 2).expect("y contains 2");
        let _ = state
            .add_propagator(BinaryTablePropagatorArgs {
                x,
                y,
                relation,
                algorithm,
            })
            .expect("well-formed");
        state.propagate_to_fixed_point().expect("consistent");
        assert_eq!(state.iterate_domain(x).collect::<Vec<_>>(), vec![2, 3], "{algorithm:?}");

        state.restore_to(root);
        let _ = state.post_remove(y, 3).expect("y is not fixed");
        state.propagate_to_fixed_point().expect("consistent");

        assert_eq!(state.iterate_domain(x).collect::<Vec<_>>(), vec![1, 2, 3], "{algorithm:?}");
        assert_eq!(state.iterate_domain(y).collect::<Vec<_>>(), vec![1, 2], "{algorithm:?}");
    }
}

#[test]
fn table_added_in_a_nested_world_propagates_in_every_outer_world() {
    for algorithm in [GacAlgorithm::Gac2001, GacAlgorithm::Gac3rm] {
        let mut state = State::new();
        let variables = (0..3)
            .map(|_| state.new_interval_variable(1, 3).expect("non-empty"))
            .collect::<Vec<_>>();
        let [x, y, z] = variables[..] else {
            unreachable!("three variables were created")
        };
        let relation = TupleRelation::new(
            3,
            vec![vec![1, 2, 3], vec![2, 3, 1], vec![3, 1, 2]],
            true,
        )
        .expect("every tuple has three values");

        let root = state.world_push();
        let outer = state.world_push();
        let _ = state.post_lower_bound(y, 2).expect("y contains 2");
        let _ = state
            .add_propagator(TablePropagatorArgs {
                variables: variables.clone(),
                relation,
                algorithm,
            })
            .expect("well-formed");
        state.propagate_to_fixed_point().expect("consistent");
        assert_eq!(state.iterate_domain(x).collect::<Vec<_>>(), vec![1, 2], "{algorithm:?}");

        state.restore_to(outer);
        let _ = state.post_remove(z, 2).expect("z is not fixed");
        state.propagate_to_fixed_point().expect("consistent");
        assert_eq!(state.iterate_domain(x).collect::<Vec<_>>(), vec![1, 2], "{algorithm:?}");
        assert_eq!(state.iterate_domain(y).collect::<Vec<_>>(), vec![2, 3], "{algorithm:?}");

        state.restore_to(root);
        let _ = state.post_remove(y, 2).expect("y is not fixed");
        state.propagate_to_fixed_point().expect("consistent");
        assert_eq!(state.iterate_domain(x).collect::<Vec<_>>(), vec![2, 3], "{algorithm:?}");
        assert_eq!(state.iterate_domain(z).collect::<Vec<_>>(), vec![1, 2], "{algorithm:?}");
    }
}

#[test]
fn clause_added_to_a_passive_store_in_a_world_is_kept() {
    let mut state = State::new();
    let a = Literal::new(state.new_boolean_variable());
    let b = Literal::new(state.new_boolean_variable());
    let store = state
        .add_propagator(ClauseStoreConstructor {
            clauses: vec![vec![a]],
        })
        .expect("the clauses are over 0/1 variables");
    state.propagate_to_fixed_point().expect("consistent");
    assert!(!state.is_active(store.propagator_id()));

    let root = state.world_push();
    state.add_clause(store, [!b]).expect("b is a 0/1 variable");
    state.restore_to(root);
    state.propagate_to_fixed_point().expect("consistent");
    assert!(state.is_literal_false(b));

    let _ = state.world_push();
    let result = state
        .post_assign(b.domain(), 1)
        .and_then(|_| state.propagate_to_fixed_point());
    assert!(result.is_err());
}
