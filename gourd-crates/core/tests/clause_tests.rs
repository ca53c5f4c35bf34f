#![cfg(test)]
use gourd_core::propagation::ReadDomains;
use gourd_core::propagators::ClauseStoreConstructor;
use gourd_core::variables::Literal;
use gourd_core::Contradiction;
use gourd_core::State;

/// `b <-> (x1 /\ x2)` as the clauses `(!b \/ x1)`, `(!b \/ x2)` and `(b \/ !x1 \/ !x2)`.
fn conjunction() -> (State, Literal, Literal, Literal) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut state = State::new();
    let b = Literal::new(state.new_boolean_variable());
    let x1 = Literal::new(state.new_boolean_variable());
    let x2 = Literal::new(state.new_boolean_variable());

    let _ = state
        .add_propagator(ClauseStoreConstructor {
            clauses: vec![vec![!b, x1], vec![!b, x2], vec![b, !x1, !x2]],
        })
        .expect("the clauses are over 0/1 variables");
    state.propagate_to_fixed_point().expect("no clause is falsified");

    (state, b, x1, x2)
}

#[test]
fn setting_the_conjunction_sets_its_inputs() {
    let (mut state, b, x1, x2) = conjunction();

    let _ = state.post_assign(b.domain(), 1).expect("b is unassigned");
    state.propagate_to_fixed_point().expect("consistent");

    assert!(state.is_literal_true(x1));
    assert!(state.is_literal_true(x2));
}

#[test]
fn setting_both_inputs_sets_the_conjunction() {
    let (mut state, b, x1, x2) = conjunction();

    let _ = state.post_assign(x1.domain(), 1).expect("x1 is unassigned");
    state.propagate_to_fixed_point().expect("consistent");
    assert_eq!(state.literal_value(b), None);

    let _ = state.post_assign(x2.domain(), 1).expect("x2 is unassigned");
    state.propagate_to_fixed_point().expect("consistent");
    assert!(state.is_literal_true(b));
}

#[test]
fn falsified_clause_is_a_contradiction_which_can_be_undone() {
    let (mut state, b, x1, _) = conjunction();

    let world = state.world_push();
    let _ = state.post_assign(b.domain(), 1).expect("b is unassigned");
    let _ = state.post_assign(x1.domain(), 0).expect("x1 is unassigned");
    let result = state.propagate_to_fixed_point();
    assert!(matches!(
        result,
        Err(Contradiction::Propagator { .. } | Contradiction::EmptyDomain { .. })
    ));

    state.restore_to(world);
    assert_eq!(state.literal_value(b), None);
    assert_eq!(state.literal_value(x1), None);

    let _ = state.post_assign(x1.domain(), 0).expect("x1 is unassigned");
    state.propagate_to_fixed_point().expect("consistent");
    assert!(state.is_literal_false(b));
}

#[test]
fn clauses_added_later_are_propagated() {
    let (mut state, b, x1, x2) = conjunction();
    let store = state
        .add_propagator(ClauseStoreConstructor::default())
        .expect("an empty store is well-formed");
    state.propagate_to_fixed_point().expect("consistent");

    state.add_clause(store, [x1]).expect("x1 is a 0/1 variable");
    state.add_clause(store, [x2]).expect("x2 is a 0/1 variable");
    state.propagate_to_fixed_point().expect("consistent");

    assert!(state.is_literal_true(x1));
    assert!(state.is_literal_true(b));
}
