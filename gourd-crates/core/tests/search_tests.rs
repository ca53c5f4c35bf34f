#![cfg(test)]
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use gourd_core::branching::value_selection::InDomainMin;
use gourd_core::branching::value_selection::InDomainRandom;
use gourd_core::branching::variable_selection::FirstFail;
use gourd_core::branching::variable_selection::InputOrder;
use gourd_core::branching::IndependentVariableValueBrancher;
use gourd_core::propagators::arithmetic::BinaryNotEqualsPropagatorArgs;
use gourd_core::rand::rngs::SmallRng;
use gourd_core::rand::SeedableRng;
use gourd_core::search::DepthFirstSearch;
use gourd_core::search::SearchBudget;
use gourd_core::search::SearchResult;
use gourd_core::statistics::StatisticOptions;
use gourd_core::variables::DomainId;
use gourd_core::Solution;
use gourd_core::State;

/// The queen of column `i` is placed on row `queens[i]`.
fn queens(state: &mut State, n: i32) -> Vec<DomainId> {
    let _ = env_logger::builder().is_test(true).try_init();

    let queens = (0..n)
        .map(|_| state.new_interval_variable(0, n - 1).expect("non-empty"))
        .collect::<Vec<_>>();
    for i in 0..queens.len() {
        for j in i + 1..queens.len() {
            let distance = (j - i) as i32;
            for offset in [0, distance, -distance] {
                let _ = state
                    .add_propagator(BinaryNotEqualsPropagatorArgs {
                        a: queens[i],
                        b: queens[j],
                        offset,
                    })
                    .expect("well-formed");
            }
        }
    }
    queens
}

fn is_placement(solution: &Solution, queens: &[DomainId]) -> bool {
    let rows = queens
        .iter()
        .map(|&queen| solution.value(queen))
        .collect::<Vec<_>>();
    (0..rows.len()).all(|i| {
        (i + 1..rows.len()).all(|j| {
            let distance = (j - i) as i32;
            rows[i] != rows[j] && (rows[i] - rows[j]).abs() != distance
        })
    })
}

#[test]
fn queens_are_placed_with_input_order() {
    let mut state = State::new();
    let queens = queens(&mut state, 6);
    let mut brancher = IndependentVariableValueBrancher::new(InputOrder::new(&queens), InDomainMin);

    let mut limit = SearchBudget::unlimited();
    let result = DepthFirstSearch::default().solve(&mut state, &mut brancher, &mut limit);

    let SearchResult::Satisfiable(solution) = result else {
        panic!("six queens can be placed, got {result:?}");
    };
    assert!(is_placement(&solution, &queens));
}

#[test]
fn queens_are_placed_with_random_values() {
    for seed in 0..5 {
        let mut state = State::new();
        let queens = queens(&mut state, 5);
        let mut brancher =
            IndependentVariableValueBrancher::new(FirstFail::new(&queens), InDomainRandom);
        let mut search = DepthFirstSearch::new(SmallRng::seed_from_u64(seed));

        let result = search.solve(&mut state, &mut brancher, &mut SearchBudget::unlimited());

        let SearchResult::Satisfiable(solution) = result else {
            panic!("five queens can be placed, got {result:?} with seed {seed}");
        };
        assert!(is_placement(&solution, &queens), "seed {seed}");
    }
}

#[test]
fn three_queens_cannot_be_placed() {
    let mut state = State::new();
    let queens = queens(&mut state, 3);
    let mut brancher = IndependentVariableValueBrancher::new(FirstFail::new(&queens), InDomainMin);

    let mut limit = SearchBudget::unlimited();
    let result = DepthFirstSearch::default().solve(&mut state, &mut brancher, &mut limit);

    assert_eq!(result, SearchResult::Unsatisfiable);
}

#[test]
fn the_first_exhausted_budget_stops_the_search() {
    let mut state = State::new();
    let queens = queens(&mut state, 8);
    let mut brancher = IndependentVariableValueBrancher::new(InputOrder::new(&queens), InDomainMin);
    let mut limit = SearchBudget::unlimited()
        .with_max_decisions(1_000)
        .with_max_failures(1);

    let result = DepthFirstSearch::default().solve(&mut state, &mut brancher, &mut limit);

    assert_eq!(result, SearchResult::Unknown);
}

/// A writer whose output can be read after it has been handed out.
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

#[test]
fn statistics_are_written_to_the_writer() {
    let mut state = State::new();
    let queens = queens(&mut state, 4);
    let mut brancher = IndependentVariableValueBrancher::new(InputOrder::new(&queens), InDomainMin);
    let mut search = DepthFirstSearch::default();
    let _ = search.solve(&mut state, &mut brancher, &mut SearchBudget::unlimited());

    let buffer = SharedBuffer::default();
    let mut options = StatisticOptions::new("%%", None, None, Box::new(buffer.clone()));
    search.log_statistics(&mut options);
    state.log_statistics(&mut options);

    let output = String::from_utf8(buffer.0.borrow().clone()).expect("statistics are text");
    assert!(output.lines().all(|line| line.starts_with("%% ")));
    assert!(output.contains("search_num_decisions="), "{output}");
}
