#![cfg(test)]
use gourd_core::propagation::DeltaIterator;
use gourd_core::propagation::DomainEvents;
use gourd_core::propagation::LocalId;
use gourd_core::propagation::PropagationContext;
use gourd_core::propagation::PropagationStatus;
use gourd_core::propagation::Propagator;
use gourd_core::propagation::PropagatorConstructor;
use gourd_core::propagation::PropagatorConstructorContext;
use gourd_core::propagation::ReadDomains;
use gourd_core::variables::DomainId;
use gourd_core::DomainKind;
use gourd_core::ModelError;
use gourd_core::State;

/// Logs every removed value it is woken with. With a `step`, reading the removal of `v` also
/// removes `v + step`, as long as that is smaller than `limit`.
struct RemovalLog {
    var: DomainId,
    step: Option<i32>,
    limit: i32,
    seen: Vec<i32>,
}

impl Propagator for RemovalLog {
    fn name(&self) -> &str {
        "RemovalLog"
    }

    fn propagate(&mut self, _context: PropagationContext) -> PropagationStatus {
        Ok(())
    }

    fn awake_on_removals(
        &mut self,
        mut context: PropagationContext,
        _local_id: LocalId,
        removed: DeltaIterator<'_>,
    ) -> PropagationStatus {
        for value in removed {
            self.seen.push(value);
            if let Some(step) = self.step {
                if value + step < self.limit {
                    let _ = context.remove_value(self.var, value + step)?;
                }
            }
        }
        Ok(())
    }

    fn is_satisfied(&self, _tuple: &[i32]) -> bool {
        true
    }
}

struct RemovalLogArgs {
    var: DomainId,
    step: Option<i32>,
    limit: i32,
}

impl PropagatorConstructor for RemovalLogArgs {
    type PropagatorImpl = RemovalLog;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<RemovalLog, ModelError> {
        context.register(self.var, DomainEvents::REMOVAL, LocalId::from(0));
        Ok(RemovalLog {
            var: self.var,
            step: self.step,
            limit: self.limit,
            seen: vec![],
        })
    }
}

#[test]
fn removals_made_while_reading_the_delta_are_seen_exactly_once() {
    let _ = env_logger::builder().is_test(true).try_init();

    for kind in [DomainKind::BitSet, DomainKind::LinkedList, DomainKind::Bipartite] {
        let mut state = State::new();
        let x = state
            .new_interval_variable_with_kind(0, 20, kind)
            .expect("non-empty");
        let pruner = state
            .add_propagator(RemovalLogArgs {
                var: x,
                step: Some(2),
                limit: 12,
            })
            .expect("well-formed");
        let observer = state
            .add_propagator(RemovalLogArgs {
                var: x,
                step: None,
                limit: 0,
            })
            .expect("well-formed");
        state.propagate_to_fixed_point().expect("nothing to prune");

        let world = state.world_push();
        let _ = state.post_remove(x, 0).expect("x is not fixed");
        let _ = state.post_remove(x, 1).expect("x is not fixed");
        state.propagate_to_fixed_point().expect("x keeps 12..=20");

        assert_eq!(
            state.iterate_domain(x).collect::<Vec<_>>(),
            (12..=20).collect::<Vec<_>>(),
            "{kind:?}"
        );
        for seen in [
            &state.get_propagator(pruner).expect("typed handle").seen,
            &state.get_propagator(observer).expect("typed handle").seen,
        ] {
            let mut seen = seen.clone();
            seen.sort_unstable();
            assert_eq!(seen, (0..12).collect::<Vec<_>>(), "{kind:?}");
        }

        state.restore_to(world);
        state.get_propagator_mut(pruner).expect("typed handle").seen.clear();
        state.get_propagator_mut(observer).expect("typed handle").seen.clear();
        let _ = state.post_remove(x, 15).expect("x is not fixed");
        state.propagate_to_fixed_point().expect("nothing to prune");

        assert_eq!(state.get_propagator(pruner).expect("typed handle").seen, vec![15]);
        assert_eq!(state.get_propagator(observer).expect("typed handle").seen, vec![15]);
    }
}
