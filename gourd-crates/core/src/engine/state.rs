use enumset::EnumSet;
use log::debug;
use log::trace;

use super::assignments::Assignments;
use super::domains::width;
use super::domains::DomainKind;
use super::domains::MAX_DENSE_WIDTH;
use super::domains::FrozenDelta;
use super::events::DomainEvent;
use super::events::VariableEvent;
use super::notification_engine::ConstraintEvent;
use super::notification_engine::NotificationEngine;
use super::variables::DomainId;
use super::variables::Literal;
use super::watch_list::WatchLists;
use crate::basic_types::Contradiction;
use crate::basic_types::Inconsistency;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::basic_types::Random;
use crate::basic_types::Solution;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::environment::Environment;
use crate::environment::StoredInt;
use crate::environment::World;
use crate::gourd_asserts::gourd_assert_eq_simple;
use crate::gourd_asserts::gourd_assert_moderate;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::ReadDomains;
use crate::propagation::Priority;
use crate::propagation::store::PropagatorStore;
use crate::propagators::clause_store::ClauseStore;
use crate::statistics::Statistic;
use crate::statistics::StatisticOptions;

/// Options which determine how the engine schedules propagators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Skip propagators which are passive (entailed) until the engine backtracks past the world in
    /// which they became passive.
    pub active_tracking: bool,
    /// Ask a propagator whether it is entailed after each of its full propagations.
    pub check_entailment: bool,
    /// The number of priority classes of the event queues; priorities beyond the last class share
    /// the last class.
    pub num_priority_levels: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            active_tracking: true,
            check_entailment: true,
            num_priority_levels: Priority::NUM_PRIORITIES,
        }
    }
}

create_statistics_struct!(
    /// Statistics of the propagation engine.
    StateStatistics {
        num_propagator_calls: u64,
        num_events_dispatched: u64,
        num_contradictions: u64,
        num_entailments: u64,
        num_world_pushes: u64,
        num_world_pops: u64,
    }
);

/// The solver state: the variables with their domains, the propagators and the pending events.
///
/// Domain changes made by the search (through [`State::post_lower_bound`] and friends) and by
/// propagators are queued as variable events. [`State::propagate_to_fixed_point`] dispatches them
/// until no propagator can prune further, or returns the [`Contradiction`] which stopped it.
/// [`State::world_push`] and [`State::restore_to`] take and restore checkpoints of every domain and
/// every piece of backtrackable propagator state.
#[derive(Debug)]
pub struct State {
    pub(crate) environment: Environment,
    pub(crate) assignments: Assignments,
    pub(crate) watch_lists: WatchLists,
    pub(crate) notification_engine: NotificationEngine,
    pub(crate) propagators: PropagatorStore,
    /// Whether a propagator is active, 1 or 0.
    active: KeyedVec<PropagatorId, StoredInt>,
    /// Propagators added (or given new clauses) below the root, with the deepest world whose
    /// restore has to repeat their first propagation.
    posted_below_root: Vec<(usize, PropagatorId)>,
    options: EngineOptions,
    statistics: StateStatistics,
}

impl Default for State {
    fn default() -> Self {
        State::with_options(EngineOptions::default())
    }
}

impl HasAssignments for State {
    fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    fn environment(&self) -> &Environment {
        &self.environment
    }
}

impl State {
    pub fn new() -> State {
        State::default()
    }

    pub fn with_options(options: EngineOptions) -> State {
        let options = EngineOptions {
            num_priority_levels: options.num_priority_levels.max(1),
            ..options
        };

        State {
            environment: Environment::default(),
            assignments: Assignments::default(),
            watch_lists: WatchLists::default(),
            notification_engine: NotificationEngine::new(options.num_priority_levels),
            propagators: PropagatorStore::default(),
            active: KeyedVec::default(),
            posted_below_root: Vec::default(),
            options,
            statistics: StateStatistics::default(),
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Get the current domains.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments, &self.environment)
    }

    pub fn num_domains(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// The representation of the domain of `var`.
    pub fn domain_kind(&self, var: DomainId) -> DomainKind {
        self.assignments.kind(var)
    }
}

// Variables
impl State {
    /// Create a variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<DomainId, ModelError> {
        self.new_interval_variable_with_kind(lower_bound, upper_bound, DomainKind::BitSet)
    }

    pub fn new_interval_variable_with_kind(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        kind: DomainKind,
    ) -> Result<DomainId, ModelError> {
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidDomain {
                lower_bound,
                upper_bound,
            });
        }

        // The values are listed one by one, so every kind is limited here.
        if width(lower_bound, upper_bound) > MAX_DENSE_WIDTH {
            return Err(ModelError::DomainTooWide {
                lower_bound,
                upper_bound,
                kind,
            });
        }

        let values: Vec<i32> = (lower_bound..=upper_bound).collect();
        self.grow(kind, &values)
    }

    /// Create a variable with the given values, in any order and possibly with duplicates. The
    /// representation is chosen from how sparse the values are.
    pub fn new_sparse_variable(
        &mut self,
        values: impl IntoIterator<Item = i32>,
    ) -> Result<DomainId, ModelError> {
        let values = Self::sorted_values(values)?;
        let kind = DomainKind::for_values(values.len(), width(values[0], values[values.len() - 1]));
        self.grow(kind, &values)
    }

    pub fn new_sparse_variable_with_kind(
        &mut self,
        values: impl IntoIterator<Item = i32>,
        kind: DomainKind,
    ) -> Result<DomainId, ModelError> {
        let values = Self::sorted_values(values)?;
        self.grow(kind, &values)
    }

    /// Create a 0/1 variable; [`Literal::new`] gives the literal which is true when it is 1.
    pub fn new_boolean_variable(&mut self) -> DomainId {
        let domain = self.assignments.grow(&mut self.environment, DomainKind::BitSet, &[0, 1]);
        self.register_domain(domain);
        domain
    }

    fn sorted_values(values: impl IntoIterator<Item = i32>) -> Result<Vec<i32>, ModelError> {
        let mut values: Vec<i32> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        if values.is_empty() {
            return Err(ModelError::InvalidDomain {
                lower_bound: 0,
                upper_bound: -1,
            });
        }
        Ok(values)
    }

    /// `values` has to be sorted, free of duplicates and non-empty.
    fn grow(&mut self, kind: DomainKind, values: &[i32]) -> Result<DomainId, ModelError> {
        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        if kind != DomainKind::Bipartite && width(lower_bound, upper_bound) > MAX_DENSE_WIDTH {
            return Err(ModelError::DomainTooWide {
                lower_bound,
                upper_bound,
                kind,
            });
        }

        let domain = self.assignments.grow(&mut self.environment, kind, values);
        self.register_domain(domain);
        trace!("created {domain} with {} values as {kind:?}", values.len());
        Ok(domain)
    }

    fn register_domain(&mut self, domain: DomainId) {
        let watched = self.watch_lists.grow();
        gourd_assert_eq_simple!(domain, watched);
        self.notification_engine.grow();
    }

    /// A value of the domain of `var`, drawn uniformly.
    pub fn random_value(&self, var: DomainId, random: &mut dyn Random) -> i32 {
        self.assignments
            .random_value(var, &self.environment, random)
    }

    /// The values of all variables, if every variable is fixed.
    pub fn solution(&self) -> Option<Solution> {
        let mut values = KeyedVec::default();
        for var in self.assignments.domain_ids() {
            let _ = values.push(self.fixed_value(var)?);
        }
        Some(Solution::new(values))
    }
}

// Domain operations of the search
impl State {
    /// Remove all values smaller than `bound` from `var`. Returns whether the domain changed.
    ///
    /// The change is propagated by the next call to [`State::propagate_to_fixed_point`].
    pub fn post_lower_bound(&mut self, var: DomainId, bound: i32) -> Result<bool, Contradiction> {
        let events = self
            .assignments
            .update_lower_bound(var, bound, &mut self.environment)
            .map_err(|_| Self::decision_conflict(var))?;
        Ok(self.record_decision(var, events))
    }

    /// Remove all values larger than `bound` from `var`. Returns whether the domain changed.
    pub fn post_upper_bound(&mut self, var: DomainId, bound: i32) -> Result<bool, Contradiction> {
        let events = self
            .assignments
            .update_upper_bound(var, bound, &mut self.environment)
            .map_err(|_| Self::decision_conflict(var))?;
        Ok(self.record_decision(var, events))
    }

    /// Remove `value` from `var`. Returns whether the domain changed.
    pub fn post_remove(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        let events = self
            .assignments
            .remove(var, value, &mut self.environment)
            .map_err(|_| Self::decision_conflict(var))?;
        Ok(self.record_decision(var, events))
    }

    /// Fix `var` to `value`. Assigning a value outside the domain is a contradiction.
    pub fn post_assign(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        let events = self
            .assignments
            .instantiate(var, value, &mut self.environment)
            .map_err(|_| Self::decision_conflict(var))?;
        Ok(self.record_decision(var, events))
    }

    fn decision_conflict(domain: DomainId) -> Contradiction {
        Contradiction::EmptyDomain {
            domain,
            propagator: None,
        }
    }

    fn record_decision(&mut self, var: DomainId, events: EnumSet<DomainEvent>) -> bool {
        self.notification_engine
            .record_domain_event(var, events, None);
        !events.is_empty()
    }
}

// Worlds
impl State {
    /// Open a new world; returns the world that was current before, to which
    /// [`State::restore_to`] returns.
    pub fn world_push(&mut self) -> World {
        self.statistics.num_world_pushes += 1;
        let world = self.environment.world_push();
        trace!("pushed world {}", self.environment.current_world());
        world
    }

    /// Close the current world, undoing every change made in it.
    pub fn world_pop(&mut self) {
        self.statistics.num_world_pops += 1;
        self.notification_engine.flush(&mut self.assignments);
        self.environment.world_pop();
        self.awake_posted_below(self.environment.current_world().depth());
        trace!("popped to world {}", self.environment.current_world());
    }

    /// Close worlds until `world` is the current world again.
    pub fn restore_to(&mut self, world: World) {
        let current = self.environment.current_world();
        self.statistics.num_world_pops += current.depth().saturating_sub(world.depth()) as u64;
        self.notification_engine.flush(&mut self.assignments);
        self.environment.restore_to(world);
        self.awake_posted_below(world.depth());
        trace!("restored to world {world}");
    }

    /// The pruning of a first propagation done below `depth` has just been undone, so it is
    /// repeated in the restored world.
    fn awake_posted_below(&mut self, depth: usize) {
        let notification_engine = &mut self.notification_engine;
        self.posted_below_root.retain_mut(|(posted_at, propagator)| {
            if *posted_at > depth {
                notification_engine.enqueue_constraint_event(*propagator, ConstraintEvent::Awake);
                *posted_at = depth;
            }
            *posted_at > 0
        });
    }

    fn record_posted(&mut self, propagator: PropagatorId) {
        let depth = self.environment.current_world().depth();
        if depth > 0 {
            self.posted_below_root.push((depth, propagator));
        }
    }

    pub fn current_world(&self) -> World {
        self.environment.current_world()
    }
}

// Propagators
impl State {
    /// Add a propagator. Its first propagation happens in the next call to
    /// [`State::propagate_to_fixed_point`], after every variable event pending by then.
    ///
    /// A propagator added below the root is kept when the engine backtracks; its first propagation
    /// is then repeated in the restored world.
    ///
    /// Returns a handle through which the concrete propagator can be retrieved.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ModelError>
    where
        Constructor: PropagatorConstructor,
    {
        let propagator_id = self.propagators.next_id();
        let context = PropagatorConstructorContext::new(propagator_id, self);
        let propagator = match constructor.create(context) {
            Ok(propagator) => propagator,
            Err(error) => {
                self.watch_lists.unwatch_all(propagator_id);
                debug!("rejected propagator: {error}");
                return Err(error);
            }
        };

        let priority = propagator.priority();
        debug!("adding {} as {propagator_id}", propagator.name());

        let id = self.propagators.add(Box::new(propagator));
        gourd_assert_eq_simple!(id, propagator_id);

        let active = self.environment.make_int(1);
        let _ = self.active.push(active);

        self.notification_engine.register_propagator(id, priority);
        for &var in self.watch_lists.scope(id).iter().flatten() {
            self.notification_engine.watch_with_priority(var, priority);
        }
        self.notification_engine
            .enqueue_constraint_event(id, ConstraintEvent::Awake);
        self.record_posted(id);

        Ok(PropagatorHandle::new(id))
    }

    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    /// Whether the propagator is active, i.e. not passive in the current world.
    pub fn is_active(&self, propagator: PropagatorId) -> bool {
        self.active[propagator].read(&self.environment) != 0
    }

    /// Whether the constraint of the propagator holds for every (`Some(true)`) or for no
    /// (`Some(false)`) assignment of the current domains.
    pub fn is_entailed<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<bool> {
        self.entailment(handle.propagator_id())
    }

    /// Add a clause over 0/1 variables to a clause store. The clause is propagated by the next call
    /// to [`State::propagate_to_fixed_point`], and is kept when the engine backtracks.
    pub fn add_clause(
        &mut self,
        clause_store: PropagatorHandle<ClauseStore>,
        literals: impl IntoIterator<Item = Literal>,
    ) -> Result<(), ModelError> {
        let literals: Vec<Literal> = literals.into_iter().collect();
        for literal in &literals {
            let var = literal.domain();
            if self.lower_bound(var) < 0 || self.upper_bound(var) > 1 {
                return Err(ModelError::NonBooleanVariable(var));
            }
        }

        let propagator_id = clause_store.propagator_id();
        let priority = self.propagators.priority(propagator_id);
        let Some(store) = self.propagators.get_propagator_mut(clause_store) else {
            unreachable!("a typed handle always refers to a propagator of that type")
        };

        for (var, local_id) in store.add_clause(literals) {
            self.watch_lists.watch(
                var,
                propagator_id,
                local_id,
                DomainEvents::ASSIGN.events(),
            );
            self.notification_engine.watch_with_priority(var, priority);
        }

        // The store may have become passive in a world below the current one; the new clause
        // has to be watched there too.
        self.active[propagator_id].overwrite(&mut self.environment, 1);
        self.notification_engine
            .enqueue_constraint_event(propagator_id, ConstraintEvent::Propagate);
        self.record_posted(propagator_id);
        Ok(())
    }

    /// Schedule a full propagation of every active propagator for the next call to
    /// [`State::propagate_to_fixed_point`].
    pub fn request_full_propagation(&mut self) {
        let ids = self.propagators.iter().map(|(id, _)| id).collect::<Vec<_>>();
        for propagator in ids {
            self.notification_engine
                .enqueue_constraint_event(propagator, ConstraintEvent::Propagate);
        }
    }

    fn entailment(&self, propagator: PropagatorId) -> Option<bool> {
        self.propagators[propagator]
            .is_entailed(self.domains())
            .or_else(|| self.evaluate_fixed_scope(propagator))
    }

    /// If every variable of the propagator is fixed, whether the constraint holds.
    fn evaluate_fixed_scope(&self, propagator: PropagatorId) -> Option<bool> {
        let scope = self.watch_lists.scope(propagator);
        if scope.is_empty() {
            return None;
        }

        let tuple = scope
            .iter()
            .map(|var| var.and_then(|var| self.fixed_value(var)))
            .collect::<Option<Vec<i32>>>()?;
        Some(self.propagators[propagator].is_satisfied(&tuple))
    }
}

// Propagation
impl State {
    /// Dispatch queued events until no propagator can prune further.
    ///
    /// Variable events are dispatched by priority, then in the order they were posted. Constraint
    /// events (first propagations and requested propagations) are only dispatched when no variable
    /// event is pending. On a contradiction every pending event is discarded; the state should then
    /// be restored to an earlier world.
    pub fn propagate_to_fixed_point(&mut self) -> Result<(), Contradiction> {
        let result = self.propagation_loop();

        if let Err(contradiction) = result {
            self.statistics.num_contradictions += 1;
            debug!("contradiction: {contradiction}");
            self.notification_engine.flush(&mut self.assignments);
        }

        result
    }

    fn propagation_loop(&mut self) -> Result<(), Contradiction> {
        loop {
            if let Some((var, event)) = self.notification_engine.pop_variable_event() {
                self.dispatch_variable_event(var, event)?;
                continue;
            }

            let Some((propagator, event)) = self.notification_engine.pop_constraint_event()
            else {
                return Ok(());
            };
            self.dispatch_constraint_event(propagator, event)?;
        }
    }

    fn dispatch_variable_event(
        &mut self,
        var: DomainId,
        event: VariableEvent,
    ) -> Result<(), Contradiction> {
        let frozen = self.assignments.freeze_delta(var);

        let mut result = Ok(());
        let mut index = 0;
        while let Some(&watcher) = self.watch_lists.watchers(var).get(index) {
            index += 1;

            let relevant = watcher.events & event.mask;
            let propagator = watcher.propagator;
            if relevant.is_empty() || !self.should_wake(propagator, event) {
                continue;
            }

            self.statistics.num_events_dispatched += 1;
            self.statistics.num_propagator_calls += 1;
            let context = PropagationContext::new(
                &mut self.environment,
                &mut self.assignments,
                &mut self.notification_engine,
                propagator,
                self.active[propagator],
            );
            let status = Self::call_hooks(
                &mut self.propagators[propagator],
                context,
                watcher.local_id,
                relevant,
                &frozen,
            );

            if let Err(inconsistency) = status {
                result = Err(Self::contradiction(inconsistency, propagator));
                break;
            }
        }

        let pending = self.assignments.release_delta(var, frozen);
        gourd_assert_moderate!(
            result.is_err() || !pending || self.notification_engine.has_variable_events(),
            "new removals of {var} must be queued"
        );
        if result.is_err() {
            self.assignments.clear_delta(var);
        }

        result
    }

    fn should_wake(&self, propagator: PropagatorId, event: VariableEvent) -> bool {
        if event.caused_by(propagator) && self.propagators[propagator].is_idempotent() {
            return false;
        }
        if self.options.active_tracking && !self.is_active(propagator) {
            return false;
        }
        !self.notification_engine.is_awaiting_awake(propagator)
    }

    /// An instantiation is handled by [`Propagator::awake_on_inst`] alone; otherwise the hook of
    /// every other kind of event is called.
    fn call_hooks(
        propagator: &mut dyn Propagator,
        mut context: PropagationContext,
        local_id: LocalId,
        relevant: EnumSet<DomainEvent>,
        frozen: &FrozenDelta,
    ) -> PropagationStatus {
        if relevant.contains(DomainEvent::Instantiate) {
            return propagator.awake_on_inst(context, local_id);
        }

        if relevant.contains(DomainEvent::LowerBound) {
            propagator.awake_on_inf(context.reborrow(), local_id)?;
        }
        if relevant.contains(DomainEvent::UpperBound) {
            propagator.awake_on_sup(context.reborrow(), local_id)?;
        }
        if relevant.contains(DomainEvent::Removal) && !frozen.is_empty() {
            propagator.awake_on_removals(context, local_id, frozen.iter())?;
        }

        Ok(())
    }

    fn dispatch_constraint_event(
        &mut self,
        propagator: PropagatorId,
        event: ConstraintEvent,
    ) -> Result<(), Contradiction> {
        if event == ConstraintEvent::Propagate
            && self.options.active_tracking
            && !self.is_active(propagator)
        {
            return Ok(());
        }

        self.statistics.num_propagator_calls += 1;
        let context = PropagationContext::new(
            &mut self.environment,
            &mut self.assignments,
            &mut self.notification_engine,
            propagator,
            self.active[propagator],
        );
        let status = match event {
            ConstraintEvent::Awake => self.propagators[propagator].awake(context),
            ConstraintEvent::Propagate => self.propagators[propagator].propagate(context),
        };
        if let Err(inconsistency) = status {
            // A failed first propagation is repeated after backtracking.
            if event == ConstraintEvent::Awake {
                self.notification_engine
                    .enqueue_constraint_event(propagator, ConstraintEvent::Awake);
            }
            return Err(Self::contradiction(inconsistency, propagator));
        }

        if self.options.check_entailment {
            self.check_entailment(propagator)?;
        }
        Ok(())
    }

    fn check_entailment(&mut self, propagator: PropagatorId) -> Result<(), Contradiction> {
        match self.entailment(propagator) {
            Some(true) => {
                self.statistics.num_entailments += 1;
                trace!("{propagator} is entailed");
                if self.options.active_tracking {
                    self.active[propagator].write(&mut self.environment, 0);
                }
                Ok(())
            }
            Some(false) => Err(Contradiction::Propagator {
                propagator,
                reason: "the constraint is violated",
            }),
            None => Ok(()),
        }
    }

    fn contradiction(inconsistency: Inconsistency, propagator: PropagatorId) -> Contradiction {
        match inconsistency {
            Inconsistency::EmptyDomain(conflict) => Contradiction::EmptyDomain {
                domain: conflict.domain,
                propagator: Some(propagator),
            },
            Inconsistency::Conflict(conflict) => Contradiction::Propagator {
                propagator,
                reason: conflict.reason,
            },
        }
    }
}

// Statistics
impl State {
    /// Write the statistics of the engine and of every propagator.
    pub fn log_statistics(&self, options: &mut StatisticOptions) {
        self.statistics.log(options.logger("engine"));
        for (id, propagator) in self.propagators.iter() {
            propagator.log_statistics(options.logger(format!("{}_{}", propagator.name(), id.0)));
        }
        options.log_statistic_postfix();
    }
}
