use enumset::EnumSet;

use super::domains::DeltaDomain;
use super::domains::DomainKind;
use super::domains::DomainValues;
use super::domains::EmptyDomain;
use super::domains::FrozenDelta;
use super::domains::IntDomain;
use super::events::DomainEvent;
use super::variables::DomainId;
use crate::basic_types::Random;
use crate::containers::KeyedVec;
use crate::environment::Environment;
use crate::environment::StoredInt;

const NOT_FIXED: i64 = -1;

#[derive(Clone, Debug)]
struct VariableDomain {
    domain: IntDomain,
    delta: DeltaDomain,
    /// The depth of the world in which the domain became a singleton.
    fixed_in_world: StoredInt,
}

/// The domains of all variables, together with their deltas.
///
/// Reads and writes go through the [`Environment`] which owns the stored cells of the domains.
/// Every mutation returns the events it produced; an empty set means nothing changed.
#[derive(Clone, Debug, Default)]
pub struct Assignments {
    domains: KeyedVec<DomainId, VariableDomain>,
}

impl Assignments {
    /// Create a new domain with the given values, which have to be sorted, free of duplicates and
    /// non-empty.
    pub(crate) fn grow(
        &mut self,
        environment: &mut Environment,
        kind: DomainKind,
        values: &[i32],
    ) -> DomainId {
        let fixed_in_world = if values.len() == 1 {
            environment.current_world().depth() as i64
        } else {
            NOT_FIXED
        };

        self.domains.push(VariableDomain {
            domain: IntDomain::new(environment, kind, values),
            delta: DeltaDomain::default(),
            fixed_in_world: environment.make_int(fixed_in_world),
        })
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn domain_ids(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub(crate) fn kind(&self, var: DomainId) -> DomainKind {
        self.domains[var].domain.kind()
    }

    pub(crate) fn lower_bound(&self, var: DomainId, environment: &Environment) -> i32 {
        self.domains[var].domain.lower_bound(environment)
    }

    pub(crate) fn upper_bound(&self, var: DomainId, environment: &Environment) -> i32 {
        self.domains[var].domain.upper_bound(environment)
    }

    pub(crate) fn size(&self, var: DomainId, environment: &Environment) -> usize {
        self.domains[var].domain.size(environment)
    }

    pub(crate) fn contains(&self, var: DomainId, value: i32, environment: &Environment) -> bool {
        self.domains[var].domain.contains(environment, value)
    }

    pub(crate) fn is_fixed(&self, var: DomainId, environment: &Environment) -> bool {
        self.size(var, environment) == 1
    }

    pub(crate) fn fixed_value(&self, var: DomainId, environment: &Environment) -> Option<i32> {
        self.is_fixed(var, environment)
            .then(|| self.lower_bound(var, environment))
    }

    /// The depth of the world in which `var` became fixed, if it is fixed.
    pub(crate) fn fixed_in_world(&self, var: DomainId, environment: &Environment) -> Option<usize> {
        let depth = self.domains[var].fixed_in_world.read(environment);
        (depth != NOT_FIXED).then_some(depth as usize)
    }

    pub(crate) fn next_value(
        &self,
        var: DomainId,
        value: i32,
        environment: &Environment,
    ) -> Option<i32> {
        self.domains[var].domain.next_value(environment, value)
    }

    pub(crate) fn previous_value(
        &self,
        var: DomainId,
        value: i32,
        environment: &Environment,
    ) -> Option<i32> {
        self.domains[var].domain.previous_value(environment, value)
    }

    pub(crate) fn values<'a>(
        &'a self,
        var: DomainId,
        environment: &'a Environment,
    ) -> DomainValues<'a> {
        self.domains[var].domain.values(environment)
    }

    pub(crate) fn random_value(
        &self,
        var: DomainId,
        environment: &Environment,
        random: &mut dyn Random,
    ) -> i32 {
        self.domains[var].domain.random_value(environment, random)
    }

    pub(crate) fn update_lower_bound(
        &mut self,
        var: DomainId,
        value: i32,
        environment: &mut Environment,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let variable = &mut self.domains[var];
        let changed = variable
            .domain
            .update_lower_bound(environment, value, &mut variable.delta)?;
        Ok(changed.map_or(EnumSet::empty(), |_| {
            self.events_after_change(var, environment, true, false)
        }))
    }

    pub(crate) fn update_upper_bound(
        &mut self,
        var: DomainId,
        value: i32,
        environment: &mut Environment,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let variable = &mut self.domains[var];
        let changed = variable
            .domain
            .update_upper_bound(environment, value, &mut variable.delta)?;
        Ok(changed.map_or(EnumSet::empty(), |_| {
            self.events_after_change(var, environment, false, true)
        }))
    }

    pub(crate) fn remove(
        &mut self,
        var: DomainId,
        value: i32,
        environment: &mut Environment,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let variable = &mut self.domains[var];
        let lower_bound = variable.domain.lower_bound(environment);
        let upper_bound = variable.domain.upper_bound(environment);
        if !variable
            .domain
            .remove(environment, value, &mut variable.delta)?
        {
            return Ok(EnumSet::empty());
        }

        Ok(self.events_after_change(
            var,
            environment,
            value == lower_bound,
            value == upper_bound,
        ))
    }

    pub(crate) fn instantiate(
        &mut self,
        var: DomainId,
        value: i32,
        environment: &mut Environment,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let variable = &mut self.domains[var];
        let lower_bound = variable.domain.lower_bound(environment);
        let upper_bound = variable.domain.upper_bound(environment);
        if !variable
            .domain
            .restrict(environment, value, &mut variable.delta)?
        {
            return Ok(EnumSet::empty());
        }

        Ok(self.events_after_change(
            var,
            environment,
            value != lower_bound,
            value != upper_bound,
        ))
    }

    fn events_after_change(
        &mut self,
        var: DomainId,
        environment: &mut Environment,
        lower_bound_moved: bool,
        upper_bound_moved: bool,
    ) -> EnumSet<DomainEvent> {
        let mut events = EnumSet::only(DomainEvent::Removal);
        if lower_bound_moved {
            events |= DomainEvent::LowerBound;
        }
        if upper_bound_moved {
            events |= DomainEvent::UpperBound;
        }
        if self.is_fixed(var, environment) {
            events |= DomainEvent::Instantiate;
            let depth = environment.current_world().depth() as i64;
            self.domains[var].fixed_in_world.write(environment, depth);
        }
        events
    }

    pub(crate) fn freeze_delta(&mut self, var: DomainId) -> FrozenDelta {
        self.domains[var].delta.freeze()
    }

    /// Returns whether values were removed from `var` while the delta was frozen.
    pub(crate) fn release_delta(&mut self, var: DomainId, frozen: FrozenDelta) -> bool {
        self.domains[var].delta.release(frozen)
    }

    pub(crate) fn clear_delta(&mut self, var: DomainId) {
        self.domains[var].delta.clear()
    }

    pub(crate) fn has_pending_removals(&self, var: DomainId) -> bool {
        !self.domains[var].delta.is_empty()
    }
}
