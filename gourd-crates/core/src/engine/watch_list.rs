use enumset::EnumSet;

use super::events::DomainEvent;
use super::variables::DomainId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// A propagator watching a variable, with the events it wants to be woken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Watcher {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
    pub(crate) events: EnumSet<DomainEvent>,
}

/// For every variable, the propagators watching it in registration order; for every propagator,
/// its scope indexed by [`LocalId`].
#[derive(Debug, Default, Clone)]
pub(crate) struct WatchLists {
    watchers: KeyedVec<DomainId, Vec<Watcher>>,
    scopes: KeyedVec<PropagatorId, Vec<Option<DomainId>>>,
}

impl WatchLists {
    pub(crate) fn grow(&mut self) -> DomainId {
        self.watchers.push(vec![])
    }

    /// Subscribe `propagator` to `events` on `var`. Registering the same variable twice under the
    /// same local id combines the events.
    pub(crate) fn watch(
        &mut self,
        var: DomainId,
        propagator: PropagatorId,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
    ) {
        let watchers = &mut self.watchers[var];
        match watchers
            .iter_mut()
            .find(|watcher| watcher.propagator == propagator && watcher.local_id == local_id)
        {
            Some(watcher) => watcher.events |= events,
            None => watchers.push(Watcher {
                propagator,
                local_id,
                events,
            }),
        }

        self.scopes.accomodate(propagator, vec![]);
        let scope = &mut self.scopes[propagator];
        if scope.len() <= local_id.index() {
            scope.resize(local_id.index() + 1, None);
        }
        scope[local_id.index()] = Some(var);
    }

    /// Remove every subscription of `propagator`.
    pub(crate) fn unwatch_all(&mut self, propagator: PropagatorId) {
        let Some(scope) = self.scopes.get_mut(propagator) else {
            return;
        };
        for var in std::mem::take(scope).into_iter().flatten() {
            self.watchers[var].retain(|watcher| watcher.propagator != propagator);
        }
    }

    pub(crate) fn watchers(&self, var: DomainId) -> &[Watcher] {
        &self.watchers[var]
    }

    pub(crate) fn scope(&self, propagator: PropagatorId) -> &[Option<DomainId>] {
        self.scopes
            .get(propagator)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
