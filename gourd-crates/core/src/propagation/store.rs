use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Priority;
use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;

/// Owns the propagators of a [`State`](crate::State), in the order they were added.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    entries: KeyedVec<PropagatorId, Entry>,
}

struct Entry {
    propagator: Box<dyn Propagator>,
    /// The priority is queried on every scheduling decision, so it is read once at insertion.
    priority: Priority,
}

/// A [`PropagatorId`] which remembers the type of the propagator, so the propagator can be
/// retrieved from the [`State`](crate::State) as that type.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub(crate) fn new(id: PropagatorId) -> Self {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    /// The id of the propagator, which no longer carries its type.
    pub fn propagator_id(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// The id the next added propagator will get; constructors register their watches under it
    /// before the propagator exists.
    pub(crate) fn next_id(&self) -> PropagatorId {
        PropagatorId(self.entries.len() as u32)
    }

    pub(crate) fn add(&mut self, propagator: Box<dyn Propagator>) -> PropagatorId {
        let priority = propagator.priority();
        self.entries.push(Entry {
            propagator,
            priority,
        })
    }

    pub(crate) fn priority(&self, id: PropagatorId) -> Priority {
        self.entries[id].priority
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (PropagatorId, &dyn Propagator)> + '_ {
        self.entries
            .keys()
            .zip(self.entries.iter())
            .map(|(id, entry)| (id, entry.propagator.as_ref()))
    }

    /// The propagator of `handle` as its concrete type.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.entries.get(handle.id)?.propagator.downcast_ref()
    }

    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.entries.get_mut(handle.id)?.propagator.downcast_mut()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, id: PropagatorId) -> &Self::Output {
        self.entries[id].propagator.as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, id: PropagatorId) -> &mut Self::Output {
        self.entries[id].propagator.as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(id, propagator)| (id, propagator.name())))
            .finish()
    }
}
