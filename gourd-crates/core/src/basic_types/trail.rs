use std::iter::Rev;
use std::vec::Drain;

use crate::gourd_asserts::gourd_assert_simple;

/// A stack of entries split into segments, one per world. Popping a world yields the entries which
/// were pushed in it, most recent first.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_world: usize,
    /// At index i is the position where the i-th world ends (exclusive) on the trail.
    world_delimiter: Vec<usize>,
    trail: Vec<T>,
}

// Implemented by hand to avoid imposing Default on T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_world: Default::default(),
            world_delimiter: Default::default(),
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn push_world(&mut self) {
        self.current_world += 1;
        self.world_delimiter.push(self.trail.len());
    }

    pub(crate) fn current_world(&self) -> usize {
        self.current_world
    }

    /// Drop back to `world`, returning the entries of all popped worlds in reverse order of
    /// insertion.
    pub(crate) fn restore_to(&mut self, world: usize) -> Rev<Drain<'_, T>> {
        gourd_assert_simple!(
            world < self.current_world,
            "cannot restore to world {world} from world {}",
            self.current_world
        );

        let new_trail_len = self.world_delimiter[world];

        self.current_world = world;
        self.world_delimiter.truncate(world);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }

    pub(crate) fn len(&self) -> usize {
        self.trail.len()
    }

    /// The entries of every world, oldest first.
    pub(crate) fn entries_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.trail.iter_mut()
    }
}
