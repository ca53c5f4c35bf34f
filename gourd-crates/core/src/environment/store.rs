use log::trace;

use super::StoredBitSet;
use super::StoredInt;
use super::StoredIntVector;
use super::World;
use crate::basic_types::Trail;
use crate::gourd_asserts::gourd_assert_simple;

/// Stamp of a cell which has not been written since its creation. It matches no world, so the
/// initial value is trailed by the first write outside the root.
const FRESH: usize = usize::MAX;

/// A value together with the identifier of the world in which it was last saved to the trail.
#[derive(Clone, Copy, Debug)]
struct Cell<T> {
    value: T,
    stamp: usize,
}

#[derive(Clone, Copy, Debug)]
enum StoredChange {
    Int { index: usize, old: Cell<i64> },
    Word { index: usize, old: Cell<u64> },
}

/// Owner of all backtrackable cells.
///
/// Writes are copy-on-write per cell: the previous value of a cell is trailed at most once per
/// world, so popping a world costs time proportional to the number of distinct cells written in it.
/// Writes at the root world are never trailed, since the root cannot be popped.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    ints: Vec<Cell<i64>>,
    words: Vec<Cell<u64>>,
    trail: Trail<StoredChange>,
    /// Identifiers of the open worlds, excluding the root (which has identifier 0). Identifiers
    /// are never reused, so a stamp left behind by a popped world never matches a later one.
    world_ids: Vec<usize>,
    num_worlds_created: usize,
}

impl Environment {
    pub fn make_int(&mut self, initial_value: i64) -> StoredInt {
        let index = self.new_int_cell(initial_value);
        StoredInt { index }
    }

    pub fn make_int_vector(&mut self, values: impl IntoIterator<Item = i64>) -> StoredIntVector {
        let start = self.ints.len();
        for value in values {
            let _ = self.new_int_cell(value);
        }

        StoredIntVector {
            start,
            len: self.ints.len() - start,
        }
    }

    /// Creates a bitset of `num_bits` bits which are all unset.
    pub fn make_bitset(&mut self, num_bits: usize) -> StoredBitSet {
        self.make_bitset_with(num_bits, std::iter::empty())
    }

    /// Creates a bitset of `num_bits` bits in which exactly the bits of `ones` are set.
    pub fn make_bitset_with(
        &mut self,
        num_bits: usize,
        ones: impl IntoIterator<Item = usize>,
    ) -> StoredBitSet {
        let first_word = self.words.len();
        let num_words = num_bits.div_ceil(64);
        self.words.extend(std::iter::repeat_n(
            Cell {
                value: 0,
                stamp: FRESH,
            },
            num_words,
        ));
        for bit in ones {
            assert!(bit < num_bits, "bit {bit} out of bounds");
            self.words[first_word + bit / 64].value |= 1 << (bit % 64);
        }

        StoredBitSet {
            first_word,
            num_words,
            num_bits,
        }
    }

    /// Open a new world. The returned token identifies the world which was current before the
    /// push.
    pub fn world_push(&mut self) -> World {
        let left = self.current_world();
        self.trail.push_world();
        self.num_worlds_created += 1;
        self.world_ids.push(self.num_worlds_created);
        trace!("pushed {}", self.current_world());
        left
    }

    /// Undo every write of the current world and return to its parent.
    pub fn world_pop(&mut self) {
        gourd_assert_simple!(
            self.trail.current_world() > 0,
            "cannot pop the root world"
        );
        self.restore_to(World {
            depth: self.trail.current_world() - 1,
        });
    }

    /// Pop worlds until `world` is the current world again. Does nothing if `world` is current.
    pub fn restore_to(&mut self, world: World) {
        gourd_assert_simple!(world.depth <= self.trail.current_world());
        if world.depth == self.trail.current_world() {
            return;
        }

        self.world_ids.truncate(world.depth);
        for change in self.trail.restore_to(world.depth) {
            match change {
                StoredChange::Int { index, old } => self.ints[index] = old,
                StoredChange::Word { index, old } => self.words[index] = old,
            }
        }
        trace!("restored to {world}");
    }

    pub fn current_world(&self) -> World {
        World {
            depth: self.trail.current_world(),
        }
    }

    pub(crate) fn read_int(&self, index: usize) -> i64 {
        self.ints[index].value
    }

    pub(crate) fn write_int(&mut self, index: usize, value: i64) {
        let world_id = self.current_world_id();
        let cell = &mut self.ints[index];
        if cell.value == value {
            return;
        }

        if world_id != 0 && cell.stamp != world_id {
            self.trail.push(StoredChange::Int { index, old: *cell });
            cell.stamp = world_id;
        }
        cell.value = value;
    }

    /// Set the value of a cell in the current world and in every world below it, so that no
    /// restore brings back an older value.
    pub(crate) fn overwrite_int(&mut self, index: usize, value: i64) {
        self.ints[index].value = value;
        for change in self.trail.entries_mut() {
            match change {
                StoredChange::Int { index: changed, old } if *changed == index => old.value = value,
                _ => {}
            }
        }
    }

    pub(crate) fn read_word(&self, index: usize) -> u64 {
        self.words[index].value
    }

    pub(crate) fn write_word(&mut self, index: usize, value: u64) {
        let world_id = self.current_world_id();
        let cell = &mut self.words[index];
        if cell.value == value {
            return;
        }

        if world_id != 0 && cell.stamp != world_id {
            self.trail.push(StoredChange::Word { index, old: *cell });
            cell.stamp = world_id;
        }
        cell.value = value;
    }

    fn current_world_id(&self) -> usize {
        self.world_ids.last().copied().unwrap_or(0)
    }

    fn new_int_cell(&mut self, value: i64) -> usize {
        self.ints.push(Cell {
            value,
            stamp: FRESH,
        });
        self.ints.len() - 1
    }

    #[cfg(test)]
    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_trailed_once_per_world() {
        let mut env = Environment::default();
        let int = env.make_int(0);

        let _ = env.world_push();
        for value in 1..10 {
            int.write(&mut env, value);
        }

        assert_eq!(1, env.trail_len());
        assert_eq!(9, int.read(&env));
    }

    #[test]
    fn root_writes_are_not_trailed() {
        let mut env = Environment::default();
        let int = env.make_int(0);

        int.write(&mut env, 4);

        assert_eq!(0, env.trail_len());
        assert_eq!(4, int.read(&env));
    }

    #[test]
    fn popping_restores_values_of_nested_worlds() {
        let mut env = Environment::default();
        let int = env.make_int(1);

        let root = env.world_push();
        int.write(&mut env, 2);
        let _ = env.world_push();
        int.write(&mut env, 3);

        env.world_pop();
        assert_eq!(2, int.read(&env));

        let _ = env.world_push();
        int.write(&mut env, 5);
        env.restore_to(root);
        assert_eq!(1, int.read(&env));
        assert_eq!(World::ROOT, env.current_world());
    }

    #[test]
    fn cell_created_inside_world_is_restored_to_initial_value_of_that_world() {
        let mut env = Environment::default();
        let _ = env.world_push();
        let int = env.make_int(7);
        let _ = env.world_push();
        int.write(&mut env, 8);

        env.world_pop();

        assert_eq!(7, int.read(&env));
    }

    #[test]
    fn first_write_in_the_creating_world_is_undone() {
        let mut env = Environment::default();
        let root = env.world_push();
        let int = env.make_int(1);
        let bits = env.make_bitset_with(70, [3, 65]);
        int.write(&mut env, 0);
        bits.remove(&mut env, 65);

        env.restore_to(root);

        assert_eq!(1, int.read(&env));
        assert!(bits.contains(&env, 3));
        assert!(bits.contains(&env, 65));
    }

    #[test]
    fn overwritten_cells_survive_restoring() {
        let mut env = Environment::default();
        let int = env.make_int(0);
        let root = env.world_push();
        int.write(&mut env, 2);
        let _ = env.world_push();
        int.write(&mut env, 3);

        int.overwrite(&mut env, 1);
        env.restore_to(root);

        assert_eq!(1, int.read(&env));
        let _ = env.world_push();
        int.write(&mut env, 5);
        env.world_pop();
        assert_eq!(1, int.read(&env));
    }

    #[test]
    fn cell_created_in_popped_world_is_trailed_in_later_worlds() {
        let mut env = Environment::default();
        let _ = env.world_push();
        let int = env.make_int(1);
        env.world_pop();

        let _ = env.world_push();
        int.write(&mut env, 2);
        env.world_pop();

        assert_eq!(1, int.read(&env));
    }

    #[test]
    fn restoring_to_the_current_world_is_a_no_op() {
        let mut env = Environment::default();
        let int = env.make_int(1);
        let _ = env.world_push();
        int.write(&mut env, 2);

        env.restore_to(env.current_world());

        assert_eq!(2, int.read(&env));
    }

    #[test]
    #[should_panic]
    fn popping_the_root_world_panics() {
        let mut env = Environment::default();
        env.world_pop();
    }
}
