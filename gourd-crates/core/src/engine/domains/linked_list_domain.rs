use super::DeltaDomain;
use super::EmptyDomain;
use crate::basic_types::Random;
use crate::environment::Environment;
use crate::environment::StoredBitSet;
use crate::environment::StoredInt;
use crate::environment::StoredIntVector;

/// Sentinel for "no predecessor" in the links.
const NONE_BEFORE: i64 = -1;

/// A domain stored as a doubly-linked list over the present values. Removing a value unlinks it in
/// constant time; since the links live in stored vectors, backtracking relinks it.
#[derive(Clone, Debug)]
pub(crate) struct LinkedListDomain {
    offset: i64,
    width: usize,
    /// For a present value, the index of the next present value or `width` if there is none.
    next: StoredIntVector,
    /// For a present value, the index of the previous present value or [`NONE_BEFORE`].
    previous: StoredIntVector,
    present: StoredBitSet,
    lower_bound: StoredInt,
    upper_bound: StoredInt,
    size: StoredInt,
}

impl LinkedListDomain {
    /// `values` has to be sorted, free of duplicates and non-empty.
    pub(crate) fn new(environment: &mut Environment, values: &[i32]) -> LinkedListDomain {
        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let offset = i64::from(lower_bound);
        let width = super::width(lower_bound, upper_bound);
        let index = |value: i32| (i64::from(value) - offset) as usize;

        let mut next = vec![width as i64; width];
        let mut previous = vec![NONE_BEFORE; width];
        for pair in values.windows(2) {
            let (from, to) = (index(pair[0]), index(pair[1]));
            next[from] = to as i64;
            previous[to] = from as i64;
        }

        let present = environment.make_bitset_with(width, values.iter().map(|&value| index(value)));

        LinkedListDomain {
            offset,
            width,
            next: environment.make_int_vector(next),
            previous: environment.make_int_vector(previous),
            present,
            lower_bound: environment.make_int(offset),
            upper_bound: environment.make_int(upper_bound.into()),
            size: environment.make_int(values.len() as i64),
        }
    }

    fn index(&self, value: i32) -> usize {
        (i64::from(value) - self.offset) as usize
    }

    fn value_at(&self, index: usize) -> i32 {
        (index as i64 + self.offset) as i32
    }

    pub(crate) fn lower_bound(&self, environment: &Environment) -> i32 {
        self.lower_bound.read(environment) as i32
    }

    pub(crate) fn upper_bound(&self, environment: &Environment) -> i32 {
        self.upper_bound.read(environment) as i32
    }

    pub(crate) fn size(&self, environment: &Environment) -> usize {
        self.size.read(environment) as usize
    }

    pub(crate) fn contains(&self, environment: &Environment, value: i32) -> bool {
        value >= self.lower_bound(environment)
            && value <= self.upper_bound(environment)
            && self.present.contains(environment, self.index(value))
    }

    pub(crate) fn next_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        if value < self.lower_bound(environment) {
            return Some(self.lower_bound(environment));
        }
        if value >= self.upper_bound(environment) {
            return None;
        }

        let next = if self.contains(environment, value) {
            self.next.read(environment, self.index(value)) as usize
        } else {
            self.present
                .next_set_bit(environment, self.index(value + 1))?
        };
        Some(self.value_at(next))
    }

    pub(crate) fn previous_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        if value > self.upper_bound(environment) {
            return Some(self.upper_bound(environment));
        }
        if value <= self.lower_bound(environment) {
            return None;
        }

        let previous = if self.contains(environment, value) {
            self.previous
                .read(environment, self.index(value)) as usize
        } else {
            self.present
                .previous_set_bit(environment, self.index(value - 1))?
        };
        Some(self.value_at(previous))
    }

    pub(crate) fn update_lower_bound(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<Option<i32>, EmptyDomain> {
        if value <= self.lower_bound(environment) {
            return Ok(None);
        }
        if value > self.upper_bound(environment) {
            return Err(EmptyDomain);
        }

        let mut current = self.index(self.lower_bound(environment));
        let mut removed = 0;
        while self.value_at(current) < value {
            self.present.remove(environment, current);
            delta.push(self.value_at(current));
            removed += 1;
            current = self.next.read(environment, current) as usize;
        }

        self.previous.write(environment, current, NONE_BEFORE);
        self.size.add(environment, -removed);
        let new_lower_bound = self.value_at(current);
        self.lower_bound
            .write(environment, new_lower_bound.into());
        Ok(Some(new_lower_bound))
    }

    pub(crate) fn update_upper_bound(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<Option<i32>, EmptyDomain> {
        if value >= self.upper_bound(environment) {
            return Ok(None);
        }
        if value < self.lower_bound(environment) {
            return Err(EmptyDomain);
        }

        let mut current = self.index(self.upper_bound(environment));
        let mut removed = 0;
        while self.value_at(current) > value {
            self.present.remove(environment, current);
            delta.push(self.value_at(current));
            removed += 1;
            current = self.previous.read(environment, current) as usize;
        }

        self.next.write(environment, current, self.width as i64);
        self.size.add(environment, -removed);
        let new_upper_bound = self.value_at(current);
        self.upper_bound
            .write(environment, new_upper_bound.into());
        Ok(Some(new_upper_bound))
    }

    pub(crate) fn remove(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(environment, value) {
            return Ok(false);
        }
        if self.size(environment) == 1 {
            return Err(EmptyDomain);
        }

        let index = self.index(value);
        let previous = self.previous.read(environment, index);
        let next = self.next.read(environment, index);
        if previous != NONE_BEFORE {
            self.next.write(environment, previous as usize, next);
        }
        if next != self.width as i64 {
            self.previous.write(environment, next as usize, previous);
        }
        self.present.remove(environment, index);
        delta.push(value);
        self.size.add(environment, -1);

        if previous == NONE_BEFORE {
            self.lower_bound
                .write(environment, next + self.offset);
        }
        if next == self.width as i64 {
            self.upper_bound
                .write(environment, previous + self.offset);
        }

        Ok(true)
    }

    pub(crate) fn restrict(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(environment, value) {
            return Err(EmptyDomain);
        }
        if self.size(environment) == 1 {
            return Ok(false);
        }

        let kept = self.index(value);
        let mut current = self.index(self.lower_bound(environment));
        while current < self.width {
            let next = self.next.read(environment, current) as usize;
            if current != kept {
                self.present.remove(environment, current);
                delta.push(self.value_at(current));
            }
            current = next;
        }

        self.next.write(environment, kept, self.width as i64);
        self.previous.write(environment, kept, NONE_BEFORE);
        self.lower_bound.write(environment, value.into());
        self.upper_bound.write(environment, value.into());
        self.size.write(environment, 1);
        Ok(true)
    }

    pub(crate) fn random_value(&self, environment: &Environment, random: &mut dyn Random) -> i32 {
        let steps = random.select_position(self.size(environment));
        let mut current = self.index(self.lower_bound(environment));
        for _ in 0..steps {
            current = self.next.read(environment, current) as usize;
        }
        self.value_at(current)
    }
}
