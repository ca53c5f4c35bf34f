use super::DeltaDomain;
use super::EmptyDomain;
use crate::basic_types::Random;
use crate::containers::HashMap;
use crate::environment::Environment;
use crate::environment::StoredInt;

/// A sparse-set domain: the present values are `values[0..size]`. Removing a value swaps it to
/// position `size - 1` and shrinks `size`, so only `size` (and the bounds) need to be stored.
///
/// The permutation in `values` is deliberately not trailed: removals only permute the prefix of
/// present values, so restoring `size` restores the set.
#[derive(Clone, Debug)]
pub(crate) struct BipartiteDomain {
    values: Vec<i32>,
    /// Position in `values` of every initial value. Keyed by value so the domain does not grow
    /// with the width of its range.
    indices: HashMap<i32, usize>,
    size: StoredInt,
    lower_bound: StoredInt,
    upper_bound: StoredInt,
}

impl BipartiteDomain {
    /// `values` has to be sorted, free of duplicates and non-empty.
    pub(crate) fn new(environment: &mut Environment, values: &[i32]) -> BipartiteDomain {
        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let indices = values
            .iter()
            .enumerate()
            .map(|(position, &value)| (value, position))
            .collect();

        BipartiteDomain {
            values: values.to_vec(),
            indices,
            size: environment.make_int(values.len() as i64),
            lower_bound: environment.make_int(lower_bound.into()),
            upper_bound: environment.make_int(upper_bound.into()),
        }
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
        self.indices
            .get(&value)
            .is_some_and(|&position| position < self.size(environment))
    }

    pub(crate) fn present_values<'a>(
        &'a self,
        environment: &Environment,
    ) -> impl Iterator<Item = i32> + 'a {
        self.values[..self.size(environment)].iter().copied()
    }

    pub(crate) fn next_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        self.present_values(environment)
            .filter(|&present| present > value)
            .min()
    }

    pub(crate) fn previous_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        self.present_values(environment)
            .filter(|&present| present < value)
            .max()
    }

    /// Swap the value at `position` to the end of the present prefix and shrink the prefix.
    fn swap_out(&mut self, position: usize, size: usize) {
        let last = size - 1;
        let moved = self.values[last];
        let removed = self.values[position];
        self.values.swap(position, last);
        let _ = self.indices.insert(moved, position);
        let _ = self.indices.insert(removed, last);
    }

    fn remove_all_where(
        &mut self,
        environment: &mut Environment,
        delta: &mut DeltaDomain,
        should_remove: impl Fn(i32) -> bool,
    ) {
        let mut size = self.size(environment);
        let mut position = 0;
        while position < size {
            let value = self.values[position];
            if should_remove(value) {
                self.swap_out(position, size);
                size -= 1;
                delta.push(value);
            } else {
                position += 1;
            }
        }
        self.size.write(environment, size as i64);
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

        self.remove_all_where(environment, delta, |present| present < value);
        let new_lower_bound = self
            .present_values(environment)
            .min()
            .ok_or(EmptyDomain)?;
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

        self.remove_all_where(environment, delta, |present| present > value);
        let new_upper_bound = self
            .present_values(environment)
            .max()
            .ok_or(EmptyDomain)?;
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
        let size = self.size(environment);
        if size == 1 {
            return Err(EmptyDomain);
        }

        self.swap_out(self.indices[&value], size);
        self.size.write(environment, (size - 1) as i64);
        delta.push(value);

        if value == self.lower_bound(environment) {
            let new_lower_bound = self
                .present_values(environment)
                .min()
                .ok_or(EmptyDomain)?;
            self.lower_bound
                .write(environment, new_lower_bound.into());
        }
        if value == self.upper_bound(environment) {
            let new_upper_bound = self
                .present_values(environment)
                .max()
                .ok_or(EmptyDomain)?;
            self.upper_bound
                .write(environment, new_upper_bound.into());
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
        let size = self.size(environment);
        if size == 1 {
            return Ok(false);
        }

        // Move the kept value to the front; everything after it is removed.
        let position = self.indices[&value];
        let first = self.values[0];
        self.values.swap(0, position);
        let _ = self.indices.insert(first, position);
        let _ = self.indices.insert(value, 0);
        for &removed in &self.values[1..size] {
            delta.push(removed);
        }

        self.size.write(environment, 1);
        self.lower_bound.write(environment, value.into());
        self.upper_bound.write(environment, value.into());
        Ok(true)
    }

    pub(crate) fn random_value(&self, environment: &Environment, random: &mut dyn Random) -> i32 {
        self.values[random.select_position(self.size(environment))]
    }
}
