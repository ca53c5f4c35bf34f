use super::DeltaDomain;
use super::EmptyDomain;
use crate::basic_types::Random;
use crate::environment::Environment;
use crate::environment::StoredBitSet;
use crate::environment::StoredInt;

/// A domain stored as one bit per value of its initial range. Bounds and size are kept in stored
/// integers so they can be read in constant time.
#[derive(Clone, Debug)]
pub(crate) struct BitSetDomain {
    offset: i64,
    values: StoredBitSet,
    lower_bound: StoredInt,
    upper_bound: StoredInt,
    size: StoredInt,
}

impl BitSetDomain {
    /// `values` has to be sorted, free of duplicates and non-empty.
    pub(crate) fn new(environment: &mut Environment, values: &[i32]) -> BitSetDomain {
        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let offset = i64::from(lower_bound);
        let bits = environment.make_bitset_with(
            super::width(lower_bound, upper_bound),
            values
                .iter()
                .map(|&value| (i64::from(value) - offset) as usize),
        );

        BitSetDomain {
            offset,
            values: bits,
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
            && self.values.contains(environment, self.index(value))
    }

    pub(crate) fn next_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        if value < self.lower_bound(environment) {
            return Some(self.lower_bound(environment));
        }
        if value >= self.upper_bound(environment) {
            return None;
        }

        self.values
            .next_set_bit(environment, self.index(value + 1))
            .map(|bit| self.value_at(bit))
    }

    pub(crate) fn previous_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        if value > self.upper_bound(environment) {
            return Some(self.upper_bound(environment));
        }
        if value <= self.lower_bound(environment) {
            return None;
        }

        self.values
            .previous_set_bit(environment, self.index(value - 1))
            .map(|bit| self.value_at(bit))
    }

    pub(crate) fn update_lower_bound(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<Option<i32>, EmptyDomain> {
        let lower_bound = self.lower_bound(environment);
        if value <= lower_bound {
            return Ok(None);
        }
        if value > self.upper_bound(environment) {
            return Err(EmptyDomain);
        }

        let new_lower_bound = self.next_value(environment, value - 1).ok_or(EmptyDomain)?;
        let mut removed = 0;
        let mut current = Some(lower_bound);
        while let Some(to_remove) = current.filter(|&v| v < new_lower_bound) {
            self.values
                .remove(environment, self.index(to_remove));
            delta.push(to_remove);
            removed += 1;
            current = self.next_value(environment, to_remove);
        }

        self.size.add(environment, -removed);
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
        let upper_bound = self.upper_bound(environment);
        if value >= upper_bound {
            return Ok(None);
        }
        if value < self.lower_bound(environment) {
            return Err(EmptyDomain);
        }

        let new_upper_bound = self
            .previous_value(environment, value + 1)
            .ok_or(EmptyDomain)?;
        let mut removed = 0;
        let mut current = Some(upper_bound);
        while let Some(to_remove) = current.filter(|&v| v > new_upper_bound) {
            self.values
                .remove(environment, self.index(to_remove));
            delta.push(to_remove);
            removed += 1;
            current = self.previous_value(environment, to_remove);
        }

        self.size.add(environment, -removed);
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

        // The neighbours are determined before the bit disappears, while the bounds still hold.
        let next = self.next_value(environment, value);
        let previous = self.previous_value(environment, value);

        self.values
            .remove(environment, self.index(value));
        delta.push(value);
        self.size.add(environment, -1);

        if value == self.lower_bound(environment) {
            let next = next.ok_or(EmptyDomain)?;
            self.lower_bound.write(environment, next.into());
        }
        if value == self.upper_bound(environment) {
            let previous = previous.ok_or(EmptyDomain)?;
            self.upper_bound.write(environment, previous.into());
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

        let mut current = Some(self.lower_bound(environment));
        while let Some(to_remove) = current {
            current = self.next_value(environment, to_remove);
            if to_remove != value {
                self.values
                    .remove(environment, self.index(to_remove));
                delta.push(to_remove);
            }
        }

        self.lower_bound.write(environment, value.into());
        self.upper_bound.write(environment, value.into());
        self.size.write(environment, 1);
        Ok(true)
    }

    pub(crate) fn random_value(&self, environment: &Environment, random: &mut dyn Random) -> i32 {
        let index = random.select_position(self.size(environment));
        self.values
            .ones(environment)
            .nth(index)
            .map(|bit| self.value_at(bit))
            .unwrap_or_else(|| self.lower_bound(environment))
    }
}
