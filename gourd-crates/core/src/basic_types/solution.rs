use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;

/// A complete assignment of every variable, taken from the state when all domains are fixed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    values: KeyedVec<DomainId, i32>,
}

impl Solution {
    pub(crate) fn new(values: KeyedVec<DomainId, i32>) -> Self {
        Solution { values }
    }

    pub fn num_domains(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, variable: DomainId) -> i32 {
        self.values[variable]
    }

    pub fn literal_value(&self, literal: Literal) -> bool {
        literal.is_satisfied_by(self.value(literal.domain()))
    }
}
