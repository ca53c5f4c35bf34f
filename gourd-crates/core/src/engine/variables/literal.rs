use std::fmt::Display;
use std::ops::Not;

use super::DomainId;

/// A (possibly negated) 0/1 variable. The positive literal is true when the variable takes the
/// value 1, the negative literal when it takes the value 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    domain: DomainId,
    positive: bool,
}

impl Literal {
    /// Creates the positive literal of `domain`, which should have a domain within {0, 1}.
    pub fn new(domain: DomainId) -> Literal {
        Literal {
            domain,
            positive: true,
        }
    }

    pub fn domain(&self) -> DomainId {
        self.domain
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// The value the variable takes when this literal is true.
    pub fn true_value(&self) -> i32 {
        i32::from(self.positive)
    }

    pub fn is_satisfied_by(&self, value: i32) -> bool {
        value == self.true_value()
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            domain: self.domain,
            positive: !self.positive,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.positive {
            write!(f, "{}", self.domain)
        } else {
            write!(f, "~{}", self.domain)
        }
    }
}
