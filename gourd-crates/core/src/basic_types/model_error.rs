use thiserror::Error;

use crate::engine::domains::DomainKind;
use crate::engine::variables::DomainId;

/// Errors that come from a malformed model, reported when a constraint is added rather than during
/// propagation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{what} has length {actual} but {expected} was expected")]
    MismatchedLengths {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("the relation is malformed: {0}")]
    MalformedRelation(String),
    #[error("the domain [{lower_bound}, {upper_bound}] is empty")]
    InvalidDomain { lower_bound: i32, upper_bound: i32 },
    #[error("the domain [{lower_bound}, {upper_bound}] is too wide for {kind:?}")]
    DomainTooWide {
        lower_bound: i32,
        upper_bound: i32,
        kind: DomainKind,
    },
    #[error("{variable} occurs more than once in the {what}")]
    RepeatedVariable {
        what: &'static str,
        variable: DomainId,
    },
    #[error("{0} is not a 0/1 variable")]
    NonBooleanVariable(DomainId),
    #[error("{what} of {variable} may be negative")]
    NegativeValue {
        what: &'static str,
        variable: DomainId,
    },
}
