//! The representations of integer domains.
//!
//! All representations keep their state in cells of the [`Environment`], so every change is undone
//! when the enclosing world is popped. A mutating operation which would wipe out a domain returns
//! [`EmptyDomain`] and leaves the domain untouched. Every removed value is appended to the
//! [`DeltaDomain`] passed to the operation.
mod bipartite_domain;
mod bitset_domain;
mod delta_domain;
mod linked_list_domain;

pub(crate) use bipartite_domain::BipartiteDomain;
pub(crate) use bitset_domain::BitSetDomain;
pub(crate) use delta_domain::DeltaDomain;
pub use delta_domain::DeltaIterator;
pub(crate) use delta_domain::FrozenDelta;
pub(crate) use linked_list_domain::LinkedListDomain;
use thiserror::Error;

use crate::basic_types::Random;
use crate::environment::Environment;

/// Returned by a domain operation which would leave the domain without values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("the domain would become empty")]
pub struct EmptyDomain;

/// The representation used for the domain of a variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DomainKind {
    /// One bit per value of the initial range.
    #[default]
    BitSet,
    /// A doubly-linked list over the present values; constant-time removal.
    LinkedList,
    /// A sparse set; constant-time removal and membership, uniform random selection. Its size does
    /// not depend on the width of the initial range.
    Bipartite,
}

/// The widest initial range accepted by the dense representations, which allocate per value of
/// the range rather than per value of the domain.
pub const MAX_DENSE_WIDTH: usize = 1 << 26;

/// The number of values in `[lower_bound, upper_bound]`.
pub(crate) fn width(lower_bound: i32, upper_bound: i32) -> usize {
    (i64::from(upper_bound) - i64::from(lower_bound) + 1) as usize
}

impl DomainKind {
    /// Pick a representation for `num_values` values spread over a range of `width` values.
    pub fn for_values(num_values: usize, width: usize) -> DomainKind {
        if width > MAX_DENSE_WIDTH || num_values.saturating_mul(4) < width {
            DomainKind::Bipartite
        } else {
            DomainKind::BitSet
        }
    }
}

macro_rules! dispatch {
    ($domain:expr, $inner:ident => $body:expr) => {
        match $domain {
            IntDomain::BitSet($inner) => $body,
            IntDomain::LinkedList($inner) => $body,
            IntDomain::Bipartite($inner) => $body,
        }
    };
}

#[derive(Clone, Debug)]
pub(crate) enum IntDomain {
    BitSet(BitSetDomain),
    LinkedList(LinkedListDomain),
    Bipartite(BipartiteDomain),
}

impl IntDomain {
    /// `values` has to be sorted, free of duplicates and non-empty.
    pub(crate) fn new(environment: &mut Environment, kind: DomainKind, values: &[i32]) -> Self {
        match kind {
            DomainKind::BitSet => IntDomain::BitSet(BitSetDomain::new(environment, values)),
            DomainKind::LinkedList => {
                IntDomain::LinkedList(LinkedListDomain::new(environment, values))
            }
            DomainKind::Bipartite => {
                IntDomain::Bipartite(BipartiteDomain::new(environment, values))
            }
        }
    }

    pub(crate) fn kind(&self) -> DomainKind {
        match self {
            IntDomain::BitSet(_) => DomainKind::BitSet,
            IntDomain::LinkedList(_) => DomainKind::LinkedList,
            IntDomain::Bipartite(_) => DomainKind::Bipartite,
        }
    }

    pub(crate) fn lower_bound(&self, environment: &Environment) -> i32 {
        dispatch!(self, domain => domain.lower_bound(environment))
    }

    pub(crate) fn upper_bound(&self, environment: &Environment) -> i32 {
        dispatch!(self, domain => domain.upper_bound(environment))
    }

    pub(crate) fn size(&self, environment: &Environment) -> usize {
        dispatch!(self, domain => domain.size(environment))
    }

    pub(crate) fn contains(&self, environment: &Environment, value: i32) -> bool {
        dispatch!(self, domain => domain.contains(environment, value))
    }

    /// The smallest present value strictly larger than `value`.
    pub(crate) fn next_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        dispatch!(self, domain => domain.next_value(environment, value))
    }

    /// The largest present value strictly smaller than `value`.
    pub(crate) fn previous_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        dispatch!(self, domain => domain.previous_value(environment, value))
    }

    /// Returns the new lower bound if it changed.
    pub(crate) fn update_lower_bound(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<Option<i32>, EmptyDomain> {
        dispatch!(self, domain => domain.update_lower_bound(environment, value, delta))
    }

    /// Returns the new upper bound if it changed.
    pub(crate) fn update_upper_bound(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<Option<i32>, EmptyDomain> {
        dispatch!(self, domain => domain.update_upper_bound(environment, value, delta))
    }

    pub(crate) fn remove(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<bool, EmptyDomain> {
        dispatch!(self, domain => domain.remove(environment, value, delta))
    }

    pub(crate) fn restrict(
        &mut self,
        environment: &mut Environment,
        value: i32,
        delta: &mut DeltaDomain,
    ) -> Result<bool, EmptyDomain> {
        dispatch!(self, domain => domain.restrict(environment, value, delta))
    }

    pub(crate) fn random_value(&self, environment: &Environment, random: &mut dyn Random) -> i32 {
        dispatch!(self, domain => domain.random_value(environment, random))
    }

    pub(crate) fn values<'a>(&'a self, environment: &'a Environment) -> DomainValues<'a> {
        let inner = match self {
            IntDomain::Bipartite(domain) => {
                let mut values = domain.present_values(environment).collect::<Vec<_>>();
                values.sort_unstable();
                ValuesInner::Buffered(values.into_iter())
            }
            _ => ValuesInner::Ordered {
                domain: self,
                environment,
                next: Some(self.lower_bound(environment)),
            },
        };
        DomainValues { inner }
    }
}

/// The present values of a domain in increasing order.
#[derive(Debug)]
pub struct DomainValues<'a> {
    inner: ValuesInner<'a>,
}

#[derive(Debug)]
enum ValuesInner<'a> {
    Ordered {
        domain: &'a IntDomain,
        environment: &'a Environment,
        next: Option<i32>,
    },
    Buffered(std::vec::IntoIter<i32>),
}

impl Iterator for DomainValues<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ValuesInner::Ordered {
                domain,
                environment,
                next,
            } => {
                let current = (*next)?;
                *next = domain.next_value(environment, current);
                Some(current)
            }
            ValuesInner::Buffered(values) => values.next(),
        }
    }
}
