use thiserror::Error;

use crate::engine::variables::DomainId;
use crate::propagation::PropagatorId;

/// The outcome of a failed propagation. It identifies what failed so search can react to it; the
/// engine has already flushed its queues when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Contradiction {
    #[error("the domain of {domain} would become empty")]
    EmptyDomain {
        domain: DomainId,
        /// `None` when the domain operation came from outside any propagator, e.g. a decision.
        propagator: Option<PropagatorId>,
    },
    #[error("{propagator} detected a conflict: {reason}")]
    Propagator {
        propagator: PropagatorId,
        reason: &'static str,
    },
}

impl Contradiction {
    pub fn variable(&self) -> Option<DomainId> {
        match self {
            Contradiction::EmptyDomain { domain, .. } => Some(*domain),
            Contradiction::Propagator { .. } => None,
        }
    }

    pub fn propagator(&self) -> Option<PropagatorId> {
        match self {
            Contradiction::EmptyDomain { propagator, .. } => *propagator,
            Contradiction::Propagator { propagator, .. } => Some(*propagator),
        }
    }
}
