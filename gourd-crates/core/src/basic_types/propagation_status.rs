use crate::engine::variables::DomainId;

/// The result of invoking a propagator: either it succeeds, or it found an inconsistency.
pub type PropagationStatus = Result<(), Inconsistency>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// A domain operation would have emptied the domain of the given variable. The domain itself
    /// was left untouched.
    EmptyDomain(EmptyDomainConflict),
    /// The propagator detected that its constraint cannot be satisfied any more.
    Conflict(PropagatorConflict),
}

impl From<EmptyDomainConflict> for Inconsistency {
    fn from(conflict: EmptyDomainConflict) -> Self {
        Inconsistency::EmptyDomain(conflict)
    }
}

impl From<PropagatorConflict> for Inconsistency {
    fn from(conflict: PropagatorConflict) -> Self {
        Inconsistency::Conflict(conflict)
    }
}

/// A domain operation of a propagator which would wipe out the domain of `domain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDomainConflict {
    pub domain: DomainId,
}

/// A conflict stated by a propagator which is _not_ an empty domain, e.g. an overloaded resource or
/// a falsified clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagatorConflict {
    pub reason: &'static str,
}

impl PropagatorConflict {
    pub fn new(reason: &'static str) -> Self {
        PropagatorConflict { reason }
    }
}
