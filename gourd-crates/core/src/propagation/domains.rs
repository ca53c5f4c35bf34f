use crate::engine::domains::DomainValues;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::Assignments;
use crate::environment::Environment;

/// A read-only view on the current domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) environment: &'a Environment,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments, environment: &'a Environment) -> Self {
        Domains {
            assignments,
            environment,
        }
    }
}

impl HasAssignments for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn environment(&self) -> &Environment {
        self.environment
    }
}

/// Gives access to the domains; implemented by everything that can read them.
pub trait HasAssignments {
    fn assignments(&self) -> &Assignments;

    fn environment(&self) -> &Environment;
}

/// Queries on the current domains.
pub trait ReadDomains: HasAssignments {
    fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments().lower_bound(var, self.environment())
    }

    fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments().upper_bound(var, self.environment())
    }

    fn contains(&self, var: DomainId, value: i32) -> bool {
        self.assignments().contains(var, value, self.environment())
    }

    fn size(&self, var: DomainId) -> usize {
        self.assignments().size(var, self.environment())
    }

    fn is_fixed(&self, var: DomainId) -> bool {
        self.assignments().is_fixed(var, self.environment())
    }

    fn fixed_value(&self, var: DomainId) -> Option<i32> {
        self.assignments().fixed_value(var, self.environment())
    }

    /// The smallest value in the domain of `var` which is strictly larger than `value`.
    fn next_value(&self, var: DomainId, value: i32) -> Option<i32> {
        self.assignments().next_value(var, value, self.environment())
    }

    /// The largest value in the domain of `var` which is strictly smaller than `value`.
    fn previous_value(&self, var: DomainId, value: i32) -> Option<i32> {
        self.assignments()
            .previous_value(var, value, self.environment())
    }

    /// The values in the domain of `var`, in increasing order.
    fn iterate_domain(&self, var: DomainId) -> DomainValues<'_> {
        self.assignments().values(var, self.environment())
    }

    /// The depth of the world in which `var` became fixed.
    fn fixed_in_world(&self, var: DomainId) -> Option<usize> {
        self.assignments().fixed_in_world(var, self.environment())
    }

    /// `Some(truth value)` if the variable of the literal is fixed.
    fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.fixed_value(literal.domain())
            .map(|value| literal.is_satisfied_by(value))
    }

    fn is_literal_true(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(true)
    }

    fn is_literal_false(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(false)
    }
}

impl<T: HasAssignments> ReadDomains for T {}
