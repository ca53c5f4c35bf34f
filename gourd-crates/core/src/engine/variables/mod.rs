//! Identifiers of the decision variables. A variable is nothing more than a handle to a domain
//! stored in the assignments of a [`State`](crate::engine::State).
mod domain_id;
mod literal;

pub use domain_id::DomainId;
pub use literal::Literal;
