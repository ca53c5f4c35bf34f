use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`LessOrEqualPropagator`].
#[derive(Clone, Debug)]
pub struct LessOrEqualPropagatorArgs {
    pub a: DomainId,
    pub b: DomainId,
    pub offset: i32,
}

impl PropagatorConstructor for LessOrEqualPropagatorArgs {
    type PropagatorImpl = LessOrEqualPropagator;

    fn create(
        self,
        mut context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError> {
        let LessOrEqualPropagatorArgs { a, b, offset } = self;

        context.register(a, DomainEvents::LOWER_BOUND, LocalId::from(0));
        context.register(b, DomainEvents::UPPER_BOUND, LocalId::from(1));

        Ok(LessOrEqualPropagator { a, b, offset })
    }
}

/// Bounds propagator for the constraint `a + offset <= b`.
#[derive(Clone, Debug)]
pub struct LessOrEqualPropagator {
    a: DomainId,
    b: DomainId,
    offset: i32,
}

impl LessOrEqualPropagator {
    fn propagate_lower_bound_of_b(&self, context: &mut PropagationContext) -> PropagationStatus {
        let bound = context.lower_bound(self.a) + self.offset;
        let _ = context.update_lower_bound(self.b, bound)?;
        Ok(())
    }

    fn propagate_upper_bound_of_a(&self, context: &mut PropagationContext) -> PropagationStatus {
        let bound = context.upper_bound(self.b) - self.offset;
        let _ = context.update_upper_bound(self.a, bound)?;
        Ok(())
    }
}

impl Propagator for LessOrEqualPropagator {
    fn name(&self) -> &str {
        "LessOrEqual"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.propagate_lower_bound_of_b(&mut context)?;
        self.propagate_upper_bound_of_a(&mut context)
    }

    fn awake_on_inf(&mut self, mut context: PropagationContext, _: LocalId) -> PropagationStatus {
        self.propagate_lower_bound_of_b(&mut context)
    }

    fn awake_on_sup(&mut self, mut context: PropagationContext, _: LocalId) -> PropagationStatus {
        self.propagate_upper_bound_of_a(&mut context)
    }

    fn is_satisfied(&self, tuple: &[i32]) -> bool {
        tuple[0] + self.offset <= tuple[1]
    }

    fn is_entailed(&self, domains: Domains) -> Option<bool> {
        if domains.upper_bound(self.a) + self.offset <= domains.lower_bound(self.b) {
            Some(true)
        } else if domains.lower_bound(self.a) + self.offset > domains.upper_bound(self.b) {
            Some(false)
        } else {
            None
        }
    }
}
