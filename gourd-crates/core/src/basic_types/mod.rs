mod contradiction;
mod model_error;
mod propagation_status;
mod random;
mod solution;
mod trail;

pub use contradiction::Contradiction;
pub use model_error::ModelError;
pub use propagation_status::*;
pub use random::Random;
pub use solution::Solution;
pub(crate) use trail::Trail;
