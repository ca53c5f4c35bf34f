mod binary_not_equals;
mod less_or_equal;

pub use binary_not_equals::*;
pub use less_or_equal::*;
