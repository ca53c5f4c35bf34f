use std::fmt::Debug;

use rand::Rng;
use rand::SeedableRng;

use crate::gourd_asserts::gourd_assert_simple;

/// The source of randomness of the engine; domains use it to draw one of their present values.
///
/// Any seedable generator of `rand` can be used. Tests use a generator which replays fixed
/// positions.
pub trait Random: Debug {
    /// Selects a position in `[0, num_values)`, uniformly.
    fn select_position(&mut self, num_values: usize) -> usize;
}

impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn select_position(&mut self, num_values: usize) -> usize {
        gourd_assert_simple!(num_values > 0, "a domain always has a value to draw");
        self.gen_range(0..num_values)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Random;

    /// Replays the given positions in order.
    #[derive(Debug, Default)]
    pub(crate) struct TestRandom {
        pub(crate) positions: Vec<usize>,
    }

    impl Random for TestRandom {
        fn select_position(&mut self, num_values: usize) -> usize {
            let position = self.positions.remove(0);
            assert!(
                position < num_values,
                "position {position} is out of range for {num_values} values"
            );
            position
        }
    }
}
