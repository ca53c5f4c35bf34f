use std::fmt::Display;

/// A checkpoint in the world stack of an [`Environment`](super::Environment).
///
/// Obtained from [`Environment::world_push`](super::Environment::world_push), which returns the
/// world that is being left; passing the token to
/// [`Environment::restore_to`](super::Environment::restore_to) brings every cell back to the values
/// it had at that moment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct World {
    pub(crate) depth: usize,
}

impl World {
    pub const ROOT: World = World { depth: 0 };

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Display for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "world {}", self.depth)
    }
}
