use crate::containers::StorageKey;

/// Identifies a propagator instance within a [`State`](crate::State). Identifiers are assigned in
/// the order the propagators are added.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PropagatorId(pub(crate) u32);

/// The position of a variable in the scope of a propagator. It is chosen by the propagator when it
/// registers the variable and handed back with every event of that variable.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn from(position: u32) -> LocalId {
        LocalId(position)
    }

    pub fn unpack(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PropagatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PropagatorId({})", self.0)
    }
}

impl std::fmt::Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

macro_rules! impl_storage_key {
    ($id:ident) => {
        impl StorageKey for $id {
            fn index(&self) -> usize {
                self.0 as usize
            }

            fn create_from_index(index: usize) -> Self {
                $id(index as u32)
            }
        }
    };
}

impl_storage_key!(PropagatorId);
impl_storage_key!(LocalId);
