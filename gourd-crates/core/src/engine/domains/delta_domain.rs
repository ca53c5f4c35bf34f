/// The values removed from a domain which have not yet been propagated.
///
/// The engine freezes the delta before handing it to the propagators watching the variable. The
/// frozen chain is then iterated while new removals go into a fresh pending chain, so no value is
/// lost or seen twice when propagators prune the same variable during the iteration.
#[derive(Clone, Debug, Default)]
pub(crate) struct DeltaDomain {
    pending: Vec<i32>,
}

impl DeltaDomain {
    pub(crate) fn push(&mut self, value: i32) {
        self.pending.push(value);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the pending removals into a frozen chain.
    pub(crate) fn freeze(&mut self) -> FrozenDelta {
        FrozenDelta {
            values: std::mem::take(&mut self.pending),
        }
    }

    /// Hand back a frozen chain once it has been propagated. Returns whether values were removed
    /// while it was frozen; those still have to be propagated.
    pub(crate) fn release(&mut self, frozen: FrozenDelta) -> bool {
        if self.pending.is_empty() {
            // Recycle the allocation.
            let mut buffer = frozen.values;
            buffer.clear();
            self.pending = buffer;
            false
        } else {
            true
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}

/// A snapshot of removed values which is being propagated.
#[derive(Debug, Default)]
pub(crate) struct FrozenDelta {
    values: Vec<i32>,
}

impl FrozenDelta {
    pub(crate) fn iter(&self) -> DeltaIterator<'_> {
        DeltaIterator {
            values: self.values.iter(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Iterates the values removed from a domain since the previous time its delta was propagated.
#[derive(Clone, Debug)]
pub struct DeltaIterator<'a> {
    values: std::slice::Iter<'a, i32>,
}

impl DeltaIterator<'_> {
    pub(crate) fn empty() -> Self {
        DeltaIterator { values: [].iter() }
    }
}

impl Iterator for DeltaIterator<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl ExactSizeIterator for DeltaIterator<'_> {}
