use super::Environment;

/// Handle to a fixed-length vector of backtrackable integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoredIntVector {
    pub(super) start: usize,
    pub(super) len: usize,
}

impl StoredIntVector {
    pub fn len(self) -> usize {
        self.len
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    pub fn read(self, environment: &Environment, index: usize) -> i64 {
        assert!(index < self.len, "index {index} out of bounds");
        environment.read_int(self.start + index)
    }

    pub fn write(self, environment: &mut Environment, index: usize, value: i64) {
        assert!(index < self.len, "index {index} out of bounds");
        environment.write_int(self.start + index, value)
    }
}
