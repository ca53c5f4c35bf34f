use super::Environment;

/// Handle to a backtrackable integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoredInt {
    pub(super) index: usize,
}

impl StoredInt {
    pub fn read(self, environment: &Environment) -> i64 {
        environment.read_int(self.index)
    }

    pub fn write(self, environment: &mut Environment, value: i64) {
        environment.write_int(self.index, value)
    }

    /// Set the value in the current world and in all worlds below it; unlike
    /// [`StoredInt::write`] the change is never undone.
    pub fn overwrite(self, environment: &mut Environment, value: i64) {
        environment.overwrite_int(self.index, value)
    }

    pub fn add(self, environment: &mut Environment, delta: i64) {
        let value = self.read(environment);
        self.write(environment, value + delta)
    }
}
