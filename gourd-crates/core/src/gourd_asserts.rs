//! Leveled assertions. Cheap checks are always on; the more expensive consistency checks of the
//! domains and queues are only compiled in with the `debug-checks` feature.

#[cfg(not(feature = "debug-checks"))]
pub(crate) const GOURD_ASSERT_LEVEL_DEFINITION: u8 = GOURD_ASSERT_SIMPLE;
#[cfg(feature = "debug-checks")]
pub(crate) const GOURD_ASSERT_LEVEL_DEFINITION: u8 = GOURD_ASSERT_EXTREME;

pub(crate) const GOURD_ASSERT_SIMPLE: u8 = 1;
pub(crate) const GOURD_ASSERT_MODERATE: u8 = 2;
pub(crate) const GOURD_ASSERT_ADVANCED: u8 = 3;
pub(crate) const GOURD_ASSERT_EXTREME: u8 = 4;

macro_rules! gourd_assert_simple {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! gourd_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! gourd_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! gourd_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

macro_rules! gourd_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::gourd_asserts::GOURD_ASSERT_LEVEL_DEFINITION >= $crate::gourd_asserts::GOURD_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}

pub(crate) use gourd_assert_advanced;
pub(crate) use gourd_assert_eq_simple;
pub(crate) use gourd_assert_extreme;
pub(crate) use gourd_assert_moderate;
pub(crate) use gourd_assert_simple;
