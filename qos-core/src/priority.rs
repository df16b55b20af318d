use std::{fmt, num::ParseIntError, str::FromStr};
use thiserror::Error;

/// The urgency of an item in the [`PriorityReleaseQueue`].
///
/// Higher is more urgent. The value is assigned by the caller; the
/// queue only ever compares priorities with one another.
///
/// ```
/// # use qos_core::Priority;
/// let voice = Priority::new(3);
/// let bulk = Priority::new(1);
/// assert!(voice > bulk);
/// ```
///
/// [`PriorityReleaseQueue`]: crate::queue::PriorityReleaseQueue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(i64);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid priority `{input}': {source}")]
pub struct ParsePriorityError {
    input: String,
    source: ParseIntError,
}

impl Priority {
    pub const ZERO: Self = Self(0);

    #[inline(always)]
    pub const fn new(priority: i64) -> Self {
        Self(priority)
    }

    #[inline(always)]
    pub const fn into_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self::new(value.into())
    }
}

impl From<Priority> for i64 {
    fn from(value: Priority) -> Self {
        value.into_i64()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|source| ParsePriorityError {
                input: s.to_owned(),
                source,
            })
    }
}
