use std::{fmt, str::FromStr, time::Duration};

/// The minimum gap enforced between two successive releases of a
/// [`PriorityReleaseQueue`].
///
/// # Default [`ReleaseInterval`]
///
/// ```
/// # use qos_core::ReleaseInterval;
/// assert_eq!(
///     ReleaseInterval::default().to_string(),
///     "500ms"
/// )
/// ```
///
/// # strict comparison
///
/// A release only happens once *strictly more* than the interval has
/// elapsed since the previous release. With a `500ms` interval, a
/// release at `t = 0` allows the next one at `t = 501ms` but not at
/// `t = 500ms`. See [`ReleaseInterval::has_elapsed`].
///
/// [`PriorityReleaseQueue`]: crate::queue::PriorityReleaseQueue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseInterval(u64);

impl ReleaseInterval {
    /// The `0` interval: the queue may release on every poll that
    /// happens strictly after the previous release.
    pub const ZERO: Self = Self::new(Duration::ZERO);

    /// create a new release interval with the given [`Duration`].
    ///
    /// # truncation
    ///
    /// The interval is precise up to the micro seconds. Nano seconds
    /// are truncated and durations longer than `u64::MAX` micro seconds
    /// saturate.
    ///
    /// ```
    /// # use qos_core::ReleaseInterval;
    /// # use std::time::Duration;
    /// let interval = ReleaseInterval::new(Duration::from_nanos(987_654_321));
    /// assert_eq!(
    ///     interval.into_duration(),
    ///     Duration::from_micros(987_654),
    /// );
    /// ```
    #[inline(always)]
    pub const fn new(duration: Duration) -> Self {
        Self(crate::time::saturating_micros(duration))
    }

    #[inline(always)]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    /// get the inner duration
    #[inline(always)]
    pub fn into_duration(self) -> Duration {
        Duration::from_micros(self.0)
    }

    /// `true` if `elapsed` is strictly greater than the interval.
    ///
    /// ```
    /// # use qos_core::ReleaseInterval;
    /// # use std::time::Duration;
    /// let interval = ReleaseInterval::from_millis(500);
    /// assert!(!interval.has_elapsed(Duration::from_millis(500)));
    /// assert!(interval.has_elapsed(Duration::from_millis(501)));
    /// ```
    #[inline(always)]
    pub fn has_elapsed(self, elapsed: Duration) -> bool {
        elapsed > self.into_duration()
    }
}

impl From<ReleaseInterval> for Duration {
    fn from(value: ReleaseInterval) -> Self {
        value.into_duration()
    }
}
impl From<Duration> for ReleaseInterval {
    fn from(value: Duration) -> Self {
        Self::new(value)
    }
}

impl Default for ReleaseInterval {
    fn default() -> Self {
        crate::defaults::DEFAULT_RELEASE_INTERVAL
    }
}

impl fmt::Display for ReleaseInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dur = crate::time::Duration::new(self.into_duration());
        fmt::Display::fmt(&dur, f)
    }
}

impl FromStr for ReleaseInterval {
    type Err = crate::time::DurationParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let duration = crate::time::Duration::from_str(s)?;

        Ok(Self::new(duration.into_duration()))
    }
}
