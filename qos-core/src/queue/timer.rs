use crate::{ReleaseInterval, SimTime};

/// keeps track of when the queue last released an item
///
/// The timer only moves forward: a `now` earlier than the last release
/// is seen as no time having elapsed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReleaseTimer {
    interval: ReleaseInterval,
    last_release: Option<SimTime>,
}

impl ReleaseTimer {
    pub(crate) fn new(interval: ReleaseInterval) -> Self {
        Self {
            interval,
            last_release: None,
        }
    }

    pub(crate) fn interval(&self) -> ReleaseInterval {
        self.interval
    }

    pub(crate) fn last_release(&self) -> Option<SimTime> {
        self.last_release
    }

    /// before the first release the reference point is the origin
    /// of the simulation clock
    pub(crate) fn is_due(&self, now: SimTime) -> bool {
        let since = self.last_release.unwrap_or(SimTime::ZERO);
        self.interval.has_elapsed(now.saturating_duration_since(since))
    }

    pub(crate) fn mark(&mut self, now: SimTime) {
        self.last_release = Some(self.last_release.map_or(now, |last| last.max(now)));
    }
}
