//! Traffic control observability types.
//!
//! Obtain a snapshot via [`TrafficControl::stats`](crate::TrafficControl::stats).

use crate::TrafficClass;
use qos_core::{QueueStats, SimTime};
use std::{collections::BTreeMap, time::Duration};

/// Statistics for a single [`TrafficClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassStats {
    /// Number of packets generated.
    pub generated: u64,
    /// Number of packets let out of the queue.
    pub released: u64,
    /// Number of packets currently waiting in the queue.
    pub waiting: u64,
    /// Sum of the time released packets spent in the queue.
    pub total_delay: Duration,
    /// Longest time a released packet spent in the queue.
    pub max_delay: Duration,
}

/// Point-in-time snapshot of a [`TrafficControl`] simulation.
///
/// [`TrafficControl`]: crate::TrafficControl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimStats {
    /// Current simulation time.
    pub now: SimTime,
    /// Number of frames executed.
    pub frames: u64,
    /// Per-class statistics.
    pub classes: BTreeMap<TrafficClass, ClassStats>,
    /// Statistics of the shaping queue.
    pub queue: QueueStats,
}

impl ClassStats {
    pub(crate) fn record_release(&mut self, delay: Duration) {
        self.released += 1;
        self.total_delay += delay;
        self.max_delay = self.max_delay.max(delay);
    }

    /// Average time a released packet spent in the queue, `None` if no
    /// packet of the class was released yet.
    ///
    /// ```
    /// # use qos_sim::stats::ClassStats;
    /// # use std::time::Duration;
    /// let stats = ClassStats {
    ///     released: 4,
    ///     total_delay: Duration::from_millis(2_000),
    ///     ..ClassStats::default()
    /// };
    /// assert_eq!(stats.mean_delay(), Some(Duration::from_millis(500)));
    /// assert_eq!(ClassStats::default().mean_delay(), None);
    /// ```
    pub fn mean_delay(&self) -> Option<Duration> {
        if self.released == 0 {
            return None;
        }
        let micros = self.total_delay.as_micros() / u128::from(self.released);
        Some(Duration::from_micros(micros as u64))
    }
}

impl SimStats {
    /// the statistics of the given class, zeroed if the class was never
    /// seen
    pub fn class(&self, class: TrafficClass) -> ClassStats {
        self.classes.get(&class).copied().unwrap_or_default()
    }
}
