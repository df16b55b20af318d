//! Queue statistics and observability types.
//!
//! [`QueueStats`] provides a point-in-time snapshot of a queue.
//! Obtain one via [`PriorityReleaseQueue::stats`](crate::queue::PriorityReleaseQueue::stats).

use crate::{Priority, SimTime};
use std::collections::BTreeMap;

/// Point-in-time snapshot of a [`PriorityReleaseQueue`].
///
/// [`PriorityReleaseQueue`]: crate::queue::PriorityReleaseQueue
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueStats {
    /// Number of items currently waiting.
    pub depth: usize,
    /// Number of items ever enqueued.
    pub enqueued: u64,
    /// Number of items ever released.
    pub released: u64,
    /// Largest depth observed since the queue was created.
    pub high_water_mark: usize,
    /// Number of waiting items per priority.
    pub depth_by_priority: BTreeMap<Priority, usize>,
    /// Time of the last release, if any.
    pub last_release: Option<SimTime>,
}
