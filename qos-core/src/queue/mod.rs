mod item;
mod mode;
mod timer;

use crate::{
    Priority, ReleaseInterval, SimTime,
    defaults::{DEFAULT_DEPTH_WARNING, DEFAULT_QUEUE_MODE, DEFAULT_RELEASE_INTERVAL},
    stats::QueueStats,
};
use std::{
    collections::{BTreeMap, VecDeque, vec_deque},
    marker::PhantomData,
};
use tracing::{trace, warn};

pub use self::{
    item::{InsertionIndex, Item},
    mode::{ParseQueueModeError, QueueMode},
};
use self::timer::ReleaseTimer;

/// Construction parameters of a [`PriorityReleaseQueue`].
///
/// ```
/// # use qos_core::{queue::{QueueConfig, QueueMode}, ReleaseInterval};
/// let config = QueueConfig::default();
/// assert_eq!(config.mode, QueueMode::Priority);
/// assert_eq!(config.release_interval, ReleaseInterval::from_millis(500));
/// assert_eq!(config.depth_warning, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueConfig {
    pub release_interval: ReleaseInterval,
    pub mode: QueueMode,
    pub depth_warning: Option<usize>,
}

/// Builder for configuring a new [`PriorityReleaseQueue`].
///
/// Obtained via [`PriorityReleaseQueue::builder`].
///
/// ## Defaults
///
/// | Setting | Default |
/// |---------|---------|
/// | Mode | [`QueueMode::Priority`] |
/// | Release interval | `500ms` |
/// | Depth warning | none |
///
/// ## Example
///
/// ```
/// use qos_core::queue::{PriorityReleaseQueue, QueueMode};
///
/// let queue: PriorityReleaseQueue<&str> = PriorityReleaseQueue::builder()
///     .set_mode(QueueMode::Fifo)
///     .set_release_interval("250ms".parse().unwrap())
///     .set_depth_warning(64)
///     .build();
///
/// assert_eq!(queue.mode(), QueueMode::Fifo);
/// ```
#[derive(Debug)]
pub struct QueueBuilder<T> {
    config: QueueConfig,
    _item: PhantomData<fn() -> T>,
}

/// # Priority-ordered queue with timed release
///
/// Items are kept in release order at all times:
///
/// * in [`QueueMode::Priority`], by descending [`Priority`] and, among
///   equal priorities, by order of arrival;
/// * in [`QueueMode::Fifo`], by order of arrival only.
///
/// The head is let out by [`try_release`] at most once per
/// [`ReleaseInterval`]. The queue is meant to be polled once per tick
/// of the host's simulation clock: most polls release nothing, which is
/// the expected steady state and not an error.
///
/// The queue has no capacity limit; [`enqueue`] always succeeds. A depth
/// warning threshold can be set to surface unbounded growth through the
/// logs (see [`QueueBuilder::set_depth_warning`]).
///
/// ## Example
///
/// ```
/// use qos_core::{queue::PriorityReleaseQueue, SimTime};
///
/// let mut queue = PriorityReleaseQueue::new(Default::default());
/// queue.enqueue("data", 1, SimTime::ZERO);
/// queue.enqueue("voip", 3, SimTime::ZERO);
///
/// // not enough time elapsed since the origin of the clock
/// assert!(queue.try_release(SimTime::from_millis(100)).is_none());
///
/// let item = queue.try_release(SimTime::from_millis(600)).unwrap();
/// assert_eq!(item.into_inner(), "voip");
/// ```
///
/// [`try_release`]: PriorityReleaseQueue::try_release
/// [`enqueue`]: PriorityReleaseQueue::enqueue
#[derive(Debug)]
pub struct PriorityReleaseQueue<T> {
    items: VecDeque<Item<T>>,
    mode: QueueMode,
    timer: ReleaseTimer,

    /// the index given to the next enqueued item
    next_index: InsertionIndex,

    enqueued: u64,
    released: u64,
    high_water_mark: usize,

    depth_warning: Option<usize>,
    /// `false` once the warning has been logged, until the depth goes
    /// back under the threshold
    depth_warning_armed: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            release_interval: DEFAULT_RELEASE_INTERVAL,
            mode: DEFAULT_QUEUE_MODE,
            depth_warning: DEFAULT_DEPTH_WARNING,
        }
    }
}

impl<T> QueueBuilder<T> {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            config,
            _item: PhantomData,
        }
    }

    pub fn set_mode(mut self, mode: QueueMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn set_release_interval(mut self, release_interval: ReleaseInterval) -> Self {
        self.config.release_interval = release_interval;
        self
    }

    /// Log a warning when the queue depth reaches `threshold`.
    ///
    /// The queue remains unbounded, this only reports the growth. The
    /// warning is logged once per crossing: it is re-armed when the
    /// depth falls back under the threshold.
    pub fn set_depth_warning(mut self, threshold: usize) -> Self {
        self.config.depth_warning = Some(threshold);
        self
    }

    pub fn config(&self) -> QueueConfig {
        self.config
    }

    pub fn build(self) -> PriorityReleaseQueue<T> {
        PriorityReleaseQueue::new(self.config)
    }
}

impl<T> Default for QueueBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityReleaseQueue<T> {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            items: VecDeque::new(),
            mode: config.mode,
            timer: ReleaseTimer::new(config.release_interval),
            next_index: InsertionIndex::ZERO,
            enqueued: 0,
            released: 0,
            high_water_mark: 0,
            depth_warning: config.depth_warning,
            depth_warning_armed: true,
        }
    }

    pub fn builder() -> QueueBuilder<T> {
        QueueBuilder::new()
    }

    pub fn mode(&self) -> QueueMode {
        self.mode
    }

    pub fn release_interval(&self) -> ReleaseInterval {
        self.timer.interval()
    }

    /// time of the last successful release, `None` until the first one
    pub fn last_release(&self) -> Option<SimTime> {
        self.timer.last_release()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// the next item to be released
    pub fn head(&self) -> Option<&Item<T>> {
        self.items.front()
    }

    /// the waiting items, in release order (head first)
    pub fn iter(&self) -> vec_deque::Iter<'_, Item<T>> {
        self.items.iter()
    }

    /// position (`0` being the head) of the item enqueued with the
    /// given index, if it is still waiting
    pub fn position_of(&self, index: InsertionIndex) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.insertion_index() == index)
    }

    /// Insert `value` in the queue with the given `priority`.
    ///
    /// In [`QueueMode::Priority`] the item is placed right before the
    /// first waiting item of strictly lower priority (or at the end);
    /// in [`QueueMode::Fifo`] it is always placed at the end.
    ///
    /// Returns the [`InsertionIndex`] given to the item.
    pub fn enqueue(
        &mut self,
        value: T,
        priority: impl Into<Priority>,
        now: SimTime,
    ) -> InsertionIndex {
        let priority = priority.into();
        let index = self.next_index;
        self.next_index = self.next_index.next();

        let item = Item::new(priority, index, now, value);
        let position = match self.mode {
            QueueMode::Priority => self
                .items
                .iter()
                .position(|waiting| priority > waiting.priority())
                .unwrap_or(self.items.len()),
            QueueMode::Fifo => self.items.len(),
        };
        self.items.insert(position, item);

        self.enqueued += 1;
        self.high_water_mark = self.high_water_mark.max(self.items.len());

        trace!(
            %index,
            %priority,
            position,
            depth = self.items.len(),
            "enqueued"
        );

        self.check_depth_warning();

        index
    }

    /// Release the head of the queue if more than the release interval
    /// elapsed since the last release.
    ///
    /// Returns `None` if the queue is empty or if it is too early. In
    /// both cases nothing is modified and the call can be repeated
    /// freely.
    pub fn try_release(&mut self, now: SimTime) -> Option<Item<T>> {
        if self.items.is_empty() || !self.timer.is_due(now) {
            return None;
        }

        let item = self.items.pop_front()?;
        self.timer.mark(now);
        self.released += 1;

        trace!(
            index = %item.insertion_index(),
            priority = %item.priority(),
            waited = %now.saturating_duration_since(item.enqueued_at()).as_millis(),
            depth = self.items.len(),
            "released"
        );

        if let Some(threshold) = self.depth_warning
            && self.items.len() < threshold
        {
            self.depth_warning_armed = true;
        }

        Some(item)
    }

    /// Same as [`try_release`] but the released item, if any, is given
    /// to `sink`.
    ///
    /// Returns `true` if an item was released.
    ///
    /// ```
    /// # use qos_core::{queue::PriorityReleaseQueue, SimTime};
    /// let mut queue = PriorityReleaseQueue::new(Default::default());
    /// queue.enqueue(42u32, 0, SimTime::ZERO);
    ///
    /// let mut sent = Vec::new();
    /// assert!(queue.release_with(SimTime::from_millis(501), |item| sent.push(item.into_inner())));
    /// assert_eq!(sent, vec![42]);
    /// ```
    ///
    /// [`try_release`]: PriorityReleaseQueue::try_release
    pub fn release_with<H>(&mut self, now: SimTime, sink: H) -> bool
    where
        H: FnOnce(Item<T>),
    {
        match self.try_release(now) {
            Some(item) => {
                sink(item);
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> QueueStats {
        let mut depth_by_priority = BTreeMap::new();
        for item in self.items.iter() {
            *depth_by_priority.entry(item.priority()).or_insert(0) += 1;
        }

        QueueStats {
            depth: self.items.len(),
            enqueued: self.enqueued,
            released: self.released,
            high_water_mark: self.high_water_mark,
            depth_by_priority,
            last_release: self.timer.last_release(),
        }
    }

    fn check_depth_warning(&mut self) {
        let Some(threshold) = self.depth_warning else {
            return;
        };

        if self.depth_warning_armed && self.items.len() >= threshold {
            self.depth_warning_armed = false;
            warn!(
                depth = self.items.len(),
                threshold,
                interval = %self.timer.interval(),
                "queue depth reached the warning threshold, items arrive faster than they are released"
            );
        }
    }
}

impl<T> Default for PriorityReleaseQueue<T> {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl<'a, T> IntoIterator for &'a PriorityReleaseQueue<T> {
    type Item = &'a Item<T>;
    type IntoIter = vec_deque::Iter<'a, Item<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
