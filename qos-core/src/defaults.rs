use crate::{ReleaseInterval, queue::QueueMode};

/// Default [`ReleaseInterval`]
///
/// One item is let through the queue every half second.
///
/// ```
/// # use qos_core::defaults::*;
/// assert_eq!(
///     DEFAULT_RELEASE_INTERVAL.to_string(),
///     "500ms"
/// );
/// ```
pub const DEFAULT_RELEASE_INTERVAL: ReleaseInterval = ReleaseInterval::from_millis(500);

/// Default [`QueueMode`]
///
/// Traffic is ordered by priority unless told otherwise.
///
/// ```
/// # use qos_core::{defaults::*, queue::QueueMode};
/// assert_eq!(DEFAULT_QUEUE_MODE, QueueMode::Priority);
/// ```
pub const DEFAULT_QUEUE_MODE: QueueMode = QueueMode::Priority;

/// Default depth warning threshold
///
/// The queue is unbounded and, by default, never complains about it.
/// See [`QueueBuilder::set_depth_warning`].
///
/// [`QueueBuilder::set_depth_warning`]: crate::queue::QueueBuilder::set_depth_warning
pub const DEFAULT_DEPTH_WARNING: Option<usize> = None;
