use crate::{Priority, SimTime};
use std::fmt;

/// Position of an item in the order of arrival.
///
/// Every call to [`PriorityReleaseQueue::enqueue`] is given the next
/// index. Indices are unique for the lifetime of a queue and only
/// increase; they break the ties between items of equal [`Priority`].
///
/// [`PriorityReleaseQueue::enqueue`]: crate::queue::PriorityReleaseQueue::enqueue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct InsertionIndex(u64);

/// An entry waiting in the [`PriorityReleaseQueue`].
///
/// The queue only needs the priority and the insertion index to order
/// its entries. Whatever the caller wants to carry through the queue
/// (a packet, a rendering handle...) is the `value`.
///
/// [`PriorityReleaseQueue`]: crate::queue::PriorityReleaseQueue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<T> {
    priority: Priority,
    insertion_index: InsertionIndex,
    enqueued_at: SimTime,
    value: T,
}

impl InsertionIndex {
    pub const ZERO: Self = Self(0);

    #[must_use = "function does not modify the current value"]
    #[inline(always)]
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[inline(always)]
    pub fn into_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InsertionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<T> Item<T> {
    pub(crate) fn new(
        priority: Priority,
        insertion_index: InsertionIndex,
        enqueued_at: SimTime,
        value: T,
    ) -> Self {
        Self {
            priority,
            insertion_index,
            enqueued_at,
            value,
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn insertion_index(&self) -> InsertionIndex {
        self.insertion_index
    }

    /// the simulation time given when the item was enqueued
    pub fn enqueued_at(&self) -> SimTime {
        self.enqueued_at
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// consume the item and get the inner `T`.
    pub fn into_inner(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_next() {
        let first = InsertionIndex::ZERO;
        let second = first.next();

        assert!(first < second);
        assert_eq!(second.into_u64(), 1);
        assert_eq!(second.to_string(), "#1");
    }

    #[test]
    fn item_accessors() {
        let item = Item::new(
            Priority::new(2),
            InsertionIndex::ZERO.next(),
            SimTime::from_millis(16),
            "video",
        );

        assert_eq!(item.priority(), Priority::new(2));
        assert_eq!(item.insertion_index().into_u64(), 1);
        assert_eq!(item.enqueued_at(), SimTime::from_millis(16));
        assert_eq!(*item.value(), "video");
        assert_eq!(item.into_inner(), "video");
    }
}
