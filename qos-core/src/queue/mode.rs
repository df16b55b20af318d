use std::{fmt, str::FromStr};
use thiserror::Error;

/// Ordering discipline of a [`PriorityReleaseQueue`].
///
/// The mode is fixed when the queue is built.
///
/// ```
/// # use qos_core::queue::QueueMode;
/// assert_eq!("fifo".parse::<QueueMode>().unwrap(), QueueMode::Fifo);
/// assert_eq!(QueueMode::default().to_string(), "priority");
/// ```
///
/// [`PriorityReleaseQueue`]: crate::queue::PriorityReleaseQueue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueMode {
    /// descending priority, first come first served among equals
    Priority,
    /// strict order of arrival, priorities are ignored
    Fifo,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown queue mode `{input}', expecting `priority' or `fifo'")]
pub struct ParseQueueModeError {
    input: String,
}

impl Default for QueueMode {
    fn default() -> Self {
        crate::defaults::DEFAULT_QUEUE_MODE
    }
}

impl fmt::Display for QueueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Priority => f.write_str("priority"),
            Self::Fifo => f.write_str("fifo"),
        }
    }
}

impl FromStr for QueueMode {
    type Err = ParseQueueModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "fifo" => Ok(Self::Fifo),
            _ => Err(ParseQueueModeError {
                input: s.to_owned(),
            }),
        }
    }
}
