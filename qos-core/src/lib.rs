/*!
# QoS release queue

Deterministic building blocks for traffic-shaping simulations. The
centre piece is the [`PriorityReleaseQueue`]: items tagged with a
[`Priority`] are kept in release order and let out, one at a time, at
most once per [`ReleaseInterval`].

Nothing in this crate reads the wall clock. The caller owns the
simulation clock and passes the current [`SimTime`] to every operation,
which keeps runs reproducible and easy to test.

```
use qos_core::{queue::{PriorityReleaseQueue, QueueMode}, ReleaseInterval, SimTime};
use std::time::Duration;

let mut queue = PriorityReleaseQueue::builder()
    .set_mode(QueueMode::Priority)
    .set_release_interval(ReleaseInterval::from_millis(500))
    .build();

queue.enqueue("data", 1, SimTime::ZERO);
queue.enqueue("voip", 3, SimTime::ZERO);
queue.enqueue("video", 2, SimTime::ZERO);

// poll the queue on every frame of a ~60fps loop
let mut now = SimTime::ZERO;
let mut sent = Vec::new();
while !queue.is_empty() {
    now = now + Duration::from_millis(16);
    if let Some(item) = queue.try_release(now) {
        sent.push(item.into_inner());
    }
}

assert_eq!(sent, ["voip", "video", "data"]);
```
*/

pub mod defaults;
mod interval;
mod priority;
pub mod queue;
pub mod stats;
mod time;

pub use self::{
    interval::ReleaseInterval,
    priority::{ParsePriorityError, Priority},
    queue::{Item, PriorityReleaseQueue, QueueMode},
    stats::QueueStats,
    time::{DurationParseError, SimTime, parse_duration},
};
