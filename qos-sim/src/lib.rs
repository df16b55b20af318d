/*!
# Traffic control simulation

A tick-driven simulation of a traffic shaper. Three lanes of traffic
(voice, video and bulk data) feed a [`PriorityReleaseQueue`] that lets
one packet out every release interval. Comparing a run in
[`QueueMode::Priority`] with a run in [`QueueMode::Fifo`] shows how
prioritisation keeps the queueing delay of voice traffic low while the
bulk data waits.

```
use qos_sim::{QueueMode, TrafficClass, TrafficControl};
use std::time::Duration;

let mut sim = TrafficControl::builder()
    .set_mode(QueueMode::Priority)
    .set_seed(1)
    .build()?;

let frames = sim.run_for(Duration::from_secs(30));
let stats = sim.stats();

assert_eq!(stats.frames, frames);
assert!(stats.class(TrafficClass::Voip).released > 0);
# Ok::<(), qos_sim::SimConfigError>(())
```
*/

pub mod defaults;
mod generator;
mod packet;
mod simulation;
pub mod stats;
mod traffic_class;

// convenient re-export of `qos_core` core objects
pub use qos_core::{
    Item, Priority, PriorityReleaseQueue, QueueMode, QueueStats, ReleaseInterval, SimTime,
};

pub use self::{
    generator::TrafficGenerator,
    packet::{Packet, PacketId, PacketIdGenerator},
    simulation::{
        Released, SimConfig, SimConfigError, StepReport, TrafficControl, TrafficControlBuilder,
    },
    stats::{ClassStats, SimStats},
    traffic_class::{ParseTrafficClassError, TrafficClass},
};
