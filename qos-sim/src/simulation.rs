use crate::{
    Packet, PacketId, TrafficClass, TrafficGenerator,
    defaults::{DEFAULT_FRAME, DEFAULT_MAX_GAP, DEFAULT_MIN_GAP, DEFAULT_SEED},
    stats::{ClassStats, SimStats},
};
use qos_core::{
    QueueMode, ReleaseInterval, SimTime,
    queue::{PriorityReleaseQueue, QueueConfig},
};
use std::{collections::BTreeMap, time::Duration};
use thiserror::Error;
use tracing::debug;

/// Parameters of a [`TrafficControl`] simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimConfig {
    pub queue: QueueConfig,
    pub seed: u64,
    pub min_gap: Duration,
    pub max_gap: Duration,
    pub frame: Duration,
}

/// Error returned by [`TrafficControlBuilder::build`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimConfigError {
    #[error("Invalid packet gaps: minimum ({min_gap:?}) is greater than maximum ({max_gap:?})")]
    InvalidGaps { min_gap: Duration, max_gap: Duration },
    #[error("The simulation frame cannot be shorter than one micro second")]
    ZeroFrame,
}

/// Builder for a [`TrafficControl`] simulation.
///
/// Obtained via [`TrafficControl::builder`].
///
/// ## Defaults
///
/// | Setting | Default |
/// |---------|---------|
/// | Queue mode | [`QueueMode::Priority`] |
/// | Release interval | `500ms` |
/// | Packet gaps | `1s` to `2s` |
/// | Frame | `16ms` |
/// | Seed | `0` |
///
/// ## Example
///
/// ```
/// use qos_sim::{QueueMode, TrafficControl};
///
/// let mut sim = TrafficControl::builder()
///     .set_mode(QueueMode::Fifo)
///     .set_release_interval("250ms".parse()?)
///     .set_seed(42)
///     .build()?;
///
/// sim.run_for(std::time::Duration::from_secs(10));
/// assert!(!sim.sent().is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TrafficControlBuilder {
    config: SimConfig,
}

/// A packet let out of the shaping queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Released {
    packet: Packet,
    enqueued_at: SimTime,
    released_at: SimTime,
}

/// What happened during one [`TrafficControl::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// number of packets generated and enqueued
    pub generated: usize,
    /// the packet released by the queue, if any
    pub released: Option<PacketId>,
}

/// # Traffic control simulation
///
/// Packets of the three traffic lanes are generated by a
/// [`TrafficGenerator`], pushed into a [`PriorityReleaseQueue`] with
/// the priority of their [`TrafficClass`] and polled out of it on every
/// frame. Released packets are collected in the [`sent`] list.
///
/// The simulation owns its clock: [`tick`] and [`run_for`] advance it
/// by whole frames; [`step`] lets the caller drive the clock instead.
///
/// [`sent`]: TrafficControl::sent
/// [`tick`]: TrafficControl::tick
/// [`run_for`]: TrafficControl::run_for
/// [`step`]: TrafficControl::step
pub struct TrafficControl {
    queue: PriorityReleaseQueue<Packet>,
    generator: TrafficGenerator,

    frame: Duration,
    now: SimTime,
    frames: u64,

    sent: Vec<Released>,
    classes: BTreeMap<TrafficClass, ClassStats>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            seed: DEFAULT_SEED,
            min_gap: DEFAULT_MIN_GAP,
            max_gap: DEFAULT_MAX_GAP,
            frame: DEFAULT_FRAME,
        }
    }
}

impl TrafficControlBuilder {
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
        }
    }

    pub fn set_mode(mut self, mode: QueueMode) -> Self {
        self.config.queue.mode = mode;
        self
    }

    pub fn set_release_interval(mut self, release_interval: ReleaseInterval) -> Self {
        self.config.queue.release_interval = release_interval;
        self
    }

    pub fn set_depth_warning(mut self, threshold: usize) -> Self {
        self.config.queue.depth_warning = Some(threshold);
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the range the gap between two packets of a lane is drawn in.
    pub fn set_gaps(mut self, min_gap: Duration, max_gap: Duration) -> Self {
        self.config.min_gap = min_gap;
        self.config.max_gap = max_gap;
        self
    }

    pub fn set_frame(mut self, frame: Duration) -> Self {
        self.config.frame = frame;
        self
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }

    pub fn build(self) -> Result<TrafficControl, SimConfigError> {
        let SimConfig {
            queue,
            seed,
            min_gap,
            max_gap,
            frame,
        } = self.config;

        if min_gap > max_gap {
            return Err(SimConfigError::InvalidGaps { min_gap, max_gap });
        }
        if frame.as_micros() == 0 {
            return Err(SimConfigError::ZeroFrame);
        }

        let mut generator = TrafficGenerator::with_gaps(min_gap, max_gap);
        generator.set_seed(seed);

        Ok(TrafficControl {
            queue: PriorityReleaseQueue::new(queue),
            generator,
            frame,
            now: SimTime::ZERO,
            frames: 0,
            sent: Vec::new(),
            classes: BTreeMap::new(),
        })
    }
}

impl Default for TrafficControlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Released {
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn enqueued_at(&self) -> SimTime {
        self.enqueued_at
    }

    pub fn released_at(&self) -> SimTime {
        self.released_at
    }

    /// time spent waiting in the queue
    pub fn queueing_delay(&self) -> Duration {
        self.released_at.saturating_duration_since(self.enqueued_at)
    }

    pub fn into_packet(self) -> Packet {
        self.packet
    }
}

impl TrafficControl {
    pub fn builder() -> TrafficControlBuilder {
        TrafficControlBuilder::new()
    }

    /// current time of the simulation clock
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    pub fn queue(&self) -> &PriorityReleaseQueue<Packet> {
        &self.queue
    }

    pub fn generator(&self) -> &TrafficGenerator {
        &self.generator
    }

    /// packets released so far, in release order
    pub fn sent(&self) -> &[Released] {
        &self.sent
    }

    /// take the released packets out of the simulation
    pub fn drain_sent(&mut self) -> Vec<Released> {
        std::mem::take(&mut self.sent)
    }

    /// Run one frame of the simulation at `now`.
    ///
    /// New packets are generated and enqueued first, then the queue is
    /// polled once. `now` is expected to be monotonically increasing;
    /// the simulation clock never goes backward.
    pub fn step(&mut self, now: SimTime) -> StepReport {
        let Self {
            queue,
            generator,
            classes,
            sent,
            ..
        } = self;

        let generated = generator.generate_with(now, |packet| {
            classes.entry(packet.class()).or_default().generated += 1;
            let priority = packet.priority();
            queue.enqueue(packet, priority, now);
        });

        let released = queue.try_release(now).map(|item| {
            let enqueued_at = item.enqueued_at();
            let packet = item.into_inner();
            let released = Released {
                packet,
                enqueued_at,
                released_at: now,
            };
            let delay = released.queueing_delay();
            let id = released.packet.id();
            let class = released.packet.class();

            classes.entry(class).or_default().record_release(delay);
            debug!(
                %id,
                %class,
                %now,
                delay_ms = delay.as_millis() as u64,
                depth = queue.len(),
                "packet released"
            );

            sent.push(released);
            id
        });

        self.now = self.now.max(now);
        self.frames += 1;

        StepReport {
            generated,
            released,
        }
    }

    /// Advance the simulation clock by one frame and [`step`].
    ///
    /// [`step`]: TrafficControl::step
    pub fn tick(&mut self) -> StepReport {
        let now = self.now + self.frame;
        self.step(now)
    }

    /// number of whole frames in `duration`
    ///
    /// A trailing part of `duration` shorter than a frame does not count.
    pub fn frames_in(&self, duration: Duration) -> u64 {
        let frames = duration.as_micros() / self.frame.as_micros();
        u64::try_from(frames).unwrap_or(u64::MAX)
    }

    /// Run the [`frames_in`] `duration`. Returns the number of frames
    /// executed.
    ///
    /// [`frames_in`]: TrafficControl::frames_in
    pub fn run_for(&mut self, duration: Duration) -> u64 {
        self.run_for_with(duration, |_| ())
    }

    /// Same as [`run_for`] but the [`StepReport`] of every frame is given
    /// to `handle`.
    ///
    /// ```
    /// # use qos_sim::TrafficControl;
    /// # use std::time::Duration;
    /// let mut sim = TrafficControl::builder().build()?;
    ///
    /// let mut generated = 0;
    /// let frames = sim.run_for_with(Duration::from_secs(10), |report| {
    ///     generated += report.generated;
    /// });
    ///
    /// assert_eq!(frames, sim.frames_in(Duration::from_secs(10)));
    /// assert_eq!(generated, sim.sent().len() + sim.queue().len());
    /// # Ok::<(), qos_sim::SimConfigError>(())
    /// ```
    ///
    /// [`run_for`]: TrafficControl::run_for
    pub fn run_for_with<H>(&mut self, duration: Duration, mut handle: H) -> u64
    where
        H: FnMut(StepReport),
    {
        let frames = self.frames_in(duration);
        for _ in 0..frames {
            let report = self.tick();
            handle(report);
        }
        frames
    }

    pub fn stats(&self) -> SimStats {
        let mut classes = self.classes.clone();
        for item in self.queue.iter() {
            classes.entry(item.value().class()).or_default().waiting += 1;
        }

        SimStats {
            now: self.now,
            frames: self.frames,
            classes,
            queue: self.queue.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(100);
    const GAP: Duration = Duration::from_millis(1_000);

    /// lanes emit every 1.1s exactly, frames of 100ms
    fn fixed_traffic(mode: QueueMode) -> TrafficControl {
        TrafficControl::builder()
            .set_mode(mode)
            .set_release_interval(ReleaseInterval::from_millis(500))
            .set_gaps(GAP, GAP)
            .set_frame(FRAME)
            .build()
            .unwrap()
    }

    fn sent_classes(sim: &TrafficControl) -> Vec<TrafficClass> {
        sim.sent().iter().map(|r| r.packet().class()).collect()
    }

    #[test]
    fn invalid_config() {
        let error = TrafficControl::builder()
            .set_gaps(Duration::from_secs(2), Duration::from_secs(1))
            .build()
            .err()
            .unwrap();
        assert_eq!(
            error,
            SimConfigError::InvalidGaps {
                min_gap: Duration::from_secs(2),
                max_gap: Duration::from_secs(1)
            }
        );

        let error = TrafficControl::builder()
            .set_frame(Duration::ZERO)
            .build()
            .err()
            .unwrap();
        assert_eq!(error, SimConfigError::ZeroFrame);

        let error = TrafficControl::builder()
            .set_frame(Duration::from_nanos(999))
            .build()
            .err()
            .unwrap();
        assert_eq!(error, SimConfigError::ZeroFrame);
    }

    #[test]
    fn run_for_whole_frames() {
        let mut sim = fixed_traffic(QueueMode::Priority);

        assert_eq!(sim.frames_in(Duration::from_millis(250)), 2);
        assert_eq!(sim.frames_in(Duration::from_millis(99)), 0);
        assert_eq!(sim.frames_in(Duration::MAX), u64::MAX);

        assert_eq!(sim.run_for(Duration::from_millis(250)), 2);
        assert_eq!(sim.now(), SimTime::from_millis(200));
    }

    #[test]
    fn run_for_with_reports_every_frame() {
        let mut sim = fixed_traffic(QueueMode::Priority);

        let mut reports = Vec::new();
        let frames = sim.run_for_with(Duration::from_millis(2_300), |report| reports.push(report));

        assert_eq!(frames, 23);
        assert_eq!(reports.len(), 23);
        let generated: usize = reports.iter().map(|r| r.generated).sum();
        assert_eq!(generated, 6);
        let released: Vec<_> = reports.iter().filter_map(|r| r.released).collect();
        let sent: Vec<_> = sim.sent().iter().map(|r| r.packet().id()).collect();
        assert_eq!(released, sent);
    }

    #[test]
    fn priority_scenario() {
        let mut sim = fixed_traffic(QueueMode::Priority);

        assert_eq!(sim.run_for(Duration::from_millis(2_300)), 23);
        assert_eq!(sim.now(), SimTime::from_millis(2_300));

        assert_eq!(
            sent_classes(&sim),
            vec![TrafficClass::Voip, TrafficClass::Video, TrafficClass::Voip]
        );
        let delays: Vec<_> = sim.sent().iter().map(Released::queueing_delay).collect();
        assert_eq!(
            delays,
            vec![
                Duration::ZERO,
                Duration::from_millis(600),
                Duration::from_millis(100)
            ]
        );

        // video (2nd generation) then the two data packets remain
        let waiting: Vec<_> = sim.queue().iter().map(|i| i.value().class()).collect();
        assert_eq!(
            waiting,
            vec![TrafficClass::Video, TrafficClass::Data, TrafficClass::Data]
        );
    }

    #[test]
    fn fifo_scenario() {
        let mut sim = fixed_traffic(QueueMode::Fifo);
        sim.run_for(Duration::from_millis(2_300));

        assert_eq!(
            sent_classes(&sim),
            vec![TrafficClass::Voip, TrafficClass::Video, TrafficClass::Data]
        );
    }

    #[test]
    fn step_report() {
        let mut sim = fixed_traffic(QueueMode::Priority);

        assert_eq!(sim.step(SimTime::from_millis(1_000)), StepReport::default());

        let report = sim.step(SimTime::from_millis(1_100));
        assert_eq!(report.generated, 3);
        let released = report.released.expect("the queue was never released before");
        assert_eq!(sim.sent()[0].packet().id(), released);

        let report = sim.step(SimTime::from_millis(1_200));
        assert_eq!(report, StepReport::default());
    }

    #[test]
    fn same_seed_same_run() {
        let run = |seed| {
            let mut sim = TrafficControl::builder().set_seed(seed).build().unwrap();
            sim.run_for(Duration::from_secs(30));
            sim.drain_sent()
        };

        let first = run(7);
        assert!(!first.is_empty());
        assert_eq!(first, run(7));
    }

    #[test]
    fn fifo_releases_in_generation_order() {
        let mut sim = TrafficControl::builder()
            .set_mode(QueueMode::Fifo)
            .set_seed(11)
            .build()
            .unwrap();
        sim.run_for(Duration::from_secs(60));

        let ids: Vec<_> = sim.sent().iter().map(|r| r.packet().id()).collect();
        assert!(ids.len() > 10);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn priority_favours_voice_under_load() {
        let mut sim = TrafficControl::builder()
            .set_mode(QueueMode::Priority)
            .set_seed(5)
            .build()
            .unwrap();
        sim.run_for(Duration::from_secs(60));

        let stats = sim.stats();
        let voip = stats.class(TrafficClass::Voip);
        let data = stats.class(TrafficClass::Data);

        assert!(voip.released > 0);
        let voip_delay = voip.mean_delay().unwrap();
        match data.mean_delay() {
            Some(data_delay) => assert!(voip_delay <= data_delay),
            None => assert!(data.waiting > 0),
        }
        assert!(voip.max_delay <= sim.queue().release_interval().into_duration() * 2);
    }

    #[test]
    fn stats_are_consistent() {
        let mut sim = TrafficControl::builder().set_seed(99).build().unwrap();
        let frames = sim.run_for(Duration::from_secs(20));

        let stats = sim.stats();
        assert_eq!(stats.frames, frames);
        assert_eq!(stats.now, sim.now());

        let mut waiting = 0;
        let mut released = 0;
        for class in TrafficClass::LANES {
            let class = stats.class(class);
            assert_eq!(class.generated, class.released + class.waiting);
            waiting += class.waiting;
            released += class.released;
        }
        assert_eq!(stats.class(TrafficClass::BestEffort), ClassStats::default());

        assert_eq!(stats.queue.depth as u64, waiting);
        assert_eq!(stats.queue.released, released);
        assert_eq!(sim.sent().len() as u64, released);
        assert!(stats.queue.high_water_mark >= stats.queue.depth);
    }

    #[test]
    fn drain_sent() {
        let mut sim = fixed_traffic(QueueMode::Priority);
        sim.run_for(Duration::from_secs(3));

        let sent = sim.drain_sent();
        assert!(!sent.is_empty());
        assert!(sim.sent().is_empty());
        assert_eq!(sim.stats().queue.released, sent.len() as u64);
    }
}
