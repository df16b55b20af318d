use crate::{
    Packet, PacketIdGenerator, TrafficClass,
    defaults::{DEFAULT_MAX_GAP, DEFAULT_MIN_GAP, DEFAULT_SEED},
};
use qos_core::SimTime;
use rand_chacha::ChaChaRng;
use rand_core::{Rng as _, SeedableRng as _};
use std::time::Duration;
use tracing::trace;

/// Produces the packets of the three traffic lanes.
///
/// On every call to [`generate_with`], each lane draws a fresh gap,
/// uniformly in `[min_gap, max_gap)`, and emits a packet if strictly
/// more than that gap elapsed since its previous emission. Because the
/// gap is drawn again on every tick the actual spacing between two
/// packets of a lane is a little over `min_gap` on average.
///
/// All draws come from a single seeded [`ChaChaRng`], two generators
/// with the same seed and the same ticks emit the same packets.
///
/// [`generate_with`]: TrafficGenerator::generate_with
#[derive(Clone)]
pub struct TrafficGenerator {
    rng: ChaChaRng,
    ids: PacketIdGenerator,
    min_gap: Duration,
    max_gap: Duration,
    last_emission: [SimTime; TrafficClass::LANES.len()],
}

impl TrafficGenerator {
    /// Create a generator with the default gaps (`1s` to `2s`) and seed.
    pub fn new() -> Self {
        Self::with_gaps(DEFAULT_MIN_GAP, DEFAULT_MAX_GAP)
    }

    /// `min_gap` must not be greater than `max_gap`. This is checked by
    /// the [`TrafficControlBuilder`]; here `max_gap` is raised to
    /// `min_gap` instead.
    ///
    /// [`TrafficControlBuilder`]: crate::TrafficControlBuilder
    pub fn with_gaps(min_gap: Duration, max_gap: Duration) -> Self {
        Self {
            rng: ChaChaRng::seed_from_u64(DEFAULT_SEED),
            ids: PacketIdGenerator::new(),
            min_gap,
            max_gap: max_gap.max(min_gap),
            last_emission: [SimTime::ZERO; TrafficClass::LANES.len()],
        }
    }

    /// Re-seed the generator's random-number generator.
    ///
    /// The default seed is `0`.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaChaRng::seed_from_u64(seed);
    }

    pub fn min_gap(&self) -> Duration {
        self.min_gap
    }

    pub fn max_gap(&self) -> Duration {
        self.max_gap
    }

    fn draw_gap(&mut self) -> Duration {
        let span = self.max_gap.saturating_sub(self.min_gap).as_micros() as u64;
        if span == 0 {
            return self.min_gap;
        }

        self.min_gap + Duration::from_micros(self.rng.next_u64() % span)
    }

    /// Emit the packets due at `now`, in lane order (voip, video, data).
    ///
    /// Returns the number of packets given to `handle`.
    pub fn generate_with<H>(&mut self, now: SimTime, mut handle: H) -> usize
    where
        H: FnMut(Packet),
    {
        let mut emitted = 0;

        for (lane, class) in TrafficClass::LANES.into_iter().enumerate() {
            let gap = self.draw_gap();
            let elapsed = now.saturating_duration_since(self.last_emission[lane]);
            if elapsed <= gap {
                continue;
            }

            let packet = Packet::new(self.ids.generate(), class, now);
            trace!(id = %packet.id(), %class, %now, "packet generated");

            self.last_emission[lane] = now;
            emitted += 1;
            handle(packet);
        }

        emitted
    }
}

impl Default for TrafficGenerator {
    fn default() -> Self {
        Self::new()
    }
}
