use std::time::Duration;

/// Default simulation frame
///
/// The traffic control loop ticks at roughly 60 frames per second.
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Default lower bound of the gap between two packets of a lane
pub const DEFAULT_MIN_GAP: Duration = Duration::from_millis(1_000);

/// Default upper bound (excluded) of the gap between two packets of a lane
pub const DEFAULT_MAX_GAP: Duration = Duration::from_millis(2_000);

/// Default seed of the traffic generator
pub const DEFAULT_SEED: u64 = 0;
