use crate::TrafficClass;
use qos_core::{Priority, SimTime};
use std::fmt;

/// a generator for monotonicaly increasing **unique** [`PacketId`]
///
/// The first generated identifier is `1`.
#[derive(Debug, Clone, Default)]
pub struct PacketIdGenerator(u64);

/// # [`Packet`] Identifier
///
/// During the lifetime of the simulation, this identifier can uniquely
/// identify the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PacketId(u64);

/// A unit of simulated traffic.
///
/// Packets carry no payload: only what the traffic shaper needs to
/// know to order them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: PacketId,
    class: TrafficClass,
    created_at: SimTime,
}

impl PacketIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// generate a new unique identifier
    pub fn generate(&mut self) -> PacketId {
        self.0 = self.0.wrapping_add(1);

        debug_assert!(
            self.0 != 0,
            "The generator wrapped around after `u64::MAX` unique packet identifiers"
        );

        PacketId(self.0)
    }
}

impl PacketId {
    #[inline(always)]
    pub fn into_u64(self) -> u64 {
        self.0
    }
}

impl Packet {
    pub fn new(id: PacketId, class: TrafficClass, created_at: SimTime) -> Self {
        Self {
            id,
            class,
            created_at,
        }
    }

    pub fn id(&self) -> PacketId {
        self.id
    }

    pub fn class(&self) -> TrafficClass {
        self.class
    }

    pub fn priority(&self) -> Priority {
        self.class.priority()
    }

    pub fn created_at(&self) -> SimTime {
        self.created_at
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} @{}", self.id, self.class, self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_starts_at_one() {
        let mut generator = PacketIdGenerator::new();

        let first = generator.generate();
        let second = generator.generate();

        assert_eq!(first.into_u64(), 1);
        assert!(first < second);
    }

    #[test]
    fn packet_id_display() {
        assert_eq!(PacketId(42).to_string(), "0x000000000000002a");
    }

    #[test]
    fn packet_display() {
        let packet = Packet::new(PacketId(1), TrafficClass::Voip, SimTime::from_millis(1_500));

        assert_eq!(packet.priority(), Priority::new(3));
        assert_eq!(packet.to_string(), "[0x0000000000000001] voip @1s500ms");
    }
}
