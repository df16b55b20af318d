use qos_core::Priority;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The kind of traffic a packet belongs to.
///
/// Each class maps to a fixed [`Priority`]: voice first, then video,
/// then bulk data. Anything else is best effort.
///
/// ```
/// # use qos_sim::TrafficClass;
/// # use qos_core::Priority;
/// assert_eq!(TrafficClass::Voip.priority(), Priority::new(3));
/// assert_eq!("video".parse::<TrafficClass>().unwrap(), TrafficClass::Video);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrafficClass {
    Voip,
    Video,
    Data,
    BestEffort,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown traffic class `{input}', expecting one of voip, video, data or best-effort")]
pub struct ParseTrafficClassError {
    input: String,
}

impl TrafficClass {
    /// the classes generated by the [`TrafficGenerator`], one per lane
    ///
    /// [`TrafficGenerator`]: crate::TrafficGenerator
    pub const LANES: [Self; 3] = [Self::Voip, Self::Video, Self::Data];

    pub const ALL: [Self; 4] = [Self::Voip, Self::Video, Self::Data, Self::BestEffort];

    pub const fn priority(self) -> Priority {
        match self {
            Self::Voip => Priority::new(3),
            Self::Video => Priority::new(2),
            Self::Data => Priority::new(1),
            Self::BestEffort => Priority::new(0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Voip => "voip",
            Self::Video => "video",
            Self::Data => "data",
            Self::BestEffort => "best-effort",
        }
    }
}

impl fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrafficClass {
    type Err = ParseTrafficClassError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voip" => Ok(Self::Voip),
            "video" => Ok(Self::Video),
            "data" => Ok(Self::Data),
            "best-effort" | "besteffort" | "best_effort" => Ok(Self::BestEffort),
            _ => Err(ParseTrafficClassError {
                input: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_follow_urgency() {
        assert!(TrafficClass::Voip.priority() > TrafficClass::Video.priority());
        assert!(TrafficClass::Video.priority() > TrafficClass::Data.priority());
        assert!(TrafficClass::Data.priority() > TrafficClass::BestEffort.priority());
        assert_eq!(TrafficClass::BestEffort.priority(), Priority::ZERO);
    }

    #[test]
    fn parse() {
        assert_eq!("VoIP".parse(), Ok(TrafficClass::Voip));
        assert_eq!("best_effort".parse(), Ok(TrafficClass::BestEffort));
        assert!("ftp".parse::<TrafficClass>().is_err());
    }

    #[test]
    fn display_round_trip() {
        for class in TrafficClass::ALL {
            assert_eq!(class.to_string().parse(), Ok(class));
        }
    }
}
