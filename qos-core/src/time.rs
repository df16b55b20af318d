use core::fmt;
use logos::{Lexer, Logos};
use std::{ops::Add, str::FromStr, time};
use thiserror::Error;

/// A point on the simulation clock.
///
/// The simulation never reads the wall clock: the host (an animation
/// loop, a test, a simulation driver) owns the clock and passes the
/// current [`SimTime`] to every operation that needs it. The only
/// expectation is that the values handed over are monotonically
/// increasing.
///
/// The time is precise up to the micro seconds.
///
/// ```
/// # use qos_core::SimTime;
/// # use std::time::Duration;
/// let start = SimTime::ZERO;
/// let later = start + Duration::from_millis(600);
///
/// assert_eq!(later, SimTime::from_millis(600));
/// assert_eq!(later.saturating_duration_since(start), Duration::from_millis(600));
/// assert_eq!(start.saturating_duration_since(later), Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(u64);

/// crate private wrapper around [`std::time::Duration`] used to share
/// the human readable formatting and parsing between the public types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct Duration(time::Duration);

/// Error returned when parsing a duration such as `"500ms"` or `"1s 250ms"`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("Failed to parse `{input}': unexpected token")]
    UnexpectedToken { input: String },
    #[error("Failed to parse `{input}': expecting the duration to start with a number")]
    ExpectingNumber { input: String },
    #[error("Failed to parse `{input}': expecting a unit (ns, us, ms, s, m)")]
    ExpectingUnit { input: String },
    #[error("Failed to parse `{input}': duration too large")]
    Overflow { input: String },
    #[error("Failed to parse an empty duration")]
    Empty,
}

/// Parse a human readable duration.
///
/// A duration is a sequence of numbers, each followed by its unit
/// (`ns`, `us` or `µs`, `ms`, `s`, `m`). The parts are summed and the
/// total must fit in `u64::MAX` micro seconds.
///
/// ```
/// # use qos_core::parse_duration;
/// # use std::time::Duration;
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// assert_eq!(parse_duration("1m 30s").unwrap(), Duration::from_secs(90));
/// assert!(parse_duration("30").is_err());
/// ```
pub fn parse_duration(s: &str) -> Result<time::Duration, DurationParseError> {
    s.parse::<Duration>().map(Duration::into_duration)
}

/// micro seconds in `duration`, saturating at `u64::MAX`
#[inline(always)]
pub(crate) const fn saturating_micros(duration: time::Duration) -> u64 {
    let micros = duration.as_micros();
    if micros > u64::MAX as u128 {
        u64::MAX
    } else {
        micros as u64
    }
}

impl SimTime {
    /// The origin of the simulation clock.
    pub const ZERO: Self = Self(0);

    #[inline(always)]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    /// Saturates at the largest representable time.
    #[inline(always)]
    pub const fn from_duration(since_origin: time::Duration) -> Self {
        Self(saturating_micros(since_origin))
    }

    /// time elapsed since the origin of the simulation clock
    #[inline(always)]
    pub fn since_origin(self) -> time::Duration {
        time::Duration::from_micros(self.0)
    }

    #[inline(always)]
    pub fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    /// Returns the time elapsed from `earlier` to `self`, or
    /// [`Duration::ZERO`] if `earlier` is in the future.
    ///
    /// [`Duration::ZERO`]: std::time::Duration::ZERO
    #[inline(always)]
    pub fn saturating_duration_since(self, earlier: Self) -> time::Duration {
        time::Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<time::Duration> for SimTime {
    type Output = Self;

    fn add(self, rhs: time::Duration) -> Self::Output {
        Self(self.0.saturating_add(saturating_micros(rhs)))
    }
}

impl From<time::Duration> for SimTime {
    fn from(value: time::Duration) -> Self {
        Self::from_duration(value)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Duration::new(self.since_origin()), f)
    }
}

impl Duration {
    pub(crate) fn new(dur: time::Duration) -> Self {
        Self(dur)
    }

    #[inline]
    pub(crate) fn into_duration(self) -> time::Duration {
        self.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("0ms");
        }

        let mut written = false;
        let mut part = |f: &mut fmt::Formatter<'_>, value: u128, unit: &str| {
            if value != 0 {
                written = true;
                write!(f, "{value}{unit}")
            } else {
                Ok(())
            }
        };

        let micros = self.0.as_micros();
        part(f, micros / 1_000_000, "s")?;
        part(f, (micros / 1_000) % 1_000, "ms")?;
        part(f, micros % 1_000, "µs")?;

        if !written {
            // sub micro seconds durations
            write!(f, "{}ns", self.0.subsec_nanos())?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lex = Lexer::new(s);

        let mut total = time::Duration::ZERO;
        let mut parsed_any = false;

        while let Some(next) = lex.next() {
            let number: Token = next.map_err(|()| DurationParseError::UnexpectedToken {
                input: s.to_owned(),
            })?;

            if number != Token::Value {
                return Err(DurationParseError::ExpectingNumber {
                    input: s.to_owned(),
                });
            }
            let number: u64 = lex.slice().parse().map_err(|_| DurationParseError::Overflow {
                input: s.to_owned(),
            })?;

            let Some(Ok(measure)) = lex.next() else {
                return Err(DurationParseError::ExpectingUnit {
                    input: s.to_owned(),
                });
            };
            let duration = match measure {
                Token::NanoSeconds => time::Duration::from_nanos(number),
                Token::MicroSeconds => time::Duration::from_micros(number),
                Token::MilliSeconds => time::Duration::from_millis(number),
                Token::Seconds => time::Duration::from_secs(number),
                Token::Minutes => {
                    let secs = number.checked_mul(60).ok_or_else(|| {
                        DurationParseError::Overflow {
                            input: s.to_owned(),
                        }
                    })?;
                    time::Duration::from_secs(secs)
                }
                Token::Value => {
                    return Err(DurationParseError::ExpectingUnit {
                        input: s.to_owned(),
                    });
                }
            };
            total = total
                .checked_add(duration)
                .ok_or_else(|| DurationParseError::Overflow {
                    input: s.to_owned(),
                })?;
            parsed_any = true;
        }

        if !parsed_any {
            return Err(DurationParseError::Empty);
        }
        if total.as_micros() > u64::MAX as u128 {
            return Err(DurationParseError::Overflow {
                input: s.to_owned(),
            });
        }

        Ok(Self(total))
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")] // Ignore this regex pattern between tokens
enum Token {
    #[token("ns")]
    NanoSeconds,
    #[regex("us|µs|μs")]
    MicroSeconds,
    #[token("ms")]
    MilliSeconds,
    #[token("s")]
    Seconds,
    #[token("m")]
    Minutes,

    #[regex("[0-9]+")]
    Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logos_lexer() {
        let mut lex = Token::lexer("1ns");

        assert_eq!(lex.next(), Some(Ok(Token::Value)));
        assert_eq!(lex.span(), 0..1);
        assert_eq!(lex.slice(), "1");

        assert_eq!(lex.next(), Some(Ok(Token::NanoSeconds)));
        assert_eq!(lex.span(), 1..3);
        assert_eq!(lex.slice(), "ns");
    }

    #[test]
    fn parse() {
        let Duration(duration) = "123ms".parse().unwrap();
        assert_eq!(duration.as_millis(), 123);

        let Duration(duration) = "1s 2000ms 3000000us".parse().unwrap();
        assert_eq!(duration.as_secs(), 6);

        let Duration(duration) = "1s500ms".parse().unwrap();
        assert_eq!(duration.as_millis(), 1_500);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "".parse::<Duration>().unwrap_err(),
            DurationParseError::Empty
        );
        assert!(matches!(
            "150".parse::<Duration>(),
            Err(DurationParseError::ExpectingUnit { .. })
        ));
        assert!(matches!(
            "ms".parse::<Duration>(),
            Err(DurationParseError::ExpectingNumber { .. })
        ));
        assert!(matches!(
            "abc".parse::<Duration>(),
            Err(DurationParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn parse_overflow() {
        assert!(matches!(
            "1152921504606846976s".parse::<Duration>(),
            Err(DurationParseError::Overflow { .. })
        ));
        assert!(matches!(
            "99999999999999999999ms".parse::<Duration>(),
            Err(DurationParseError::Overflow { .. })
        ));
        assert!(matches!(
            "307445734561825861m".parse::<Duration>(),
            Err(DurationParseError::Overflow { .. })
        ));

        let Duration(duration) = "18446744073709551615us".parse().unwrap();
        assert_eq!(duration, time::Duration::from_micros(u64::MAX));
    }

    #[test]
    fn display() {
        assert_eq!(Duration::new(time::Duration::ZERO).to_string(), "0ms");
        assert_eq!(
            Duration::new(time::Duration::from_millis(500)).to_string(),
            "500ms"
        );
        assert_eq!(
            Duration::new(time::Duration::from_millis(1_542)).to_string(),
            "1s542ms"
        );
        assert_eq!(
            Duration::new(time::Duration::from_nanos(1_542)).to_string(),
            "1µs"
        );
        assert_eq!(
            Duration::new(time::Duration::from_nanos(42)).to_string(),
            "42ns"
        );
    }

    #[test]
    fn sim_time_arithmetic() {
        let t = SimTime::from_millis(100) + time::Duration::from_millis(500);
        assert_eq!(t.as_millis(), 600);
        assert_eq!(t.to_string(), "600ms");
        assert_eq!(
            t.saturating_duration_since(SimTime::from_millis(100)),
            time::Duration::from_millis(500)
        );
        assert_eq!(
            SimTime::ZERO.saturating_duration_since(t),
            time::Duration::ZERO
        );
    }

    #[test]
    fn sim_time_saturates() {
        let max = SimTime::from_duration(time::Duration::from_micros(u64::MAX));

        assert_eq!(SimTime::ZERO + time::Duration::from_secs(1 << 60), max);
        assert_eq!(SimTime::from_duration(time::Duration::MAX), max);
        assert_eq!(SimTime::from_millis(u64::MAX), max);
        assert_eq!(max + time::Duration::from_millis(1), max);
        assert_eq!(
            SimTime::from_millis(1_000) + time::Duration::MAX,
            max
        );
    }

    #[test]
    fn sim_time_truncates_nanos() {
        assert_eq!(
            SimTime::from_duration(time::Duration::from_nanos(1_999)),
            SimTime::from_duration(time::Duration::from_micros(1))
        );
    }
}
