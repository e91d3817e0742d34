//! # Throughput Statistics
//!
//! The control core reads a free-running cycle counter (and, where the
//! platform has one, an instruction counter) once before and once after
//! the scan, then reports the difference:
//!
//! ```text
//! thread 1 finish at 273.558M cycles and 98.112M instructions
//! ```
//!
//! Counts are scaled to K/M/G with three decimals. Never used for
//! scheduling decisions.

use core::fmt;

/// A reading of the platform counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp {
    /// Free-running cycle count.
    pub cycles: u64,
    /// Retired-instruction count, if the platform exposes one.
    pub instret: Option<u64>,
}

impl Timestamp {
    /// A timestamp as taken at core reset.
    pub const ZERO: Self = Self { cycles: 0, instret: Some(0) };
}

/// Source of [`Timestamp`]s.
pub trait Clock {
    /// Read the counters.
    fn now(&self) -> Timestamp;
}

impl<K: Clock + ?Sized> Clock for &K {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// A clock that never advances, for targets without counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> Timestamp {
        Timestamp::ZERO
    }
}

/// Host clock: elapsed nanoseconds since construction stand in for
/// cycles. Hosts expose no portable instruction counter.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl HostClock {
    /// A clock reading zero now.
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for HostClock {
    fn now(&self) -> Timestamp {
        let nanos = self.origin.elapsed().as_nanos();
        Timestamp { cycles: u64::try_from(nanos).unwrap_or(u64::MAX), instret: None }
    }
}

/// Counter deltas between two timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elapsed {
    /// Cycles elapsed.
    pub cycles: u64,
    /// Instructions retired, if both readings carried a count.
    pub instret: Option<u64>,
}

impl Elapsed {
    /// Deltas from `before` to `after`.
    pub fn between(before: &Timestamp, after: &Timestamp) -> Self {
        Self {
            cycles: after.cycles.wrapping_sub(before.cycles),
            instret: match (before.instret, after.instret) {
                (Some(b), Some(a)) => Some(a.wrapping_sub(b)),
                _ => None,
            },
        }
    }
}

/// A count printed with a K/M/G suffix and three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magnitude(pub u64);

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const KILO: u64 = 1_000;
        const MEGA: u64 = 1_000_000;
        const GIGA: u64 = 1_000_000_000;

        let x = self.0;
        let (thousandths, suffix) = if x >= GIGA {
            (x / MEGA, "G")
        } else if x >= MEGA {
            (x / KILO, "M")
        } else if x >= KILO {
            (x, "K")
        } else {
            return write!(f, "{x}");
        };
        write!(f, "{}.{:03}{}", thousandths / 1000, thousandths % 1000, suffix)
    }
}

/// The per-thread throughput line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    /// Reporting thread id.
    pub thread: u32,
    /// Measured deltas.
    pub elapsed: Elapsed,
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "thread {} finish at {} cycles and ",
            self.thread,
            Magnitude(self.elapsed.cycles)
        )?;
        match self.elapsed.instret {
            Some(instret) => write!(f, "{} instructions", Magnitude(instret)),
            None => f.write_str("n/a instructions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_suffixes() {
        assert_eq!(Magnitude(999).to_string(), "999");
        assert_eq!(Magnitude(1_000).to_string(), "1.000K");
        assert_eq!(Magnitude(1_234).to_string(), "1.234K");
        assert_eq!(Magnitude(1_000_050).to_string(), "1.000M");
        assert_eq!(Magnitude(273_558_000).to_string(), "273.558M");
        assert_eq!(Magnitude(5_007_000_000).to_string(), "5.007G");
    }

    #[test]
    fn test_magnitude_pads_decimals() {
        assert_eq!(Magnitude(12_005).to_string(), "12.005K");
        assert_eq!(Magnitude(12_050).to_string(), "12.050K");
        assert_eq!(Magnitude(12_500).to_string(), "12.500K");
    }

    #[test]
    fn test_elapsed_wraps() {
        let before = Timestamp { cycles: u64::MAX - 4, instret: Some(10) };
        let after = Timestamp { cycles: 5, instret: Some(25) };
        assert_eq!(
            Elapsed::between(&before, &after),
            Elapsed { cycles: 10, instret: Some(15) }
        );
    }

    #[test]
    fn test_throughput_line() {
        let line = Throughput {
            thread: 1,
            elapsed: Elapsed { cycles: 273_558_000, instret: Some(98_112_400) },
        };
        assert_eq!(line.to_string(), "thread 1 finish at 273.558M cycles and 98.112M instructions");

        let line = Throughput { thread: 1, elapsed: Elapsed { cycles: 42, instret: None } };
        assert_eq!(line.to_string(), "thread 1 finish at 42 cycles and n/a instructions");
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_host_clock_is_monotonic() {
        let clock = HostClock::new();
        let before = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let after = clock.now();
        assert!(after.cycles > before.cycles);
        assert_eq!(Elapsed::between(&before, &after).instret, None);
    }

    #[test]
    fn test_frozen_clock() {
        let clock = FrozenClock;
        assert_eq!(
            Elapsed::between(&clock.now(), &clock.now()),
            Elapsed { cycles: 0, instret: Some(0) }
        );
    }
}
