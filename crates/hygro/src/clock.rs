//! Timestamps with nanosecond resolution and signed elapsed-time
//! computation between them.
//!
//! The sampler only ever consumes *differences* between timestamps, so the
//! underlying clock may be monotonic or realtime as long as it does not
//! jump between two consecutive transitions of the same acquisition.

/// Nanoseconds in one second.
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A point in time, split into whole seconds and a sub-second nanosecond
/// component, mirroring the POSIX `timespec` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    /// Whole seconds.
    pub secs: i64,
    /// Nanoseconds within the second, in `[0, 1_000_000_000)`.
    pub nanos: i64,
}

impl Timestamp {
    /// Creates a timestamp from whole seconds and sub-second nanoseconds.
    #[must_use]
    pub const fn new(secs: i64, nanos: i64) -> Self {
        Self { secs, nanos }
    }

    /// Creates a timestamp from a total nanosecond count.
    #[must_use]
    pub const fn from_nanos(total: i64) -> Self {
        Self {
            secs: total / NANOS_PER_SEC,
            nanos: total % NANOS_PER_SEC,
        }
    }
}

/// A non-negative duration between two timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    /// Whole seconds.
    pub secs: i64,
    /// Nanoseconds within the second, in `[0, 1_000_000_000)`.
    pub nanos: i64,
}

impl Elapsed {
    /// Computes the elapsed time between `start` and `end`.
    ///
    /// When the later timestamp's sub-second component is numerically
    /// smaller than the earlier one's, a second is borrowed so that the
    /// nanosecond component stays within `[0, 1_000_000_000)`.
    #[must_use]
    pub const fn between(start: Timestamp, end: Timestamp) -> Self {
        if end.nanos - start.nanos < 0 {
            Self {
                secs: end.secs - start.secs - 1,
                nanos: NANOS_PER_SEC + end.nanos - start.nanos,
            }
        } else {
            Self {
                secs: end.secs - start.secs,
                nanos: end.nanos - start.nanos,
            }
        }
    }

    /// Returns the duration as a total nanosecond count.
    #[must_use]
    pub const fn total_nanos(self) -> i64 {
        self.secs * NANOS_PER_SEC + self.nanos
    }
}

/// A clock with at least microsecond resolution.
///
/// The sampler calls [`Monotonic::now`] once per detected transition, so
/// implementations should keep the call as cheap and as consistent in
/// latency as possible.
pub trait Monotonic {
    /// Returns the current time.
    fn now(&mut self) -> Timestamp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_without_borrow() {
        let start = Timestamp::new(5, 100_000_000);
        let end = Timestamp::new(7, 300_000_000);

        let elapsed = Elapsed::between(start, end);
        assert_eq!(elapsed.secs, 2);
        assert_eq!(elapsed.nanos, 200_000_000);
    }

    #[test]
    fn elapsed_borrows_a_second() {
        let start = Timestamp::new(5, 900_000_000);
        let end = Timestamp::new(7, 100_000_000);

        let elapsed = Elapsed::between(start, end);
        assert_eq!(elapsed.secs, 1);
        assert_eq!(elapsed.nanos, 200_000_000);
    }

    #[test]
    fn elapsed_between_equal_timestamps_is_zero() {
        let at = Timestamp::new(42, 123_456_789);

        let elapsed = Elapsed::between(at, at);
        assert_eq!(elapsed.secs, 0);
        assert_eq!(elapsed.nanos, 0);
        assert_eq!(elapsed.total_nanos(), 0);
    }

    #[test]
    fn elapsed_readdition_reconstructs_the_later_timestamp() {
        let pairs = [
            (Timestamp::new(0, 0), Timestamp::new(0, 1)),
            (Timestamp::new(3, 999_999_999), Timestamp::new(4, 0)),
            (Timestamp::new(10, 500_000_000), Timestamp::new(12, 499_999_999)),
            (Timestamp::new(100, 26_000), Timestamp::new(100, 96_000)),
        ];

        for (start, end) in pairs {
            let elapsed = Elapsed::between(start, end);
            assert!((0..NANOS_PER_SEC).contains(&elapsed.nanos));

            let total = start.secs * NANOS_PER_SEC + start.nanos + elapsed.total_nanos();
            assert_eq!(Timestamp::from_nanos(total), end);
        }
    }
}
