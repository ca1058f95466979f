//! Blocking delays for the sensor start sequence.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// A [`DelayNs`] provider backed by `thread::sleep`.
///
/// Sleep granularity is far coarser than a nanosecond, but the start
/// sequence only needs "at least this long" semantics; the timing-critical
/// part of an acquisition is the busy loop, which never sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Instant;

    #[test]
    fn delays_at_least_as_long_as_requested() {
        let mut delay = SleepDelay;

        let before = Instant::now();
        delay.delay_ms(5);
        assert!(before.elapsed() >= Duration::from_millis(5));
    }
}
