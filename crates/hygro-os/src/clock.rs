//! Transition timestamps from the POSIX clocks.

use hygro::{Monotonic, Timestamp};

/// A [`Monotonic`] implementation backed by `clock_gettime(2)`.
///
/// The pipeline only consumes timestamp differences taken microseconds
/// apart, so the realtime clock is as usable as the monotonic one; the
/// realtime variant matches the reference wiring.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    clock_id: libc::clockid_t,
}

impl SystemClock {
    /// A clock reading `CLOCK_REALTIME`.
    #[must_use]
    pub const fn realtime() -> Self {
        Self {
            clock_id: libc::CLOCK_REALTIME,
        }
    }

    /// A clock reading `CLOCK_MONOTONIC`.
    #[must_use]
    pub const fn monotonic() -> Self {
        Self {
            clock_id: libc::CLOCK_MONOTONIC,
        }
    }
}

impl Monotonic for SystemClock {
    fn now(&mut self) -> Timestamp {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: `ts` is a valid out-pointer, and both supported clock
        // ids are always readable on Linux.
        let _ = unsafe { libc::clock_gettime(self.clock_id, &mut ts) };

        // tv_sec/tv_nsec widths vary by target; widen unconditionally.
        Timestamp::new(ts.tv_sec as i64, ts.tv_nsec as i64)
    }
}
