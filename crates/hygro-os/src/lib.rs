//! `hygro-os` provides the operating-system side of the `hygro` pipeline
//! on Linux hosts:
//!
//! - A sysfs GPIO pin implementing the [`embedded-hal`] digital traits,
//!   including the one-shot pin export and interrupt (edge trigger)
//!   masking.
//! - A `timespec`-backed clock for transition timestamps.
//! - A scoped best-effort request for `SCHED_FIFO` real-time priority,
//!   restored on drop on every exit path.
//! - A blocking delay provider for the sensor start sequence.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![deny(missing_docs)]

/// System clocks providing transition timestamps.
pub mod clock;
/// Blocking delays.
pub mod delay;
/// Sysfs GPIO pin access.
pub mod gpio;
/// Real-time scheduling priority requests.
pub mod sched;

pub use clock::SystemClock;
pub use delay::SleepDelay;
pub use gpio::{GpioError, SysfsPin};
pub use sched::RealtimeGuard;
