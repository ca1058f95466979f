//! `hygro` is a library crate that recovers humidity and temperature
//! readings from the single-wire, timing-encoded serial protocol spoken by
//! `DHT22`-class sensors, sampled from plain userspace.
//!
//! Unlike interrupt-driven drivers, this crate assumes nothing beyond a
//! readable/writable GPIO pin and a clock: it busy-polls the pin at the
//! highest rate the platform allows, timestamps every level transition,
//! classifies low-going pulse widths into bits, and slides a 40-bit window
//! over the decoded train until a checksum validates. Poor timing is
//! expected and absorbed by retrying the whole cycle.
//!
//! The pipeline is strictly one-directional:
//!
//! ```text
//! Reader -> PinSampler -> decode -> find_frame -> Reading
//! ```
//!
//! All hardware seams are the [`embedded-hal`] 1.0 traits plus a small
//! [`Monotonic`] clock trait, so the whole pipeline runs against mocks in
//! tests and against sysfs GPIO in production.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![no_std]

/// Timestamps and elapsed-time computation.
pub mod clock;
/// Conversion of timestamped transitions into data bits.
pub mod decode;
/// 40-bit frame search, checksum validation, and measurements.
pub mod frame;
/// The acquisition controller driving sample/decode/validate attempts.
pub mod reader;
/// The start sequence and the busy-polling pin sampler.
pub mod sampler;
/// Recorded pin level transitions.
pub mod transition;

pub use clock::{Elapsed, Monotonic, Timestamp};
pub use decode::{BitSeq, decode};
pub use frame::{Frame, Measurement, find_frame};
pub use reader::{Error, ReadConfig, Reader, Reading};
pub use sampler::{Acquire, PinSampler, SamplerConfig};
pub use transition::{Transition, TransitionLog};
