//! The acquisition controller: repeated sample/decode/validate cycles.
//!
//! Short bit counts and checksum misses are expected, not exceptional;
//! both simply trigger another full acquisition cycle. The reference
//! behavior retried forever, which spins indefinitely on a disconnected
//! sensor, so the retry loop here is bounded and exhaustion is a typed
//! error.

use tracing::{debug, warn};

use crate::decode::decode;
use crate::frame::{FRAME_BITS, Measurement, find_frame};
use crate::sampler::Acquire;

/// Errors that may occur while reading the sensor.
#[derive(Debug)]
pub enum Error<E> {
    /// GPIO pin errors.
    Pin(E),
    /// No checksum-valid frame was captured within the attempt budget.
    AttemptsExhausted {
        /// Number of full sampling cycles tried.
        attempts: usize,
    },
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Pin(e)
    }
}

/// Retry policy for the acquisition controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfig {
    /// Maximum number of full sampling cycles per [`Reader::read`] call.
    pub max_attempts: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        // Each cycle takes a few seconds (settle time dominates), so 50
        // attempts bounds a read to a handful of minutes even on a very
        // noisy line.
        Self { max_attempts: 50 }
    }
}

/// A successful reading plus its acquisition diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// The validated measurement.
    pub measurement: Measurement,
    /// Number of full sampling cycles it took.
    pub attempts: usize,
}

/// The acquisition controller.
///
/// Drives an [`Acquire`] source through up to `max_attempts` cycles of
/// sampling, decoding, and frame search, and restores the line to idle on
/// every exit path.
pub struct Reader<A>
where
    A: Acquire,
{
    source: A,
    config: ReadConfig,
}

impl<A> Reader<A>
where
    A: Acquire,
{
    /// Creates a reader with the default [`ReadConfig`].
    #[must_use]
    pub fn new(source: A) -> Self {
        Self::with_config(source, ReadConfig::default())
    }

    /// Creates a reader with an explicit retry policy.
    #[must_use]
    pub fn with_config(source: A, config: ReadConfig) -> Self {
        Self { source, config }
    }

    /// Releases the acquisition source.
    #[must_use]
    pub fn release(self) -> A {
        self.source
    }

    /// Reads one validated measurement.
    ///
    /// Attempts whole acquisition cycles until a checksum-valid frame is
    /// found or the attempt budget runs out. Transient failures (too few
    /// decoded bits, no valid window) are retried silently; they surface
    /// only as `debug!` diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] when pin access fails and
    /// [`Error::AttemptsExhausted`] when no attempt produced a valid
    /// frame.
    pub fn read(&mut self) -> Result<Reading, Error<A::Error>> {
        for attempt in 1..=self.config.max_attempts {
            debug!(attempt, "starting acquisition cycle");

            let log = self.source.acquire()?;
            let bits = decode(&log);

            if bits.len() < FRAME_BITS {
                debug!(attempt, bits = bits.len(), "insufficient bits, retrying");
                continue;
            }
            debug!(attempt, bits = bits.len(), "decoded bit train");

            if let Some(frame) = find_frame(&bits) {
                self.source.restore_idle()?;
                debug!(attempts = attempt, bytes = ?frame.bytes(), "checksum-valid frame");
                return Ok(Reading {
                    measurement: frame.measurement(),
                    attempts: attempt,
                });
            }

            debug!(attempt, "no checksum-valid window, retrying");
        }

        self.source.restore_idle()?;
        warn!(
            attempts = self.config.max_attempts,
            "attempt budget exhausted without a valid frame"
        );
        Err(Error::AttemptsExhausted {
            attempts: self.config.max_attempts,
        })
    }
}
