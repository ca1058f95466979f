//! The sensor start sequence and the busy-polling sampler.
//!
//! Sampling is a blocking, non-yielding busy-wait: after the start signal
//! the pin is read back-to-back a fixed number of times with no intentional
//! delay, and every level change is timestamped. The loop must run to
//! completion without suspension; callers are expected to request
//! real-time scheduling priority beforehand (best-effort, see the OS glue
//! crate). Under- or oversampling is not an error here, it is absorbed
//! downstream by the decoder and the retry policy.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use tracing::{debug, warn};

use crate::clock::Monotonic;
use crate::transition::{MAX_TRANSITIONS, Transition, TransitionLog};

/// Timing parameters of one acquisition attempt.
///
/// The defaults match the sensor's documented protocol; tests shrink
/// `samples` to keep scripted pin mocks manageable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Number of back-to-back pin reads per attempt.
    pub samples: usize,
    /// Idle-high settle time before the start signal, in milliseconds.
    ///
    /// The spec sheet asks for two seconds between readings; one extra
    /// second of margin costs nothing.
    pub settle_ms: u32,
    /// Duration of the low start pulse, in microseconds.
    pub start_low_us: u32,
    /// Duration of the high release pulse, in microseconds.
    pub release_us: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            samples: 13_000,
            settle_ms: 3_000,
            start_low_us: 5_000,
            release_us: 1,
        }
    }
}

/// A source of transition logs, one per acquisition attempt.
///
/// [`PinSampler`] is the hardware implementation; the acquisition
/// controller only depends on this trait so that its retry logic can be
/// exercised against scripted logs.
pub trait Acquire {
    /// The underlying hardware error.
    type Error;

    /// Runs one full acquisition: start sequence plus sampling pass.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying pin access fails.
    fn acquire(&mut self) -> Result<TransitionLog, Self::Error>;

    /// Restores the line to its idle state (driven high).
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying pin access fails.
    fn restore_idle(&mut self) -> Result<(), Self::Error>;
}

/// The busy-polling sampler for a sensor data line.
///
/// Generic over the pin, a blocking delay provider, and a clock, in that
/// order. Switching the pin between output (start signal) and input
/// (sampling) is left to the pin implementation, which is also expected to
/// keep interrupt delivery on the line disabled.
pub struct PinSampler<P, D, C>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    C: Monotonic,
{
    pin: P,
    delay: D,
    clock: C,
    config: SamplerConfig,
}

impl<P, D, C> PinSampler<P, D, C>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    C: Monotonic,
{
    /// Creates a sampler with the default [`SamplerConfig`].
    #[must_use]
    pub fn new(pin: P, delay: D, clock: C) -> Self {
        Self::with_config(pin, delay, clock, SamplerConfig::default())
    }

    /// Creates a sampler with an explicit configuration.
    #[must_use]
    pub fn with_config(pin: P, delay: D, clock: C, config: SamplerConfig) -> Self {
        Self {
            pin,
            delay,
            clock,
            config,
        }
    }

    /// Releases the pin.
    #[must_use]
    pub fn release(self) -> P {
        self.pin
    }

    fn send_start_signal(&mut self) -> Result<(), P::Error> {
        // Drive the line high and let the sensor settle back to idle.
        self.pin.set_high()?;
        self.delay.delay_ms(self.config.settle_ms);

        // Pull low to request a reading, then release with a minimal high
        // pulse before the sensor takes over the line.
        self.pin.set_low()?;
        self.delay.delay_us(self.config.start_low_us);
        self.pin.set_high()?;
        self.delay.delay_us(self.config.release_us);

        Ok(())
    }

    fn sample(&mut self) -> Result<TransitionLog, P::Error> {
        let mut log = TransitionLog::new();
        let mut clamped = false;

        // The first read hands the line to the sensor (the pin switches to
        // input) and primes the previous level.
        let mut previous = self.pin.is_high()?;

        for _ in 1..self.config.samples {
            let level = self.pin.is_high()?;
            if level != previous {
                let transition = Transition::new(PinState::from(level), self.clock.now());
                if log.push(transition).is_err() {
                    clamped = true;
                }
                previous = level;
            }
        }

        if clamped {
            warn!(capacity = MAX_TRANSITIONS, "transition log full, extra edges dropped");
        }
        debug!(transitions = log.len(), "sampling pass finished");

        Ok(log)
    }
}

impl<P, D, C> Acquire for PinSampler<P, D, C>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    C: Monotonic,
{
    type Error = P::Error;

    fn acquire(&mut self) -> Result<TransitionLog, P::Error> {
        self.send_start_signal()?;
        self.sample()
    }

    fn restore_idle(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()
    }
}
