//! Level transitions observed on the sensor's data line.

use embedded_hal::digital::PinState;

use crate::clock::Timestamp;

/// Maximum number of transitions recorded per acquisition attempt.
///
/// A complete frame produces 84 transitions (start-sequence handshake plus
/// two edges per bit); anything beyond this capacity is line noise and is
/// dropped by the sampler.
pub const MAX_TRANSITIONS: usize = 128;

/// One detected change of the pin's logic level.
///
/// Transitions are recorded in strict time order and alternate between the
/// two levels by construction: the sampler only emits a transition when
/// the observed level differs from the previous read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The level the pin changed *to*.
    pub to: PinState,
    /// When the change was observed.
    pub at: Timestamp,
}

impl Transition {
    /// Creates a transition record.
    #[must_use]
    pub const fn new(to: PinState, at: Timestamp) -> Self {
        Self { to, at }
    }
}

/// A bounded, time-ordered sequence of transitions from one acquisition.
pub type TransitionLog = heapless::Vec<Transition, MAX_TRANSITIONS>;
