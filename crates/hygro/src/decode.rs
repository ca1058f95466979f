//! Classification of transition timings into data bits.
//!
//! The sensor encodes every bit as a fixed-width low pulse followed by a
//! variable-width pulse whose duration carries the value: roughly 26–28 µs
//! for a 0 and roughly 70 µs for a 1. Each falling edge therefore closes
//! one bit, and the time elapsed since the preceding edge decides its
//! value. 50 µs is the documented midpoint between the two widths.

use embedded_hal::digital::PinState;

use tracing::{trace, warn};

use crate::clock::Elapsed;
use crate::transition::Transition;

/// Pulse-width threshold separating 0-bits from 1-bits, in nanoseconds.
///
/// Durations strictly below the threshold decode as 0; everything else
/// decodes as 1.
pub const PULSE_THRESHOLD_NS: i64 = 50_000;

// Pulse widths outside this band have untrustworthy timing, usually
// because the process was preempted mid-sample. Informational only; the
// classification is unchanged.
const TRUST_BAND_MIN_NS: i64 = 20_000;
const TRUST_BAND_MAX_NS: i64 = 85_000;

/// Maximum number of decoded bits kept per acquisition attempt.
///
/// A frame is 40 bits; the start-sequence handshake can contribute a
/// couple of spurious leading bits on top of that.
pub const MAX_BITS: usize = 42;

/// A bounded sequence of decoded bits, one `0`/`1` value per entry.
pub type BitSeq = heapless::Vec<u8, MAX_BITS>;

/// Decodes a chronological transition sequence into a bit sequence.
///
/// The first transition is a start-sequence artifact and only serves as a
/// time reference. Of the remaining transitions, only those *to* the low
/// level yield a bit; transitions to the high level merely delimit the
/// next width measurement.
///
/// This is a pure function of its input: identical logs always decode to
/// identical bit sequences.
#[must_use]
pub fn decode(transitions: &[Transition]) -> BitSeq {
    let mut bits = BitSeq::new();

    for (index, pair) in transitions.windows(2).enumerate() {
        let width = Elapsed::between(pair[0].at, pair[1].at).total_nanos();
        let suspect = !(TRUST_BAND_MIN_NS..=TRUST_BAND_MAX_NS).contains(&width);

        trace!(
            index = index + 1,
            to = ?pair[1].to,
            width_ns = width,
            suspect,
            "transition"
        );

        if pair[1].to == PinState::Low {
            let bit = u8::from(width >= PULSE_THRESHOLD_NS);
            if bits.push(bit).is_err() {
                // A legitimate frame never exceeds the capacity; stop
                // decoding rather than lose the oldest bits.
                warn!(capacity = MAX_BITS, "bit buffer full, remaining edges ignored");
                break;
            }
        }
    }

    bits
}
