//! Frame assembly, checksum validation, and the decoded measurement.
//!
//! A frame is 40 bits: four data bytes followed by a checksum byte that
//! must equal the low 8 bits of the data bytes' sum. Because the decoded
//! bit train usually carries a spurious leading bit or two from the
//! sensor's handshake, the frame is searched with a 40-bit window anchored
//! at the *end* of the train and re-anchored one bit earlier after every
//! failed checksum.

use tracing::{debug, trace};

/// Number of bits in one frame.
pub const FRAME_BITS: usize = 40;

/// One 40-bit candidate frame, decomposed into five bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; 5],
}

impl Frame {
    /// Packs a 40-bit window into a frame, most-significant bit first.
    ///
    /// # Panics
    ///
    /// Panics if the window is not exactly [`FRAME_BITS`] entries long.
    #[must_use]
    pub fn pack(window: &[u8]) -> Self {
        assert_eq!(window.len(), FRAME_BITS);

        let mut bytes = [0u8; 5];
        for (index, bit) in window.iter().enumerate() {
            bytes[index / 8] = (bytes[index / 8] << 1) | bit;
        }

        Self { bytes }
    }

    /// Returns the frame's five raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 5] {
        self.bytes
    }

    /// Checks whether the fifth byte equals the sum of the four data
    /// bytes, truncated to 8 bits.
    #[must_use]
    pub fn checksum_valid(&self) -> bool {
        let sum = self.bytes[0]
            .wrapping_add(self.bytes[1])
            .wrapping_add(self.bytes[2])
            .wrapping_add(self.bytes[3]);

        sum == self.bytes[4]
    }

    /// Extracts the measurement carried by the data bytes.
    #[must_use]
    pub fn measurement(&self) -> Measurement {
        Measurement {
            humidity_tenths: (u16::from(self.bytes[0]) << 8) | u16::from(self.bytes[1]),
            temperature_tenths: (u16::from(self.bytes[2]) << 8) | u16::from(self.bytes[3]),
        }
    }
}

/// A validated humidity and temperature reading.
///
/// Both fields are fixed-point values in tenths, exactly as transmitted by
/// the sensor; the float accessors exist for presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Relative humidity in tenths of a percent.
    pub humidity_tenths: u16,
    /// Temperature in tenths of a degree Celsius.
    pub temperature_tenths: u16,
}

impl Measurement {
    /// Relative humidity as a percentage (% RH).
    #[must_use]
    pub fn humidity(&self) -> f32 {
        f32::from(self.humidity_tenths) / 10.0
    }

    /// Temperature in degrees Celsius.
    #[must_use]
    pub fn temperature_celsius(&self) -> f32 {
        f32::from(self.temperature_tenths) / 10.0
    }

    /// Temperature in degrees Fahrenheit.
    #[must_use]
    pub fn temperature_fahrenheit(&self) -> f32 {
        self.temperature_celsius() * 9.0 / 5.0 + 32.0
    }
}

/// Searches the bit sequence for a checksum-valid frame.
///
/// The window starts over the most recent [`FRAME_BITS`] bits and
/// re-anchors one bit earlier after every failed checksum, so when several
/// windows validate, the most recent one wins. Returns `None` when fewer
/// than [`FRAME_BITS`] bits are available or no window validates.
#[must_use]
pub fn find_frame(bits: &[u8]) -> Option<Frame> {
    let mut end = bits.len();

    while end >= FRAME_BITS {
        let frame = Frame::pack(&bits[end - FRAME_BITS..end]);
        trace!(end, bytes = ?frame.bytes(), "candidate window");

        if frame.checksum_valid() {
            return Some(frame);
        }

        debug!(end, bytes = ?frame.bytes(), "bad checksum");
        end -= 1;
    }

    None
}
