//! End-to-end pipeline test: a scripted pin replays the waveform of a
//! complete sensor frame, and the reader is expected to recover the
//! measurement through the real sampler, decoder, and frame search.

use std::collections::VecDeque;

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

use hygro::{Monotonic, PinSampler, Reader, SamplerConfig, Timestamp};

/// Hands out pre-computed timestamps, one per recorded transition.
struct ReplayClock {
    stamps: VecDeque<Timestamp>,
}

impl Monotonic for ReplayClock {
    fn now(&mut self) -> Timestamp {
        self.stamps.pop_front().expect("clock read past the scripted waveform")
    }
}

/// The level phases of one full sensor response, as (level, width in
/// nanoseconds) pairs. The first phase is the idle-high line observed by
/// the sampler's priming read; the width of the last phase is ignored.
fn waveform_for_bytes(bytes: [u8; 5]) -> Vec<(State, i64)> {
    let mut phases = vec![(State::High, 100_000)];

    // Handshake: the sensor acknowledges the start signal with an 80 µs
    // low pulse and an 80 µs high pulse.
    phases.push((State::Low, 80_000));
    phases.push((State::High, 80_000));

    for byte in bytes {
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1;
            phases.push((State::Low, 50_000));
            phases.push((State::High, if bit == 1 { 70_000 } else { 28_000 }));
        }
    }

    // Closing low pulse, then the line is released back to idle high.
    phases.push((State::Low, 50_000));
    phases.push((State::High, 0));

    phases
}

/// Expands the waveform into per-read pin levels and the transition
/// timestamps the clock must replay.
fn script_waveform(phases: &[(State, i64)], reads_per_phase: usize) -> (Vec<State>, VecDeque<Timestamp>) {
    let mut levels = Vec::new();
    let mut stamps = VecDeque::new();
    let mut at = 0;

    for (index, &(level, width)) in phases.iter().enumerate() {
        if index > 0 {
            // The sampler reads the clock once, at the first read of the
            // new phase.
            stamps.push_back(Timestamp::from_nanos(at));
        }
        levels.extend(std::iter::repeat_n(level, reads_per_phase));
        at += width;
    }

    (levels, stamps)
}

#[test]
fn reader_recovers_a_measurement_from_a_scripted_waveform() {
    // 0x028C = 65.2% RH, 0x0105 = 26.1 °C, checksum 0x94.
    let phases = waveform_for_bytes([0x02, 0x8C, 0x01, 0x05, 0x94]);
    let (levels, stamps) = script_waveform(&phases, 2);

    // Start signal writes, one get per sampled level, then the idle
    // restore write after the frame validates.
    let mut expectations = vec![
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ];
    expectations.extend(levels.iter().map(|&level| PinTransaction::get(level)));
    expectations.push(PinTransaction::set(State::High));

    let config = SamplerConfig {
        samples: levels.len(),
        settle_ms: 0,
        start_low_us: 0,
        release_us: 0,
    };
    let pin = PinMock::new(&expectations);
    let sampler = PinSampler::with_config(pin, NoopDelay::new(), ReplayClock { stamps }, config);

    let mut reader = Reader::new(sampler);
    let reading = reader.read().expect("the scripted waveform must decode");

    assert_eq!(reading.attempts, 1);
    assert_eq!(reading.measurement.humidity_tenths, 652);
    assert_eq!(reading.measurement.temperature_tenths, 261);
    assert!((reading.measurement.humidity() - 65.2).abs() < 1e-4);
    assert!((reading.measurement.temperature_celsius() - 26.1).abs() < 1e-4);

    let mut pin = reader.release().release();
    pin.done();
}
