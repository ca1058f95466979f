//! The `hygro` binary: reads one humidity/temperature measurement from a
//! single-wire sensor on a sysfs GPIO pin and prints it.
//!
//! The default output is one machine-friendly line,
//! `"<humidity> <temperature>"` with one decimal each; `--verbose` adds a
//! human-friendly summary and enables the full per-transition decode
//! trace on stderr.

use std::time::Instant;

use anyhow::{Context, bail};

use clap::Parser;

use tracing::Level;

use hygro::{Error, PinSampler, ReadConfig, Reader, SamplerConfig};
use hygro_os::{RealtimeGuard, SleepDelay, SysfsPin, SystemClock};

#[derive(Parser)]
#[command(name = "hygro")]
#[command(about = "Read a single-wire humidity/temperature sensor over GPIO")]
#[command(version)]
struct Args {
    /// Export the GPIO pin through sysfs and exit
    #[arg(short = 'i', long)]
    init: bool,

    /// Print decode diagnostics and a human-friendly summary
    #[arg(short, long)]
    verbose: bool,

    /// Sysfs GPIO number wired to the sensor's data line
    #[arg(long, default_value_t = 115)]
    pin: u32,

    /// Full sampling cycles to try before giving up
    #[arg(long, default_value_t = 50)]
    max_attempts: usize,

    /// Pin reads per sampling pass
    #[arg(long, default_value_t = SamplerConfig::default().samples)]
    samples: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::TRACE } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if args.init {
        return SysfsPin::export(args.pin)
            .with_context(|| format!("couldn't export GPIO pin {}", args.pin));
    }

    let pin = SysfsPin::open(args.pin)
        .with_context(|| format!("couldn't open GPIO pin {} (try --init first)", args.pin))?;

    let config = SamplerConfig {
        samples: args.samples,
        ..SamplerConfig::default()
    };
    let sampler = PinSampler::with_config(pin, SleepDelay, SystemClock::realtime(), config);
    let mut reader = Reader::with_config(
        sampler,
        ReadConfig {
            max_attempts: args.max_attempts,
        },
    );

    // Hold elevated priority for the whole read; the guard restores the
    // previous policy even when the read fails.
    let realtime = RealtimeGuard::acquire();
    let started = Instant::now();
    let outcome = reader.read();
    drop(realtime);

    match outcome {
        Ok(reading) => {
            let measurement = reading.measurement;
            if args.verbose {
                println!(
                    "RH: {:.1}%, Temp: {:.1}\u{b0} C ({:.1}\u{b0} F)",
                    measurement.humidity(),
                    measurement.temperature_celsius(),
                    measurement.temperature_fahrenheit()
                );
                println!(
                    "Took {} seconds for a reading. ({} attempts)",
                    started.elapsed().as_secs(),
                    reading.attempts
                );
            } else {
                println!(
                    "{:.1} {:.1}",
                    measurement.humidity(),
                    measurement.temperature_celsius()
                );
            }
            Ok(())
        }
        Err(Error::Pin(e)) => Err(e).context("GPIO access failed mid-acquisition"),
        Err(Error::AttemptsExhausted { attempts }) => {
            bail!("no checksum-valid frame after {attempts} attempts; check the sensor wiring")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn short_flags_match_the_reference_tool() {
        let args = Args::parse_from(["hygro", "-i", "-v"]);
        assert!(args.init);
        assert!(args.verbose);
        assert_eq!(args.pin, 115);
    }
}
