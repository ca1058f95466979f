//! GPIO access through the Linux sysfs interface.
//!
//! A pin must be exported once (`/sys/class/gpio/export`) before its
//! `gpioN` directory appears; [`SysfsPin::export`] covers that one-shot
//! setup. After that, direction, level, and edge-trigger (interrupt)
//! control are plain file writes, and the instantaneous level is a read
//! of the `value` file.
//!
//! The `value` file is opened once and kept open: the busy-polling
//! sampler reads it thousands of times per attempt, and re-opening it on
//! every read would add unpredictable latency.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read as _, Seek as _, SeekFrom, Write as _};
use std::path::{Path, PathBuf};

use embedded_hal::digital::{Error as DigitalError, ErrorKind, ErrorType, InputPin, OutputPin};

use tracing::debug;

/// Default sysfs GPIO class directory.
pub const GPIO_ROOT: &str = "/sys/class/gpio";

/// A failure to access the GPIO subsystem.
///
/// These are environmental errors (missing export, permissions, a pin
/// that was never exported); the pipeline never retries them.
#[derive(Debug)]
pub struct GpioError(io::Error);

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO access failed: {}", self.0)
    }
}

impl std::error::Error for GpioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<io::Error> for GpioError {
    fn from(e: io::Error) -> Self {
        Self(e)
    }
}

impl DigitalError for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

/// One exported sysfs GPIO pin.
///
/// Direction switches are implicit: level writes drive the pin as an
/// output and level reads switch it to an input. Every direction switch
/// also rewrites the edge trigger to `none`, so interrupt delivery on the
/// line stays disabled throughout an acquisition.
pub struct SysfsPin {
    number: u32,
    pin_dir: PathBuf,
    value: File,
    direction: Option<Direction>,
}

impl SysfsPin {
    /// Exports the pin through the default sysfs root.
    ///
    /// # Errors
    ///
    /// Returns an error when the export file cannot be opened or written.
    pub fn export(number: u32) -> Result<(), GpioError> {
        Self::export_at(GPIO_ROOT, number)
    }

    /// Exports the pin through an explicit sysfs root.
    ///
    /// A pin that is already exported reports `EBUSY`; that is not a
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns an error when the export file cannot be opened or written.
    pub fn export_at(root: impl AsRef<Path>, number: u32) -> Result<(), GpioError> {
        let path = root.as_ref().join("export");
        match fs::write(&path, number.to_string()) {
            Ok(()) => Ok(()),
            Err(e) if e.raw_os_error() == Some(libc::EBUSY) => {
                debug!(number, "pin already exported");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Opens an exported pin through the default sysfs root.
    ///
    /// # Errors
    ///
    /// Returns an error when the pin's `value` file cannot be opened,
    /// typically because the pin was never exported.
    pub fn open(number: u32) -> Result<Self, GpioError> {
        Self::open_at(GPIO_ROOT, number)
    }

    /// Opens an exported pin through an explicit sysfs root.
    ///
    /// # Errors
    ///
    /// Returns an error when the pin's `value` file cannot be opened.
    pub fn open_at(root: impl AsRef<Path>, number: u32) -> Result<Self, GpioError> {
        let pin_dir = root.as_ref().join(format!("gpio{number}"));
        let value = OpenOptions::new()
            .read(true)
            .write(true)
            .open(pin_dir.join("value"))?;

        Ok(Self {
            number,
            pin_dir,
            value,
            direction: None,
        })
    }

    /// The sysfs GPIO number of this pin.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Enables or disables interrupt delivery (edge triggers) on the pin.
    ///
    /// Pins without edge support simply have no `edge` attribute; that is
    /// tolerated, since such pins cannot deliver interrupts anyway.
    ///
    /// # Errors
    ///
    /// Returns an error when the `edge` attribute exists but cannot be
    /// written.
    pub fn set_interrupts_enabled(&mut self, enabled: bool) -> Result<(), GpioError> {
        let trigger = if enabled { "both" } else { "none" };
        match fs::write(self.pin_dir.join("edge"), trigger) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(number = self.number, "pin has no edge control");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn switch_to_input(&mut self) -> Result<(), GpioError> {
        fs::write(self.pin_dir.join("direction"), "in")?;
        self.set_interrupts_enabled(false)?;
        self.direction = Some(Direction::In);
        Ok(())
    }

    fn write_level(&mut self, high: bool) -> Result<(), GpioError> {
        if self.direction != Some(Direction::Out) {
            // Writing "high"/"low" to the direction attribute switches to
            // output and sets the initial level in one step, avoiding a
            // glitch through the default-low state.
            fs::write(self.pin_dir.join("direction"), if high { "high" } else { "low" })?;
            self.set_interrupts_enabled(false)?;
            self.direction = Some(Direction::Out);
            return Ok(());
        }

        let _ = self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(if high { b"1" } else { b"0" })?;
        Ok(())
    }

    fn read_level(&mut self) -> Result<bool, GpioError> {
        if self.direction != Some(Direction::In) {
            self.switch_to_input()?;
        }

        let _ = self.value.seek(SeekFrom::Start(0))?;
        let mut buf = [0u8; 2];
        let n = self.value.read(&mut buf)?;
        if n == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        Ok(buf[0] == b'1')
    }
}

impl ErrorType for SysfsPin {
    type Error = GpioError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), GpioError> {
        self.write_level(false)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.write_level(true)
    }
}

impl InputPin for SysfsPin {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        self.read_level()
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.read_level().map(|high| !high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a fake sysfs tree with one exported pin.
    fn fake_sysfs(test: &str, number: u32) -> PathBuf {
        let root = std::env::temp_dir().join(format!("hygro-sysfs-{}-{test}", std::process::id()));
        let pin_dir = root.join(format!("gpio{number}"));
        fs::create_dir_all(&pin_dir).unwrap();
        fs::write(root.join("export"), "").unwrap();
        fs::write(pin_dir.join("direction"), "in").unwrap();
        fs::write(pin_dir.join("value"), "0\n").unwrap();
        fs::write(pin_dir.join("edge"), "none").unwrap();
        root
    }

    #[test]
    fn export_writes_the_pin_number() {
        let root = fake_sysfs("export", 115);

        SysfsPin::export_at(&root, 115).unwrap();
        assert_eq!(fs::read_to_string(root.join("export")).unwrap(), "115");
    }

    #[test]
    fn export_without_sysfs_is_an_error() {
        let root = Path::new("/nonexistent/sysfs/root");

        assert!(SysfsPin::export_at(root, 115).is_err());
    }

    #[test]
    fn opening_an_unexported_pin_is_an_error() {
        let root = fake_sysfs("unexported", 7);

        assert!(SysfsPin::open_at(&root, 8).is_err());
    }

    #[test]
    fn reads_switch_to_input_and_mask_interrupts() {
        let root = fake_sysfs("reads", 7);
        fs::write(root.join("gpio7/value"), "1\n").unwrap();
        fs::write(root.join("gpio7/direction"), "out").unwrap();
        fs::write(root.join("gpio7/edge"), "both").unwrap();

        let mut pin = SysfsPin::open_at(&root, 7).unwrap();
        assert!(pin.is_high().unwrap());
        assert!(!pin.is_low().unwrap());

        assert_eq!(fs::read_to_string(root.join("gpio7/direction")).unwrap(), "in");
        assert_eq!(fs::read_to_string(root.join("gpio7/edge")).unwrap(), "none");
    }

    #[test]
    fn level_writes_drive_the_pin_as_output() {
        let root = fake_sysfs("writes", 7);

        let mut pin = SysfsPin::open_at(&root, 7).unwrap();

        // First write switches direction and level atomically.
        pin.set_high().unwrap();
        assert_eq!(fs::read_to_string(root.join("gpio7/direction")).unwrap(), "high");

        // Subsequent writes go through the value attribute.
        pin.set_low().unwrap();
        assert_eq!(&fs::read_to_string(root.join("gpio7/value")).unwrap()[..1], "0");
    }
}
