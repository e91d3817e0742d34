//! # Diagnostics Console
//!
//! Formatted text output with a device selector identifying which core
//! context is printing. Used for progress lines and the final report only,
//! never for control flow, so write errors are ignored by callers.

use core::fmt;

/// Which core context is currently printing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Device {
    /// The control core (ingestion, scan progress, reports).
    #[default]
    Control,
    /// The worker pool, selected while a batch is in flight.
    Worker,
}

/// A character sink with a device selector.
///
/// `core::fmt::Write` supplies `write_str`, `write_char` and `write_fmt`,
/// so `write!`/`writeln!` work directly on any console.
pub trait Console: fmt::Write {
    /// Route subsequent output to `device`.
    fn select(&mut self, device: Device);
}

impl<C: Console + ?Sized> Console for &mut C {
    fn select(&mut self, device: Device) {
        (**self).select(device);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConsole;

impl fmt::Write for NullConsole {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Ok(())
    }
}

impl Console for NullConsole {
    fn select(&mut self, _device: Device) {}
}

/// Hosted console: the control device writes to stdout, the worker device
/// to stderr.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct StdConsole {
    device: Device,
}

#[cfg(feature = "std")]
impl StdConsole {
    /// A console on the control device.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl fmt::Write for StdConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        use std::io::Write as _;

        let written = match self.device {
            Device::Control => {
                let mut out = std::io::stdout().lock();
                out.write_all(s.as_bytes()).and_then(|()| out.flush())
            }
            Device::Worker => std::io::stderr().lock().write_all(s.as_bytes()),
        };
        written.map_err(|_| fmt::Error)
    }
}

#[cfg(feature = "std")]
impl Console for StdConsole {
    fn select(&mut self, device: Device) {
        self.device = device;
    }
}

/// Records output per device in memory.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    device: Device,
    /// Everything written while [`Device::Control`] was selected.
    pub control: String,
    /// Everything written while [`Device::Worker`] was selected.
    pub worker: String,
    /// Number of device switches observed.
    pub switches: usize,
}

#[cfg(feature = "std")]
impl Transcript {
    /// An empty transcript on the control device.
    pub fn new() -> Self {
        Self::default()
    }

    /// The device currently selected.
    pub fn device(&self) -> Device {
        self.device
    }
}

#[cfg(feature = "std")]
impl fmt::Write for Transcript {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.device {
            Device::Control => self.control.push_str(s),
            Device::Worker => self.worker.push_str(s),
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl Console for Transcript {
    fn select(&mut self, device: Device) {
        if device != self.device {
            self.switches += 1;
        }
        self.device = device;
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_transcript_routes_by_device() {
        let mut transcript = Transcript::new();
        write!(transcript, "point {}", 3).unwrap();
        transcript.select(Device::Worker);
        transcript.write_char('w').unwrap();
        transcript.select(Device::Control);
        writeln!(transcript, "!").unwrap();

        assert_eq!(transcript.control, "point 3!\n");
        assert_eq!(transcript.worker, "w");
        assert_eq!(transcript.switches, 2);
    }

    #[test]
    fn test_console_through_mut_ref() {
        fn report(mut console: impl Console) {
            console.select(Device::Worker);
            let _ = write!(console, "{:#x}", 255);
        }
        let mut transcript = Transcript::new();
        report(&mut transcript);
        assert_eq!(transcript.worker, "0xff");
        assert_eq!(transcript.device(), Device::Worker);
    }

    #[test]
    fn test_null_console_accepts_everything() {
        let mut console = NullConsole;
        console.select(Device::Worker);
        let value = 42;
        assert!(write!(console, "{:p} {}", &value, value).is_ok());
    }
}
