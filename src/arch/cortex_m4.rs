//! # Cortex-M4 Port Layer
//!
//! Hardware-specific collaborators for the ARM Cortex-M4 (Thumb-2):
//! the timing counters and the diagnostics output.
//!
//! ## Timing
//!
//! The DWT unit provides a free-running 32-bit cycle counter (`CYCCNT`),
//! enabled through the trace-enable bit in the DCB's `DEMCR`. The core has
//! no retired-instruction counter, so the throughput line prints `n/a`
//! instructions. [`DwtClock`] extends `CYCCNT` to 64 bits by counting
//! wraps between readings; readings further apart than one counter period
//! (2³² cycles, ~25 s at 168 MHz) under-report.
//!
//! ## Diagnostics
//!
//! Text goes out through ITM stimulus ports, one port per device:
//!
//! | Device            | ITM port |
//! |-------------------|----------|
//! | `Device::Control` | 0        |
//! | `Device::Worker`  | 1        |

use core::cell::Cell;
use core::fmt;

use cortex_m::peripheral::{DCB, DWT, ITM};

use crate::diag::{Console, Device};
use crate::stats::{Clock, Timestamp};

// ---------------------------------------------------------------------------
// DWT cycle counter
// ---------------------------------------------------------------------------

/// [`Clock`] backed by the DWT cycle counter.
pub struct DwtClock {
    last: Cell<u32>,
    epoch: Cell<u64>,
}

impl DwtClock {
    /// Enable tracing and start the cycle counter.
    ///
    /// Returns `None` on parts built without a cycle counter.
    pub fn start(dcb: &mut DCB, dwt: &mut DWT) -> Option<Self> {
        if !dwt.has_cycle_counter() {
            return None;
        }
        dcb.enable_trace();
        dwt.enable_cycle_counter();
        Some(Self {
            last: Cell::new(DWT::cycle_count()),
            epoch: Cell::new(0),
        })
    }
}

impl Clock for DwtClock {
    fn now(&self) -> Timestamp {
        let count = DWT::cycle_count();
        if count < self.last.get() {
            self.epoch.set(self.epoch.get() + (1 << 32));
        }
        self.last.set(count);
        Timestamp {
            cycles: self.epoch.get() | u64::from(count),
            instret: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ITM console
// ---------------------------------------------------------------------------

/// [`Console`] writing to ITM stimulus port 0 (control) or 1 (worker).
pub struct ItmConsole {
    itm: ITM,
    port: usize,
}

impl ItmConsole {
    /// Take ownership of the ITM, starting on the control port.
    pub fn new(itm: ITM) -> Self {
        Self { itm, port: 0 }
    }
}

impl fmt::Write for ItmConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        cortex_m::itm::write_str(&mut self.itm.stim[self.port], s);
        Ok(())
    }
}

impl Console for ItmConsole {
    fn select(&mut self, device: Device) {
        self.port = match device {
            Device::Control => 0,
            Device::Worker => 1,
        };
    }
}

// ---------------------------------------------------------------------------
// Halt
// ---------------------------------------------------------------------------

/// Park the core after the run. Does not return.
pub fn idle_forever() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
