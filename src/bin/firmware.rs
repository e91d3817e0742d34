//! # Offrect Firmware
//!
//! Bare-metal image for a single-core Cortex-M4 part. The worker pool is
//! simulated on the control core ([`InlinePool`](offrect::scheduler::InlinePool)),
//! so the protocol runs unchanged against one physical core.
//!
//! | Collaborator | Implementation                       |
//! |--------------|--------------------------------------|
//! | Ingestion    | polygon baked into flash as lines    |
//! | Diagnostics  | ITM port 0 (control), 1 (worker)     |
//! | Timing       | DWT cycle counter                    |
//!
//! Build with `--no-default-features --features firmware` for
//! `thumbv7em-none-eabihf`.

#![no_std]
#![no_main]

use core::fmt::Write;

use cortex_m_rt::entry;
use panic_halt as _;

use offrect::arch::cortex_m4::{self, DwtClock, ItmConsole};
use offrect::config::NCPU;
use offrect::ingest;
use offrect::kernel;
use offrect::stats::{Clock, FrozenClock, Timestamp};

/// Boundary fed to the ingestion front end, one line per point, closed by
/// the lone-integer end marker.
static INPUT: &[&str] = &[
    "0,0", "0,10", "5,10", "5,5", "10,5", "10,0", "0",
];

/// Either the DWT counter or, on parts without one, a frozen clock.
enum BoardClock {
    Dwt(DwtClock),
    Frozen(FrozenClock),
}

impl Clock for BoardClock {
    fn now(&self) -> Timestamp {
        match self {
            BoardClock::Dwt(clock) => clock.now(),
            BoardClock::Frozen(clock) => clock.now(),
        }
    }
}

#[entry]
fn main() -> ! {
    // Taken exactly once, right after reset.
    let Some(mut core_peripherals) = cortex_m::Peripherals::take() else {
        cortex_m4::idle_forever();
    };

    let clock = match DwtClock::start(&mut core_peripherals.DCB, &mut core_peripherals.DWT) {
        Some(dwt) => BoardClock::Dwt(dwt),
        None => BoardClock::Frozen(FrozenClock),
    };
    let mut console = ItmConsole::new(core_peripherals.ITM);

    let outcome = ingest::ingest_lines(INPUT.iter().copied(), &mut console)
        .and_then(|boundary| kernel::search_inline::<NCPU, _, _>(&boundary, &mut console, &clock));
    if let Err(fault) = outcome {
        let _ = writeln!(console, "fault: {fault}");
    }

    cortex_m4::idle_forever()
}
