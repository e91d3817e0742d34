//! # Architecture Abstraction Layer
//!
//! Hardware ports for the timing and diagnostics collaborators. Hosted
//! builds use [`HostClock`](crate::stats::HostClock) and
//! [`StdConsole`](crate::diag::StdConsole) instead; the Cortex-M4 port is
//! only compiled for bare-metal ARM targets.

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod cortex_m4;
