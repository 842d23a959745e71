//! Kernel services for loadable drivers.
//!
//! - `irq`: interrupt descriptors, request/free and dispatch
//! - `gpio`: line ownership, direction, debounce, export view and the
//!   GPIO interrupt chip
//! - `module`: load/unload state machine for driver modules
//! - `system`: wiring of the above onto a platform

#![cfg_attr(not(any(test, feature = "sim")), no_std)]

extern crate alloc;

pub mod arch;
pub mod error;
pub mod gpio;
pub mod irq;
pub mod logger;
pub mod module;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod system;

pub use error::{KernelError, KernelResult};
pub use system::System;
