//! Peripheral interfaces the kernel programs against.
//!
//! The i.MX6UL drivers in [`crate::platform`] and the simulated board
//! implement them, so kernel services never touch registers directly.

pub mod gpio;
pub mod interrupt;
pub mod serial;
pub mod timer;
