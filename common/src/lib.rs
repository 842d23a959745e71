//! Low-level primitives shared by the drivers and kernel crates.
//!
//! - [`sync`]: interrupt-safe locking
//! - [`arch`]: per-architecture interrupt masking, selected at build time

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod sync;
