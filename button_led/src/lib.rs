//! Button/LED interrupt driver for the Variscite VAR-DART-6UL.
//!
//! Every rising edge on the button line toggles the LED line and is counted.
//! The driver is a [`kernel::module::Module`]: it is set up by `init`, driven
//! by the GPIO interrupt while loaded, and torn down by `exit`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod driver;

pub use config::ButtonLedConfig;
pub use driver::ButtonLed;
