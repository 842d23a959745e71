//! Peripheral drivers for the VAR-DART-6UL.
//!
//! - [`hal`]: interfaces used by the kernel
//! - [`platform`]: the i.MX6UL register-level drivers, picked by feature
//! - `sim`: a simulated board for host tests (`sim` feature)
//!
//! # Example
//!
//! ```no_run
//! use drivers::hal::gpio::{Direction, GpioController, PinLevel};
//! use drivers::platform::imx6ul::gpio::Imx6ulGpio;
//!
//! let mut gpio = unsafe { Imx6ulGpio::new() };
//! gpio.set_direction(120, Direction::Output).unwrap();
//! gpio.write(120, PinLevel::High).unwrap();
//! ```

#![cfg_attr(not(any(test, feature = "sim")), no_std)]

pub mod hal;
pub mod platform;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use hal::gpio::{Direction, EdgeDetect, GpioController, GpioInterrupts, PinLevel};
pub use hal::interrupt::{InterruptController, IrqNumber};
pub use hal::serial::{SerialConfig, SerialPort};
pub use hal::timer::CountingTimer;
