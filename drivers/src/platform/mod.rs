//! Platform Abstraction Layer
//!
//! Each supported SoC implements the [`Platform`] trait, which hands out
//! its peripheral drivers already brought out of reset.
//!
//! # Usage
//!
//! ```rust,ignore
//! use drivers::platform::{CurrentPlatform as Board, Platform};
//!
//! let gpio = unsafe { Board::gpio() };
//! let intc = unsafe { Board::interrupt_controller() };
//! ```

use crate::hal::gpio::GpioInterrupts;
use crate::hal::interrupt::ConfigurableInterruptController;
use crate::hal::serial::SerialPort;
use crate::hal::timer::CountingTimer;

/// Platform trait - implemented by each supported platform
pub trait Platform {
    /// GPIO controller covering every bank, addressed by global line number.
    type Gpio: GpioInterrupts<Pin = u32> + Send + 'static;
    /// Top-level interrupt controller.
    type Intc: ConfigurableInterruptController + Send + 'static;
    /// Monotonic microsecond clock.
    type Clock: CountingTimer + Sync + 'static;
    /// Console UART.
    type Console: SerialPort + Send + 'static;

    /// Platform name for debugging
    fn name() -> &'static str;

    /// GPIO controller.
    ///
    /// # Safety
    /// GPIO registers must be mapped, and only one instance may exist.
    unsafe fn gpio() -> Self::Gpio;

    /// Interrupt controller, with distributor and CPU interface enabled.
    ///
    /// # Safety
    /// Must only be called once.
    unsafe fn interrupt_controller() -> Self::Intc;

    /// Running system clock.
    ///
    /// # Safety
    /// Must only be called once.
    unsafe fn clock() -> Self::Clock;

    /// Console UART; the caller configures it.
    ///
    /// # Safety
    /// Must only be called once.
    unsafe fn console() -> Self::Console;
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "imx6ul")] {
        pub mod imx6ul;
        pub use imx6ul::Imx6ulPlatform as CurrentPlatform;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features imx6ul"
        );
    }
}
