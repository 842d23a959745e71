//! NXP i.MX6UL platform (Variscite VAR-DART-6UL).

pub mod gic;
pub mod gpio;
pub mod gpt;
pub mod uart;

use super::Platform;
use gic::Gic;
use gpio::Imx6ulGpio;
use gpt::Gpt;
use uart::Imx6ulUart;

/// GIC-400 distributor.
pub const GICD_BASE: usize = 0x00A0_1000;
/// GIC-400 CPU interface.
pub const GICC_BASE: usize = 0x00A0_2000;
/// General purpose timer 1.
pub const GPT1_BASE: usize = 0x0209_8000;
/// UART1, routed to the debug console on the DART carrier.
pub const UART1_BASE: usize = 0x0202_0000;

pub struct Imx6ulPlatform;

impl Platform for Imx6ulPlatform {
    type Gpio = Imx6ulGpio;
    type Intc = Gic;
    type Clock = Gpt;
    type Console = Imx6ulUart;

    fn name() -> &'static str {
        "NXP i.MX6UL (VAR-DART-6UL)"
    }

    unsafe fn gpio() -> Imx6ulGpio {
        unsafe { Imx6ulGpio::new() }
    }

    unsafe fn interrupt_controller() -> Gic {
        let mut gic = unsafe { Gic::new(GICD_BASE, GICC_BASE) };
        gic.init();
        gic
    }

    unsafe fn clock() -> Gpt {
        let mut gpt = unsafe { Gpt::new(GPT1_BASE) };
        gpt.start();
        gpt
    }

    unsafe fn console() -> Imx6ulUart {
        unsafe { Imx6ulUart::new(UART1_BASE) }
    }
}
