//! i.MX UART Driver (transmit only)
//!
//! Polled output for the debug console. The reference clock is
//! PLL3 / 6 = 80 MHz with the internal divider set to 1.

use crate::hal::serial::{Parity, SerialConfig, SerialPort};
use core::ptr::{read_volatile, write_volatile};

/// UART reference clock
const UART_CLOCK_HZ: u32 = 80_000_000;

// Register offsets
const UTXD: usize = 0x40;
const UCR1: usize = 0x80;
const UCR2: usize = 0x84;
const UCR3: usize = 0x88;
const UFCR: usize = 0x90;
const USR2: usize = 0x98;
const UBIR: usize = 0xA4;
const UBMR: usize = 0xA8;
const UTS: usize = 0xB4;

// Control Register 1 bits
const UCR1_UARTEN: u32 = 1 << 0;

// Control Register 2 bits
const UCR2_SRST: u32 = 1 << 0;
const UCR2_TXEN: u32 = 1 << 2;
const UCR2_WS: u32 = 1 << 5;
const UCR2_STPB: u32 = 1 << 6;
const UCR2_PROE: u32 = 1 << 7;
const UCR2_PREN: u32 = 1 << 8;
const UCR2_IRTS: u32 = 1 << 14;

// Control Register 3 bits
const UCR3_RXDMUXSEL: u32 = 1 << 2;

// FIFO control: reference divider /1, TX trigger 2 chars
const UFCR_RFDIV_1: u32 = 0b101 << 7;
const UFCR_TXTL_2: u32 = 2 << 10;

// Status bits
const USR2_TXDC: u32 = 1 << 3;
const UTS_TXFULL: u32 = 1 << 4;

/// i.MX UART driver.
#[derive(Debug)]
pub struct Imx6ulUart {
    base: usize,
}

impl Imx6ulUart {
    /// Create a new UART instance.
    ///
    /// # Safety
    ///
    /// - `base` must point to a valid i.MX UART peripheral
    /// - Only one instance should exist per UART hardware
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

impl SerialPort for Imx6ulUart {
    type Error = UartError;

    fn configure(&mut self, config: SerialConfig) -> Result<(), UartError> {
        if config.baud_rate == 0 || config.baud_rate > UART_CLOCK_HZ / 16 {
            return Err(UartError::InvalidBaudRate);
        }

        self.write_reg(UCR1, 0);
        self.write_reg(UCR2, UCR2_SRST);

        let mut ucr2 = UCR2_SRST | UCR2_TXEN | UCR2_IRTS;
        if !config.seven_bit {
            ucr2 |= UCR2_WS;
        }
        if config.two_stop_bits {
            ucr2 |= UCR2_STPB;
        }
        match config.parity {
            Parity::None => {}
            Parity::Even => ucr2 |= UCR2_PREN,
            Parity::Odd => ucr2 |= UCR2_PREN | UCR2_PROE,
        }

        // baud = ref / (16 * (UBMR + 1) / (UBIR + 1)); with UBIR = 15 the
        // ratio collapses to ref / (UBMR + 1).
        self.write_reg(UFCR, UFCR_RFDIV_1 | UFCR_TXTL_2);
        self.write_reg(UBIR, 15);
        self.write_reg(UBMR, UART_CLOCK_HZ / config.baud_rate - 1);

        self.write_reg(UCR3, UCR3_RXDMUXSEL);
        self.write_reg(UCR2, ucr2);
        self.write_reg(UCR1, UCR1_UARTEN);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), UartError> {
        while self.read_reg(UTS) & UTS_TXFULL != 0 {
            core::hint::spin_loop();
        }
        self.write_reg(UTXD, u32::from(byte));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), UartError> {
        while self.read_reg(USR2) & USR2_TXDC == 0 {
            core::hint::spin_loop();
        }
        Ok(())
    }
}

/// UART errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UartError {
    /// Baud rate cannot be derived from the reference clock.
    InvalidBaudRate,
}
