//! Console UART interface.
//!
//! Ports are polled and transmit only. [`SerialWriter`] turns one into a
//! `core::fmt::Write` sink for the kernel logger.

use core::fmt;

/// Parity bit setting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

/// Line settings of a console port.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    /// 7-bit characters instead of 8.
    pub seven_bit: bool,
    pub parity: Parity,
    pub two_stop_bits: bool,
}

impl SerialConfig {
    /// 115200 baud, 8N1: what the board's boot loader leaves on UART1.
    pub const CONSOLE: Self = Self {
        baud_rate: 115_200,
        seven_bit: false,
        parity: Parity::None,
        two_stop_bits: false,
    };

    /// Console framing at another baud rate.
    pub const fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::CONSOLE
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::CONSOLE
    }
}

pub trait SerialPort {
    type Error: fmt::Debug;

    /// Reset the port and apply `config`. Must precede any write.
    fn configure(&mut self, config: SerialConfig) -> Result<(), Self::Error>;

    /// Queue one byte, waiting for room in the transmit FIFO.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Wait until the transmitter is idle.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// `fmt::Write` over a serial port, sending `\n` as `\r\n`.
pub struct SerialWriter<T>(pub T);

impl<T: SerialPort> SerialWriter<T> {
    fn put(&mut self, byte: u8) -> fmt::Result {
        self.0.write_byte(byte).map_err(|_| fmt::Error)
    }
}

impl<T: SerialPort> fmt::Write for SerialWriter<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.bytes().try_for_each(|byte| {
            if byte == b'\n' {
                self.put(b'\r')?;
            }
            self.put(byte)
        })
    }
}
