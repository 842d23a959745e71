//! i.MX6UL GPIO Controller Driver
//!
//! The SoC has five GPIO banks of up to 32 lines. Lines are addressed by a
//! global number `bank * 32 + offset`, so GPIO4_IO24 is line 120.
//!
//! Each bank signals its events on two combined GIC interrupts, one for
//! offsets 0-15 and one for 16-31.

use crate::hal::gpio::{Direction, EdgeDetect, GpioController, GpioInterrupts, PinLevel};
use crate::hal::interrupt::IrqNumber;
use core::ptr::{read_volatile, write_volatile};

/// Register block base of GPIO1..GPIO5.
pub const GPIO_BASES: [usize; BANKS] = [
    0x0209_C000,
    0x020A_0000,
    0x020A_4000,
    0x020A_8000,
    0x020A_C000,
];

/// Number of GPIO banks.
pub const BANKS: usize = 5;

/// Line numbers reserved per bank.
pub const LINES_PER_BANK: u32 = 32;

/// Lines actually bonded out per bank.
pub const BANK_WIDTH: [u32; BANKS] = [32, 22, 29, 29, 12];

/// Size of the global line number space.
pub const NR_GPIOS: u32 = BANKS as u32 * LINES_PER_BANK;

/// GIC interrupt ID of GPIO1_Combined_0_15 (SPI 66).
pub const GPIO1_COMBINED_IRQ: IrqNumber = 98;

// Register offsets
const DR: usize = 0x00;
const GDIR: usize = 0x04;
const PSR: usize = 0x08;
const ICR1: usize = 0x0C;
const ICR2: usize = 0x10;
const IMR: usize = 0x14;
const ISR: usize = 0x18;
const EDGE_SEL: usize = 0x1C;

/// Interrupt configuration field values (2 bits per line in ICR1/ICR2).
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum IcrMode {
    LowLevel = 0b00,
    RisingEdge = 0b10,
    FallingEdge = 0b11,
}

/// Split a global line number into `(bank, offset)`.
///
/// Returns `None` for lines that do not exist on the package.
pub fn split_line(line: u32) -> Option<(usize, u32)> {
    let bank = (line / LINES_PER_BANK) as usize;
    let offset = line % LINES_PER_BANK;

    if bank < BANKS && offset < BANK_WIDTH[bank] {
        Some((bank, offset))
    } else {
        None
    }
}

/// Valid-line predicate for the i.MX6UL line numbering.
pub fn is_valid_line(line: u32) -> bool {
    split_line(line).is_some()
}

/// Combined GIC interrupt that carries events for `line`.
pub fn bank_irq(line: u32) -> Option<IrqNumber> {
    let (bank, offset) = split_line(line)?;
    Some(GPIO1_COMBINED_IRQ + 2 * bank as u32 + offset / 16)
}

/// i.MX6UL GPIO controller spanning all five banks.
#[derive(Debug)]
pub struct Imx6ulGpio {
    bases: [usize; BANKS],
}

impl Imx6ulGpio {
    /// Create a controller at the SoC's GPIO addresses.
    ///
    /// # Safety
    ///
    /// GPIO registers must be properly mapped and no other
    /// instance may exist.
    pub const unsafe fn new() -> Self {
        unsafe { Self::with_bases(GPIO_BASES) }
    }

    /// Create a controller over arbitrary bank register blocks.
    ///
    /// # Safety
    ///
    /// Every base must point to a 32-byte, 4-byte aligned register block
    /// that stays valid for the lifetime of the controller.
    pub const unsafe fn with_bases(bases: [usize; BANKS]) -> Self {
        Self { bases }
    }

    #[inline]
    fn read_reg(&self, bank: usize, offset: usize) -> u32 {
        unsafe { read_volatile((self.bases[bank] + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, bank: usize, offset: usize, value: u32) {
        unsafe { write_volatile((self.bases[bank] + offset) as *mut u32, value) }
    }

    fn modify_reg(&mut self, bank: usize, offset: usize, clear: u32, set: u32) {
        let value = self.read_reg(bank, offset);
        self.write_reg(bank, offset, (value & !clear) | set);
    }

    fn locate(&self, line: u32) -> Result<(usize, u32), GpioError> {
        split_line(line).ok_or(GpioError::InvalidPin)
    }

    fn set_icr(&mut self, bank: usize, offset: u32, mode: IcrMode) {
        let (reg, shift) = if offset < 16 {
            (ICR1, offset * 2)
        } else {
            (ICR2, (offset - 16) * 2)
        };
        self.modify_reg(bank, reg, 0b11 << shift, (mode as u32) << shift);
    }
}

impl GpioController for Imx6ulGpio {
    type Pin = u32;
    type Error = GpioError;

    fn is_valid(&self, pin: u32) -> bool {
        is_valid_line(pin)
    }

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<(), GpioError> {
        let (bank, offset) = self.locate(pin)?;
        let bit = 1 << offset;

        match direction {
            Direction::Input => self.modify_reg(bank, GDIR, bit, 0),
            Direction::Output => self.modify_reg(bank, GDIR, 0, bit),
        }
        Ok(())
    }

    fn direction(&self, pin: u32) -> Result<Direction, GpioError> {
        let (bank, offset) = self.locate(pin)?;

        Ok(if self.read_reg(bank, GDIR) & (1 << offset) != 0 {
            Direction::Output
        } else {
            Direction::Input
        })
    }

    fn write(&mut self, pin: u32, level: PinLevel) -> Result<(), GpioError> {
        let (bank, offset) = self.locate(pin)?;
        let bit = 1 << offset;

        match level {
            PinLevel::High => self.modify_reg(bank, DR, 0, bit),
            PinLevel::Low => self.modify_reg(bank, DR, bit, 0),
        }
        Ok(())
    }

    fn read(&self, pin: u32) -> Result<PinLevel, GpioError> {
        let (bank, offset) = self.locate(pin)?;
        let bit = 1 << offset;

        // PSR samples the pad; DR holds what an output is driving.
        let reg = if self.read_reg(bank, GDIR) & bit != 0 {
            DR
        } else {
            PSR
        };
        Ok((self.read_reg(bank, reg) & bit != 0).into())
    }
}

impl GpioInterrupts for Imx6ulGpio {
    fn set_edge_detect(&mut self, pin: u32, edge: Option<EdgeDetect>) -> Result<(), GpioError> {
        let (bank, offset) = self.locate(pin)?;
        let bit = 1 << offset;

        // Masked while ICR changes so a half-written mode latches nothing.
        self.modify_reg(bank, IMR, bit, 0);

        let icr = match edge {
            Some(EdgeDetect::Rising) => IcrMode::RisingEdge,
            Some(EdgeDetect::Falling) => IcrMode::FallingEdge,
            Some(EdgeDetect::Both) | None => IcrMode::LowLevel,
        };
        self.set_icr(bank, offset, icr);
        // EDGE_SEL overrides ICR and fires on any transition.
        if edge == Some(EdgeDetect::Both) {
            self.modify_reg(bank, EDGE_SEL, 0, bit);
        } else {
            self.modify_reg(bank, EDGE_SEL, bit, 0);
        }

        self.write_reg(bank, ISR, bit);
        if edge.is_some() {
            self.modify_reg(bank, IMR, 0, bit);
        }
        Ok(())
    }

    fn event_pending(&self, pin: u32) -> Result<bool, GpioError> {
        let (bank, offset) = self.locate(pin)?;
        let bit = 1 << offset;

        Ok(self.read_reg(bank, ISR) & self.read_reg(bank, IMR) & bit != 0)
    }

    fn clear_event(&mut self, pin: u32) -> Result<(), GpioError> {
        let (bank, offset) = self.locate(pin)?;
        // Write-1-to-clear; writing other bits as zero leaves them alone.
        self.write_reg(bank, ISR, 1 << offset);
        Ok(())
    }

    fn parent_irq(&self, pin: u32) -> Option<IrqNumber> {
        bank_irq(pin)
    }
}

/// GPIO errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// The line number is outside every bank.
    InvalidPin,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FakeRegisters;

    const BANK_BYTES: usize = 0x20;

    struct Banks {
        regs: Vec<FakeRegisters>,
    }

    impl Banks {
        fn new() -> Self {
            Self {
                regs: (0..BANKS).map(|_| FakeRegisters::new(BANK_BYTES)).collect(),
            }
        }

        fn gpio(&self) -> Imx6ulGpio {
            let mut bases = [0; BANKS];
            for (base, regs) in bases.iter_mut().zip(&self.regs) {
                *base = regs.base();
            }
            unsafe { Imx6ulGpio::with_bases(bases) }
        }

        fn reg(&self, bank: usize, offset: usize) -> u32 {
            self.regs[bank].read(offset)
        }
    }

    #[test]
    fn line_geometry_matches_the_package() {
        assert_eq!(split_line(0), Some((0, 0)));
        assert_eq!(split_line(120), Some((3, 24)));
        assert!(is_valid_line(31));
        assert!(!is_valid_line(32 + 22), "GPIO2 has 22 lines");
        assert!(is_valid_line(4 * 32 + 11));
        assert!(!is_valid_line(4 * 32 + 12), "GPIO5 has 12 lines");
        assert!(!is_valid_line(NR_GPIOS));
    }

    #[test]
    fn combined_interrupts_split_each_bank_in_halves() {
        assert_eq!(bank_irq(0), Some(98));
        assert_eq!(bank_irq(16), Some(99));
        assert_eq!(bank_irq(32), Some(100));
        assert_eq!(bank_irq(120), Some(105));
        assert_eq!(bank_irq(200), None);
    }

    #[test]
    fn output_drives_data_register_of_the_right_bank() {
        let banks = Banks::new();
        let mut gpio = banks.gpio();

        gpio.set_direction(120, Direction::Output).unwrap();
        gpio.write(120, PinLevel::High).unwrap();

        assert_eq!(banks.reg(3, GDIR), 1 << 24);
        assert_eq!(banks.reg(3, DR), 1 << 24);
        assert_eq!(gpio.direction(120), Ok(Direction::Output));
        assert_eq!(gpio.read(120), Ok(PinLevel::High));

        gpio.write(120, PinLevel::Low).unwrap();
        assert_eq!(banks.reg(3, DR), 0);
        assert_eq!(banks.reg(0, DR), 0, "other banks untouched");
    }

    #[test]
    fn input_reads_pad_status() {
        let banks = Banks::new();
        let mut gpio = banks.gpio();

        gpio.set_direction(0, Direction::Input).unwrap();
        assert_eq!(gpio.read(0), Ok(PinLevel::Low));

        banks.regs[0].write(PSR, 1);
        assert_eq!(gpio.read(0), Ok(PinLevel::High));
        assert_eq!(gpio.direction(0), Ok(Direction::Input));
    }

    #[test]
    fn rising_edge_programs_icr_and_unmasks() {
        let banks = Banks::new();
        let mut gpio = banks.gpio();

        gpio.set_edge_detect(0, Some(EdgeDetect::Rising)).unwrap();
        assert_eq!(banks.reg(0, ICR1) & 0b11, 0b10);
        assert_eq!(banks.reg(0, IMR), 1);

        gpio.set_edge_detect(120, Some(EdgeDetect::Falling)).unwrap();
        assert_eq!((banks.reg(3, ICR2) >> 16) & 0b11, 0b11);

        gpio.set_edge_detect(5, Some(EdgeDetect::Both)).unwrap();
        assert_eq!(banks.reg(0, EDGE_SEL), 1 << 5);

        gpio.set_edge_detect(0, None).unwrap();
        assert_eq!(banks.reg(0, IMR), 1 << 5);
        assert_eq!(banks.reg(0, ICR1) & 0b11, 0);
    }

    #[test]
    fn pending_events_respect_the_mask() {
        let banks = Banks::new();
        let mut gpio = banks.gpio();

        banks.regs[0].write(ISR, 1);
        assert_eq!(gpio.event_pending(0), Ok(false));

        gpio.set_edge_detect(0, Some(EdgeDetect::Rising)).unwrap();
        banks.regs[0].write(ISR, 1);
        assert_eq!(gpio.event_pending(0), Ok(true));
        assert_eq!(gpio.take_event(0), Ok(true));
    }

    #[test]
    fn invalid_lines_are_rejected() {
        let banks = Banks::new();
        let mut gpio = banks.gpio();

        assert!(!gpio.is_valid(60));
        assert_eq!(gpio.write(60, PinLevel::High), Err(GpioError::InvalidPin));
        assert_eq!(gpio.parent_irq(60), None);
        assert_eq!(gpio.set_debounce(0, 200_000), Ok(false));
    }
}
