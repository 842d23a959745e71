//! User-visible view of exported lines.
//!
//! Mirrors the `/sys/class/gpio/gpioN/{value,direction}` attributes: only
//! exported lines are visible, inputs are read-only, and the direction is
//! fixed unless the exporter allowed it to change.

use super::{Export, GpioLib};
use crate::error::{KernelError, KernelResult};
use alloc::vec::Vec;
use drivers::hal::gpio::{Direction, PinLevel};

pub struct Sysfs<'a> {
    lib: &'a GpioLib,
}

impl<'a> Sysfs<'a> {
    pub(super) fn new(lib: &'a GpioLib) -> Self {
        Self { lib }
    }

    fn export(&self, line: u32) -> KernelResult<Export> {
        if !self.lib.is_valid(line) {
            return Err(KernelError::NotFound);
        }
        self.lib
            .with_line(line, |desc| desc.export)
            .ok_or(KernelError::NotFound)
    }

    /// Exported line numbers, ascending.
    pub fn exported(&self) -> Vec<u32> {
        (0..super::NR_GPIOS)
            .filter(|&line| self.export(line).is_ok())
            .collect()
    }

    /// `value` attribute: 0 or 1.
    pub fn read_value(&self, line: u32) -> KernelResult<u8> {
        self.export(line)?;
        let level = self.lib.with_chip(|chip| chip.get(line))?;
        Ok(level.as_u8())
    }

    /// Write the `value` attribute. Any non-zero value drives high.
    pub fn write_value(&self, line: u32, value: u8) -> KernelResult<()> {
        self.export(line)?;
        if self.direction(line)? == Direction::Input {
            return Err(KernelError::PermissionDenied);
        }
        self.lib
            .with_chip(|chip| chip.set(line, PinLevel::from(value != 0)))
    }

    /// `direction` attribute.
    pub fn direction(&self, line: u32) -> KernelResult<Direction> {
        self.export(line)?;
        self.lib.with_chip(|chip| chip.direction(line))
    }

    /// Write the `direction` attribute. A line switched to output starts low.
    pub fn set_direction(&self, line: u32, direction: Direction) -> KernelResult<()> {
        if !self.export(line)?.direction_may_change {
            return Err(KernelError::PermissionDenied);
        }
        self.lib.with_chip(|chip| match direction {
            Direction::Input => chip.direction_input(line),
            Direction::Output => chip.direction_output(line, PinLevel::Low),
        })
    }
}
