//! Exclusive GPIO line handles.

use super::{Export, GpioLib};
use crate::error::{KernelError, KernelResult};
use crate::irq::IrqNumber;
use core::fmt;
use core::ops::Deref;
use drivers::hal::gpio::{InputPin, OutputPin, PinLevel, StatefulOutputPin};

/// A requested line. Dropping it releases the line.
pub struct GpioLine<'a> {
    lib: &'a GpioLib,
    line: u32,
}

impl<'a> GpioLine<'a> {
    pub(super) fn new(lib: &'a GpioLib, line: u32) -> Self {
        Self { lib, line }
    }

    /// Drive `level` and switch to output, in that order.
    pub fn into_output(self, level: PinLevel) -> KernelResult<OutputLine<'a>> {
        self.lib
            .with_chip(|chip| chip.direction_output(self.line, level))?;
        Ok(OutputLine(self))
    }

    pub fn into_input(self) -> KernelResult<InputLine<'a>> {
        self.lib.with_chip(|chip| chip.direction_input(self.line))?;
        Ok(InputLine(self))
    }

    /// Current level: driven level for outputs, pad level for inputs.
    pub fn value(&self) -> KernelResult<PinLevel> {
        self.lib.with_chip(|chip| chip.get(self.line))
    }

    /// Virtual IRQ number of this line.
    pub fn to_irq(&self) -> KernelResult<IrqNumber> {
        self.lib.to_irq(self.line)
    }

    /// Publish the line in the [`Sysfs`](super::Sysfs) view.
    ///
    /// With `direction_may_change` false, the view may read and (for
    /// outputs) write the value but not change the direction.
    pub fn export(&self, direction_may_change: bool) -> KernelResult<()> {
        self.lib.with_line(self.line, |desc| {
            if desc.export.is_some() {
                return Err(KernelError::Busy);
            }
            desc.export = Some(Export {
                direction_may_change,
            });
            Ok(())
        })?;

        log::debug!("gpio{}: exported", self.line);
        Ok(())
    }

    pub fn unexport(&self) {
        let was_exported = self
            .lib
            .with_line(self.line, |desc| desc.export.take().is_some());

        if was_exported {
            log::debug!("gpio{}: unexported", self.line);
        } else {
            log::warn!("gpio{}: unexport of a line that is not exported", self.line);
        }
    }

    pub fn is_exported(&self) -> bool {
        self.lib
            .with_line(self.line, |desc| desc.export.is_some())
    }
}

impl Drop for GpioLine<'_> {
    fn drop(&mut self) {
        self.lib.release(self.line);
    }
}

impl fmt::Debug for GpioLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioLine")
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

/// A requested line configured as output.
#[derive(Debug)]
pub struct OutputLine<'a>(GpioLine<'a>);

impl<'a> Deref for OutputLine<'a> {
    type Target = GpioLine<'a>;

    fn deref(&self) -> &GpioLine<'a> {
        &self.0
    }
}

impl OutputPin for OutputLine<'_> {
    type Error = KernelError;

    fn write(&mut self, level: PinLevel) -> KernelResult<()> {
        let line = self.0.line;
        self.0.lib.with_chip(|chip| chip.set(line, level))
    }
}

impl StatefulOutputPin for OutputLine<'_> {
    fn read(&self) -> KernelResult<PinLevel> {
        self.value()
    }
}

/// A requested line configured as input.
#[derive(Debug)]
pub struct InputLine<'a>(GpioLine<'a>);

impl<'a> Deref for InputLine<'a> {
    type Target = GpioLine<'a>;

    fn deref(&self) -> &GpioLine<'a> {
        &self.0
    }
}

impl InputLine<'_> {
    /// Filter bounces shorter than `ms` milliseconds.
    ///
    /// Uses the controller's filter when it has one, otherwise edges are
    /// filtered in the GPIO interrupt path.
    pub fn set_debounce(&self, ms: u32) -> KernelResult<()> {
        let line = self.0.line;
        let debounce_us = ms.saturating_mul(1000);
        let hardware = self
            .0
            .lib
            .with_chip(|chip| chip.set_debounce(line, debounce_us))?;

        self.0.lib.with_line(line, |desc| {
            desc.debounce_us = debounce_us;
            desc.soft_debounce = !hardware && debounce_us > 0;
            desc.last_edge_us = None;
        });

        log::debug!(
            "gpio{}: debounce {} ms ({})",
            line,
            ms,
            if hardware { "hardware" } else { "software" }
        );
        Ok(())
    }
}

impl InputPin for InputLine<'_> {
    type Error = KernelError;

    fn read(&self) -> KernelResult<PinLevel> {
        self.value()
    }
}
