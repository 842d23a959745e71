//! Object-safe view of a GPIO controller.

use crate::error::{KernelError, KernelResult};
use crate::irq::IrqNumber;
use core::fmt::Debug;
use drivers::hal::gpio::{Direction, EdgeDetect, GpioController, GpioInterrupts, PinLevel};

/// GPIO controller as seen by [`GpioLib`](super::GpioLib).
///
/// Lines are global numbers. Controller errors are logged here and surface
/// as [`KernelError::Io`].
pub trait GpioChip: Send {
    fn is_valid(&self, line: u32) -> bool;

    fn direction_input(&mut self, line: u32) -> KernelResult<()>;

    /// Latch `level` and then switch the line to output.
    fn direction_output(&mut self, line: u32, level: PinLevel) -> KernelResult<()>;

    fn direction(&self, line: u32) -> KernelResult<Direction>;

    fn get(&self, line: u32) -> KernelResult<PinLevel>;

    fn set(&mut self, line: u32, level: PinLevel) -> KernelResult<()>;

    /// Returns whether the controller filters in hardware.
    fn set_debounce(&mut self, line: u32, debounce_us: u32) -> KernelResult<bool>;

    /// Enable detection of `edge`, or disable detection with `None`.
    fn set_edge(&mut self, line: u32, edge: Option<EdgeDetect>) -> KernelResult<()>;

    /// Acknowledge a latched event. Returns whether there was one.
    fn take_event(&mut self, line: u32) -> KernelResult<bool>;

    fn parent_irq(&self, line: u32) -> Option<IrqNumber>;
}

fn io<E: Debug>(line: u32, op: &'static str) -> impl FnOnce(E) -> KernelError {
    move |err| {
        log::error!("gpio{}: {} failed: {:?}", line, op, err);
        KernelError::Io
    }
}

impl<T> GpioChip for T
where
    T: GpioInterrupts<Pin = u32> + Send,
{
    fn is_valid(&self, line: u32) -> bool {
        GpioController::is_valid(self, line)
    }

    fn direction_input(&mut self, line: u32) -> KernelResult<()> {
        self.set_direction(line, Direction::Input)
            .map_err(io(line, "direction_input"))
    }

    fn direction_output(&mut self, line: u32, level: PinLevel) -> KernelResult<()> {
        GpioController::write(self, line, level).map_err(io(line, "set"))?;
        self.set_direction(line, Direction::Output)
            .map_err(io(line, "direction_output"))
    }

    fn direction(&self, line: u32) -> KernelResult<Direction> {
        GpioController::direction(self, line).map_err(io(line, "direction"))
    }

    fn get(&self, line: u32) -> KernelResult<PinLevel> {
        GpioController::read(self, line).map_err(io(line, "get"))
    }

    fn set(&mut self, line: u32, level: PinLevel) -> KernelResult<()> {
        GpioController::write(self, line, level).map_err(io(line, "set"))
    }

    fn set_debounce(&mut self, line: u32, debounce_us: u32) -> KernelResult<bool> {
        GpioController::set_debounce(self, line, debounce_us).map_err(io(line, "set_debounce"))
    }

    fn set_edge(&mut self, line: u32, edge: Option<EdgeDetect>) -> KernelResult<()> {
        self.set_edge_detect(line, edge).map_err(io(line, "set_edge"))
    }

    fn take_event(&mut self, line: u32) -> KernelResult<bool> {
        GpioInterrupts::take_event(self, line).map_err(io(line, "take_event"))
    }

    fn parent_irq(&self, line: u32) -> Option<IrqNumber> {
        GpioInterrupts::parent_irq(self, line)
    }
}
