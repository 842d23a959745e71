//! Interrupt line management.
//!
//! IRQ numbers below [`NR_HW_IRQS`] are IDs of the root interrupt
//! controller. GPIO lines get virtual numbers from [`GPIO_IRQ_BASE`] on,
//! delivered by the bank demultiplexer in [`crate::gpio::irq`].

pub mod controller;
pub mod dispatch;
pub mod handlers;
#[cfg(test)]
pub(crate) mod testing;

pub use controller::{RootChip, RootController};
pub use drivers::hal::interrupt::IrqNumber;
pub use handlers::{IrqTable, Registration};

use crate::error::KernelResult;
use bitflags::bitflags;

/// IDs handled by the root interrupt controller.
pub const NR_HW_IRQS: IrqNumber = 160;

/// First virtual IRQ; GPIO line `n` interrupts as `GPIO_IRQ_BASE + n`.
pub const GPIO_IRQ_BASE: IrqNumber = NR_HW_IRQS;

/// Size of the IRQ number space.
pub const NR_IRQS: IrqNumber = GPIO_IRQ_BASE + crate::gpio::NR_GPIOS;

bitflags! {
    /// Request flags for [`IrqTable::request`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags: u32 {
        const TRIGGER_RISING  = 1 << 0;
        const TRIGGER_FALLING = 1 << 1;
        const TRIGGER_HIGH    = 1 << 2;
        const TRIGGER_LOW     = 1 << 3;

        /// Line may be shared with other actions that also set this flag.
        const SHARED          = 1 << 7;
    }
}

impl IrqFlags {
    pub const TRIGGER_MASK: IrqFlags = IrqFlags::TRIGGER_RISING
        .union(IrqFlags::TRIGGER_FALLING)
        .union(IrqFlags::TRIGGER_HIGH)
        .union(IrqFlags::TRIGGER_LOW);

    /// Only the trigger bits.
    pub fn trigger(self) -> IrqFlags {
        self.intersection(Self::TRIGGER_MASK)
    }
}

/// Result of running a handler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IrqReturn {
    /// The interrupt was not from this handler's device.
    None,
    Handled,
}

/// Interrupt handler.
///
/// The implementing object is the handler's context; it is shared with the
/// IRQ table for as long as the registration lives.
pub trait IrqHandler: Send + Sync {
    fn handle(&self, irq: IrqNumber) -> IrqReturn;
}

/// Controller behind a range of IRQ numbers.
pub trait IrqChip: Send + Sync {
    /// Program the trigger condition of `irq`.
    fn set_trigger(&self, irq: IrqNumber, flags: IrqFlags) -> KernelResult<()>;

    /// Stop `irq` from being delivered.
    fn mask(&self, irq: IrqNumber);

    /// Allow `irq` to be delivered.
    fn unmask(&self, irq: IrqNumber);
}
