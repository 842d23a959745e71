//! Root interrupt controller adapter.

use super::{IrqChip, IrqFlags, IrqNumber};
use crate::error::{KernelError, KernelResult};
use common::sync::IrqLock;
use drivers::hal::interrupt::{ConfigurableInterruptController, TriggerMode};

/// The controller the CPU exception is wired to.
pub trait RootChip: IrqChip {
    /// Acknowledge and return the highest-priority pending IRQ.
    fn claim(&self) -> Option<IrqNumber>;

    /// Signal the end of handling of a claimed IRQ.
    fn complete(&self, irq: IrqNumber);

    fn as_irq_chip(&self) -> &dyn IrqChip;
}

/// Wraps a HAL interrupt controller for shared use by the IRQ table.
pub struct RootController<C> {
    inner: IrqLock<C>,
}

impl<C> RootController<C> {
    pub const fn new(controller: C) -> Self {
        Self {
            inner: IrqLock::new(controller),
        }
    }
}

fn trigger_mode(flags: IrqFlags) -> KernelResult<Option<TriggerMode>> {
    let trigger = flags.trigger();

    let mode = if trigger.is_empty() {
        None
    } else if trigger == IrqFlags::TRIGGER_RISING {
        Some(TriggerMode::RisingEdge)
    } else if trigger == IrqFlags::TRIGGER_FALLING {
        Some(TriggerMode::FallingEdge)
    } else if trigger == IrqFlags::TRIGGER_HIGH {
        Some(TriggerMode::LevelHigh)
    } else if trigger == IrqFlags::TRIGGER_LOW {
        Some(TriggerMode::LevelLow)
    } else {
        return Err(KernelError::InvalidArgument);
    };

    Ok(mode)
}

impl<C> IrqChip for RootController<C>
where
    C: ConfigurableInterruptController + Send,
{
    fn set_trigger(&self, irq: IrqNumber, flags: IrqFlags) -> KernelResult<()> {
        // No trigger flags keeps the current configuration.
        let Some(mode) = trigger_mode(flags)? else {
            return Ok(());
        };

        self.inner
            .lock()
            .configure_trigger(irq, mode)
            .map_err(|err| {
                log::error!("irq {}: {:?} trigger rejected: {:?}", irq, mode, err);
                KernelError::NotSupported
            })
    }

    fn mask(&self, irq: IrqNumber) {
        if let Err(err) = self.inner.lock().disable(irq) {
            log::error!("irq {}: mask failed: {:?}", irq, err);
        }
    }

    fn unmask(&self, irq: IrqNumber) {
        if let Err(err) = self.inner.lock().enable(irq) {
            log::error!("irq {}: unmask failed: {:?}", irq, err);
        }
    }
}

impl<C> RootChip for RootController<C>
where
    C: ConfigurableInterruptController + Send,
{
    fn claim(&self) -> Option<IrqNumber> {
        self.inner.lock().acknowledge()
    }

    fn complete(&self, irq: IrqNumber) {
        if let Err(err) = self.inner.lock().end_of_interrupt(irq) {
            log::error!("irq {}: end of interrupt failed: {:?}", irq, err);
        }
    }

    fn as_irq_chip(&self) -> &dyn IrqChip {
        self
    }
}
