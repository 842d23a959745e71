//! Platform services handed to driver modules.

use crate::error::KernelResult;
use crate::gpio::irq::BankDemux;
use crate::gpio::{GpioChip, GpioLib};
use crate::irq::{GPIO_IRQ_BASE, IrqFlags, IrqTable, NR_HW_IRQS, NR_IRQS, Registration, RootChip};
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use drivers::hal::timer::CountingTimer;

/// IRQ table, GPIO library and root interrupt controller of one machine.
pub struct System {
    pub irq: IrqTable,
    pub gpio: GpioLib,
    root: Box<dyn RootChip>,
    chained: spin::Once<Vec<Registration<'static>>>,
}

impl System {
    pub fn new(
        root: Box<dyn RootChip>,
        gpio: Box<dyn GpioChip>,
        clock: &'static (dyn CountingTimer + Sync),
    ) -> Self {
        Self {
            irq: IrqTable::new(),
            gpio: GpioLib::new(gpio, clock),
            root,
            chained: spin::Once::new(),
        }
    }

    /// Connect the IRQ table to its controllers and chain a demultiplexer on
    /// every GPIO bank interrupt. Calling it again has no effect.
    pub fn attach(&'static self) -> KernelResult<()> {
        self.chained.try_call_once(|| {
            self.irq.set_chip(0..NR_HW_IRQS, self.root.as_irq_chip());
            self.irq.set_chip(GPIO_IRQ_BASE..NR_IRQS, &self.gpio);

            let mut chained = Vec::new();
            for (parent, lines) in self.gpio.banks() {
                let demux = Arc::new(BankDemux::new(&self.gpio, &self.irq, lines));
                chained.push(self.irq.request(parent, IrqFlags::TRIGGER_HIGH, "gpio-bank", demux)?);
            }

            log::info!("system: {} gpio bank interrupts chained", chained.len());
            Ok(chained)
        })?;
        Ok(())
    }

    /// Service every pending root interrupt. Returns how many were handled.
    pub fn service_interrupts(&self) -> usize {
        let mut serviced = 0;

        while let Some(irq) = self.root.claim() {
            self.irq.dispatch(irq);
            self.root.complete(irq);
            serviced += 1;
        }

        serviced
    }
}
