//! ARM GIC-400 Interrupt Controller Driver
//!
//! The i.MX6UL routes all 128 shared peripheral interrupts through a
//! GIC-400. Interrupt IDs 0-31 are banked per core (SGIs/PPIs); peripheral
//! interrupts start at 32.

use crate::hal::interrupt::{
    ConfigurableInterruptController, InterruptController, IrqNumber, TriggerMode,
};
use core::ptr::{read_volatile, write_volatile};

/// Interrupt IDs handled by this GIC (32 private + 128 shared).
pub const GIC_IRQS: IrqNumber = 160;

/// ID returned by the acknowledge register when nothing is pending.
const SPURIOUS_ID: u32 = 1023;

// Distributor register offsets
const GICD_CTLR: usize = 0x000;
const GICD_ISENABLER: usize = 0x100;
const GICD_ICENABLER: usize = 0x180;
const GICD_IPRIORITYR: usize = 0x400;
const GICD_ITARGETSR: usize = 0x800;
const GICD_ICFGR: usize = 0xC00;

// CPU interface register offsets
const GICC_CTLR: usize = 0x00;
const GICC_PMR: usize = 0x04;
const GICC_IAR: usize = 0x0C;
const GICC_EOIR: usize = 0x10;

const DEFAULT_PRIORITY: u8 = 0xA0;
const PRIORITY_MASK_ALL: u32 = 0xF8;
const CPU0_TARGET: u8 = 0x01;

/// GIC-400 driver (distributor + CPU interface of core 0).
#[derive(Debug)]
pub struct Gic {
    dist: usize,
    cpu: usize,
}

impl Gic {
    /// Create a driver over the distributor and CPU interface blocks.
    ///
    /// # Safety
    ///
    /// Both addresses must point to the mapped GIC register blocks and
    /// only one instance may exist.
    pub const unsafe fn new(dist: usize, cpu: usize) -> Self {
        Self { dist, cpu }
    }

    #[inline]
    fn dist_read(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.dist + offset) as *const u32) }
    }

    #[inline]
    fn dist_write(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.dist + offset) as *mut u32, value) }
    }

    #[inline]
    fn dist_write_byte(&mut self, offset: usize, value: u8) {
        unsafe { write_volatile((self.dist + offset) as *mut u8, value) }
    }

    #[inline]
    fn cpu_read(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.cpu + offset) as *const u32) }
    }

    #[inline]
    fn cpu_write(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.cpu + offset) as *mut u32, value) }
    }

    fn check(irq: IrqNumber) -> Result<(), GicError> {
        if irq < GIC_IRQS {
            Ok(())
        } else {
            Err(GicError::InvalidIrq)
        }
    }

    /// Bring up the distributor and the CPU interface.
    ///
    /// All shared interrupts start disabled, routed to core 0 at a
    /// common priority.
    pub fn init(&mut self) {
        self.dist_write(GICD_CTLR, 0);

        for word in 1..(GIC_IRQS as usize / 32) {
            self.dist_write(GICD_ICENABLER + word * 4, u32::MAX);
        }
        for irq in 32..GIC_IRQS as usize {
            self.dist_write_byte(GICD_IPRIORITYR + irq, DEFAULT_PRIORITY);
            self.dist_write_byte(GICD_ITARGETSR + irq, CPU0_TARGET);
        }

        self.dist_write(GICD_CTLR, 1);
        self.cpu_write(GICC_PMR, PRIORITY_MASK_ALL);
        self.cpu_write(GICC_CTLR, 1);

        log::debug!("gic: {} interrupt lines online", GIC_IRQS);
    }
}

impl InterruptController for Gic {
    type Error = GicError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), GicError> {
        Self::check(irq)?;
        let word = (irq / 32) as usize;
        self.dist_write(GICD_ISENABLER + word * 4, 1 << (irq % 32));
        Ok(())
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), GicError> {
        Self::check(irq)?;
        let word = (irq / 32) as usize;
        self.dist_write(GICD_ICENABLER + word * 4, 1 << (irq % 32));
        Ok(())
    }

    fn acknowledge(&mut self) -> Option<IrqNumber> {
        let id = self.cpu_read(GICC_IAR) & 0x3FF;
        if id == SPURIOUS_ID || id >= GIC_IRQS {
            None
        } else {
            Some(id)
        }
    }

    fn end_of_interrupt(&mut self, irq: IrqNumber) -> Result<(), GicError> {
        Self::check(irq)?;
        self.cpu_write(GICC_EOIR, irq);
        Ok(())
    }
}

impl ConfigurableInterruptController for Gic {
    fn configure_trigger(&mut self, irq: IrqNumber, mode: TriggerMode) -> Result<(), GicError> {
        Self::check(irq)?;

        // Shared peripheral interrupts are either active-high level or
        // rising edge; the GIC has no inverted modes.
        if matches!(mode, TriggerMode::FallingEdge | TriggerMode::LevelLow) {
            return Err(GicError::UnsupportedTrigger);
        }
        let edge = mode.is_edge();

        let offset = GICD_ICFGR + (irq / 16) as usize * 4;
        let bit = 1 << ((irq % 16) * 2 + 1);
        let value = self.dist_read(offset);
        self.dist_write(offset, if edge { value | bit } else { value & !bit });
        Ok(())
    }
}

/// GIC errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GicError {
    /// Interrupt ID beyond the lines this GIC implements.
    InvalidIrq,
    /// Trigger mode the GIC cannot detect.
    UnsupportedTrigger,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FakeRegisters;

    fn gic() -> (FakeRegisters, FakeRegisters, Gic) {
        let dist = FakeRegisters::new(0x1000);
        let cpu = FakeRegisters::new(0x100);
        let gic = unsafe { Gic::new(dist.base(), cpu.base()) };
        (dist, cpu, gic)
    }

    #[test]
    fn init_enables_distributor_and_cpu_interface() {
        let (dist, cpu, mut gic) = gic();
        gic.init();

        assert_eq!(dist.read(GICD_CTLR), 1);
        assert_eq!(cpu.read(GICC_CTLR), 1);
        assert_eq!(cpu.read(GICC_PMR), PRIORITY_MASK_ALL);
        // IRQ 98 sits in byte 2 of ITARGETSR word 24.
        assert_eq!(dist.read(GICD_ITARGETSR + 96) >> 16 & 0xFF, 1);
    }

    #[test]
    fn enable_and_disable_write_set_and_clear_registers() {
        let (dist, _cpu, mut gic) = gic();

        gic.enable(105).unwrap();
        assert_eq!(dist.read(GICD_ISENABLER + 12), 1 << 9);

        gic.disable(105).unwrap();
        assert_eq!(dist.read(GICD_ICENABLER + 12), 1 << 9);

        assert_eq!(gic.enable(GIC_IRQS), Err(GicError::InvalidIrq));
    }

    #[test]
    fn acknowledge_and_end_of_interrupt() {
        let (_dist, cpu, mut gic) = gic();

        cpu.write(GICC_IAR, SPURIOUS_ID);
        assert_eq!(gic.acknowledge(), None);

        cpu.write(GICC_IAR, 98);
        assert_eq!(gic.acknowledge(), Some(98));
        gic.end_of_interrupt(98).unwrap();
        assert_eq!(cpu.read(GICC_EOIR), 98);
    }

    #[test]
    fn trigger_configuration() {
        let (dist, _cpu, mut gic) = gic();

        gic.configure_trigger(98, TriggerMode::RisingEdge).unwrap();
        // 98 / 16 = word 6, field 2 -> bit 5
        assert_eq!(dist.read(GICD_ICFGR + 24), 1 << 5);

        gic.configure_trigger(98, TriggerMode::LevelHigh).unwrap();
        assert_eq!(dist.read(GICD_ICFGR + 24), 0);

        assert_eq!(
            gic.configure_trigger(98, TriggerMode::FallingEdge),
            Err(GicError::UnsupportedTrigger)
        );
    }
}
