//! GPIO line library.
//!
//! Owns the platform GPIO controller and hands out exclusive line handles.
//! Every line has a descriptor holding its owner label, its export state and
//! its interrupt configuration.

pub mod chip;
pub mod irq;
pub mod line;
pub mod sysfs;

pub use chip::GpioChip;
pub use line::{GpioLine, InputLine, OutputLine};
pub use sysfs::Sysfs;

use crate::error::{KernelError, KernelResult};
use crate::irq::{GPIO_IRQ_BASE, IrqNumber};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use common::sync::IrqLock;
use drivers::hal::gpio::EdgeDetect;
use drivers::hal::timer::CountingTimer;

/// Size of the global GPIO line number space.
pub const NR_GPIOS: u32 = 160;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Export {
    pub(crate) direction_may_change: bool,
}

#[derive(Debug, Default)]
pub(crate) struct LineDesc {
    pub(crate) label: Option<&'static str>,
    pub(crate) export: Option<Export>,
    pub(crate) debounce_us: u32,
    pub(crate) soft_debounce: bool,
    pub(crate) last_edge_us: Option<u64>,
    pub(crate) irq_edge: Option<EdgeDetect>,
}

/// GPIO line library.
pub struct GpioLib {
    chip: IrqLock<Box<dyn GpioChip>>,
    lines: IrqLock<Vec<LineDesc>>,
    clock: &'static (dyn CountingTimer + Sync),
}

impl GpioLib {
    pub fn new(chip: Box<dyn GpioChip>, clock: &'static (dyn CountingTimer + Sync)) -> Self {
        Self {
            chip: IrqLock::new(chip),
            lines: IrqLock::new((0..NR_GPIOS).map(|_| LineDesc::default()).collect()),
            clock,
        }
    }

    pub(crate) fn with_chip<R>(&self, f: impl FnOnce(&mut dyn GpioChip) -> R) -> R {
        let mut chip = self.chip.lock();
        f(chip.as_mut())
    }

    pub(crate) fn with_line<R>(&self, line: u32, f: impl FnOnce(&mut LineDesc) -> R) -> R {
        let mut lines = self.lines.lock();
        f(&mut lines[line as usize])
    }

    /// Whether `line` exists on this platform.
    pub fn is_valid(&self, line: u32) -> bool {
        line < NR_GPIOS && self.chip.lock().is_valid(line)
    }

    /// Take exclusive ownership of `line`.
    pub fn request(&self, line: u32, label: &'static str) -> KernelResult<GpioLine<'_>> {
        if !self.is_valid(line) {
            log::warn!("gpio{}: {} requested a line that does not exist", line, label);
            return Err(KernelError::InvalidArgument);
        }

        self.with_line(line, |desc| match desc.label {
            Some(owner) => {
                log::warn!("gpio{}: {} busy, held by {}", line, label, owner);
                Err(KernelError::Busy)
            }
            None => {
                desc.label = Some(label);
                Ok(())
            }
        })?;

        log::debug!("gpio{}: requested by {}", line, label);
        Ok(GpioLine::new(self, line))
    }

    /// Drop the holder's label, export and debounce settings.
    ///
    /// The interrupt trigger belongs to the IRQ registration and outlives the
    /// line holder.
    pub(crate) fn release(&self, line: u32) {
        let desc = self.with_line(line, |desc| {
            let irq_edge = desc.irq_edge;
            let released = core::mem::take(desc);
            desc.irq_edge = irq_edge;
            released
        });

        if desc.export.is_some() {
            log::debug!("gpio{}: unexported on release", line);
        }
        log::debug!("gpio{}: released by {}", line, desc.label.unwrap_or("?"));
    }

    pub fn is_requested(&self, line: u32) -> bool {
        self.label(line).is_some()
    }

    /// Owner label of a requested line.
    pub fn label(&self, line: u32) -> Option<&'static str> {
        if line >= NR_GPIOS {
            return None;
        }
        self.with_line(line, |desc| desc.label)
    }

    /// Virtual IRQ number of `line`.
    pub fn to_irq(&self, line: u32) -> KernelResult<IrqNumber> {
        if self.is_valid(line) {
            Ok(GPIO_IRQ_BASE + line)
        } else {
            Err(KernelError::InvalidArgument)
        }
    }

    /// Line behind a virtual GPIO IRQ number.
    pub fn irq_to_line(&self, irq: IrqNumber) -> Option<u32> {
        let line = irq.checked_sub(GPIO_IRQ_BASE)?;
        self.is_valid(line).then_some(line)
    }

    /// Debounce interval in effect for `line`, in microseconds.
    pub fn debounce_us(&self, line: u32) -> u32 {
        if line >= NR_GPIOS {
            return 0;
        }
        self.with_line(line, |desc| desc.debounce_us)
    }

    /// The exported-line view.
    pub fn sysfs(&self) -> Sysfs<'_> {
        Sysfs::new(self)
    }

    /// Valid lines grouped by the root IRQ their events arrive on.
    pub fn banks(&self) -> BTreeMap<IrqNumber, Vec<u32>> {
        let chip = self.chip.lock();
        let mut banks: BTreeMap<IrqNumber, Vec<u32>> = BTreeMap::new();

        for line in (0..NR_GPIOS).filter(|&line| chip.is_valid(line)) {
            if let Some(parent) = chip.parent_irq(line) {
                banks.entry(parent).or_default().push(line);
            }
        }
        banks
    }

    /// Software debounce filter for an edge acknowledged on `line`.
    ///
    /// Returns `false` for edges arriving within the debounce interval of the
    /// last accepted edge.
    pub(crate) fn accept_edge(&self, line: u32) -> bool {
        let now = self.clock.now_us();

        self.with_line(line, |desc| {
            if !desc.soft_debounce {
                return true;
            }
            if let Some(last) = desc.last_edge_us {
                if now.saturating_sub(last) < u64::from(desc.debounce_us) {
                    return false;
                }
            }
            desc.last_edge_us = Some(now);
            true
        })
    }
}
