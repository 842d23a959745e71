//! IRQ descriptor table and handler registration.

use super::{IrqChip, IrqFlags, IrqHandler, IrqNumber, NR_IRQS};
use crate::error::{KernelError, KernelResult};
use alloc::sync::Arc;
use alloc::vec::Vec;
use common::sync::IrqLock;
use core::ops::Range;
use core::sync::atomic::{AtomicUsize, Ordering};

pub(super) struct IrqAction {
    pub(super) id: usize,
    pub(super) name: &'static str,
    pub(super) flags: IrqFlags,
    pub(super) handler: Arc<dyn IrqHandler>,
}

/// Per-IRQ state.
///
/// `actions` stays locked for the whole time dispatch runs the handlers,
/// which is what makes deregistration wait for a running handler.
pub(super) struct IrqDesc {
    pub(super) chip: spin::Once<&'static dyn IrqChip>,
    pub(super) actions: IrqLock<Vec<IrqAction>>,
    pub(super) count: AtomicUsize,
    pub(super) unhandled: AtomicUsize,
}

impl IrqDesc {
    fn new() -> Self {
        Self {
            chip: spin::Once::new(),
            actions: IrqLock::new(Vec::new()),
            count: AtomicUsize::new(0),
            unhandled: AtomicUsize::new(0),
        }
    }
}

/// Table of every IRQ number the kernel knows about.
pub struct IrqTable {
    descs: Vec<IrqDesc>,
    next_id: AtomicUsize,
}

impl Default for IrqTable {
    fn default() -> Self {
        Self::new()
    }
}

impl IrqTable {
    pub fn new() -> Self {
        Self {
            descs: (0..NR_IRQS).map(|_| IrqDesc::new()).collect(),
            next_id: AtomicUsize::new(0),
        }
    }

    pub(super) fn desc(&self, irq: IrqNumber) -> Option<&IrqDesc> {
        self.descs.get(irq as usize)
    }

    /// Attach `chip` to every IRQ in `range` that has no chip yet.
    pub fn set_chip(&self, range: Range<IrqNumber>, chip: &'static dyn IrqChip) {
        for irq in range {
            if let Some(desc) = self.desc(irq) {
                desc.chip.call_once(|| chip);
            }
        }
    }

    /// Register `handler` on `irq`.
    ///
    /// The first action on a line programs its trigger from `flags` and
    /// unmasks it. A line already in use is only joined when both the
    /// existing and the new action are [`IrqFlags::SHARED`].
    pub fn request(
        &self,
        irq: IrqNumber,
        flags: IrqFlags,
        name: &'static str,
        handler: Arc<dyn IrqHandler>,
    ) -> KernelResult<Registration<'_>> {
        let Some(desc) = self.desc(irq) else {
            log::warn!("irq {}: {} requested an unknown line", irq, name);
            return Err(KernelError::InvalidArgument);
        };
        let Some(&chip) = desc.chip.get() else {
            log::warn!("irq {}: {} requested a line with no controller", irq, name);
            return Err(KernelError::InvalidArgument);
        };

        let mut actions = desc.actions.lock();

        if let Some(owner) = actions.first() {
            let shared = owner.flags.contains(IrqFlags::SHARED) && flags.contains(IrqFlags::SHARED);
            if !shared {
                log::warn!("irq {}: {} busy, held by {}", irq, name, owner.name);
                return Err(KernelError::Busy);
            }
        }

        let first = actions.is_empty();
        if first {
            chip.set_trigger(irq, flags.trigger())?;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        actions.push(IrqAction {
            id,
            name,
            flags,
            handler,
        });

        if first {
            chip.unmask(irq);
        }

        log::debug!("irq {}: registered {}", irq, name);
        Ok(Registration {
            table: self,
            irq,
            id,
        })
    }

    fn release(&self, irq: IrqNumber, id: usize) {
        let Some(desc) = self.desc(irq) else {
            return;
        };

        let mut actions = desc.actions.lock();
        let Some(index) = actions.iter().position(|action| action.id == id) else {
            return;
        };
        let action = actions.remove(index);

        if actions.is_empty() {
            if let Some(chip) = desc.chip.get() {
                chip.mask(irq);
            }
        }

        log::debug!("irq {}: freed {}", irq, action.name);
    }

    /// Whether any handler is registered on `irq`.
    pub fn is_claimed(&self, irq: IrqNumber) -> bool {
        self.desc(irq)
            .is_some_and(|desc| !desc.actions.lock().is_empty())
    }

    /// Number of times `irq` was dispatched.
    pub fn count(&self, irq: IrqNumber) -> usize {
        self.desc(irq)
            .map_or(0, |desc| desc.count.load(Ordering::Relaxed))
    }

    /// Number of dispatches of `irq` that no handler claimed.
    pub fn unhandled(&self, irq: IrqNumber) -> usize {
        self.desc(irq)
            .map_or(0, |desc| desc.unhandled.load(Ordering::Relaxed))
    }
}

/// A live handler registration.
///
/// Dropping it (or calling [`Registration::free`]) removes the handler and
/// masks the line if it was the last one. When the handler is running on
/// another context, the drop waits for it to return.
#[must_use = "dropping a Registration frees the IRQ"]
pub struct Registration<'a> {
    table: &'a IrqTable,
    irq: IrqNumber,
    id: usize,
}

impl Registration<'_> {
    pub fn irq(&self) -> IrqNumber {
        self.irq
    }

    pub fn free(self) {
        drop(self);
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.table.release(self.irq, self.id);
    }
}

impl core::fmt::Debug for Registration<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("irq", &self.irq)
            .finish_non_exhaustive()
    }
}
