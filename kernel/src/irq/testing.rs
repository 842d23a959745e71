//! Test doubles for the IRQ layer.

use super::{IrqChip, IrqFlags, IrqHandler, IrqNumber, IrqReturn};
use crate::error::{KernelError, KernelResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Chip that records what the table asks of it. Low-level triggers are
/// rejected.
#[derive(Default)]
pub(crate) struct RecordingChip {
    unmasked: Mutex<BTreeSet<IrqNumber>>,
    triggers: Mutex<BTreeMap<IrqNumber, IrqFlags>>,
}

impl RecordingChip {
    pub(crate) fn leak() -> &'static Self {
        Box::leak(Box::default())
    }

    pub(crate) fn is_unmasked(&self, irq: IrqNumber) -> bool {
        self.unmasked.lock().unwrap().contains(&irq)
    }

    pub(crate) fn trigger(&self, irq: IrqNumber) -> Option<IrqFlags> {
        self.triggers.lock().unwrap().get(&irq).copied()
    }
}

impl IrqChip for RecordingChip {
    fn set_trigger(&self, irq: IrqNumber, flags: IrqFlags) -> KernelResult<()> {
        if flags.contains(IrqFlags::TRIGGER_LOW) {
            return Err(KernelError::NotSupported);
        }
        self.triggers.lock().unwrap().insert(irq, flags);
        Ok(())
    }

    fn mask(&self, irq: IrqNumber) {
        self.unmasked.lock().unwrap().remove(&irq);
    }

    fn unmask(&self, irq: IrqNumber) {
        self.unmasked.lock().unwrap().insert(irq);
    }
}

/// Handler that counts its invocations.
pub(crate) struct CountingHandler {
    pub(crate) hits: AtomicUsize,
    result: IrqReturn,
}

impl CountingHandler {
    pub(crate) fn new() -> Arc<Self> {
        Self::returning(IrqReturn::Handled)
    }

    pub(crate) fn returning(result: IrqReturn) -> Arc<Self> {
        Arc::new(Self {
            hits: AtomicUsize::new(0),
            result,
        })
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl IrqHandler for CountingHandler {
    fn handle(&self, _irq: IrqNumber) -> IrqReturn {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}
