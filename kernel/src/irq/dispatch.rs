//! Interrupt Dispatch
//!
//! Called from the root interrupt service loop and from chained
//! demultiplexers.

use super::{IrqNumber, IrqReturn, IrqTable};
use core::sync::atomic::Ordering;

impl IrqTable {
    /// Run every action registered on `irq`.
    ///
    /// The descriptor stays locked while the handlers run, so a concurrent
    /// [`Registration`](super::Registration) drop waits until they return.
    pub fn dispatch(&self, irq: IrqNumber) -> IrqReturn {
        let Some(desc) = self.desc(irq) else {
            log::warn!("spurious irq {}", irq);
            return IrqReturn::None;
        };

        desc.count.fetch_add(1, Ordering::Relaxed);

        let actions = desc.actions.lock();
        let mut result = IrqReturn::None;
        for action in actions.iter() {
            if action.handler.handle(irq) == IrqReturn::Handled {
                result = IrqReturn::Handled;
            }
        }
        drop(actions);

        if result == IrqReturn::None {
            let unhandled = desc.unhandled.fetch_add(1, Ordering::Relaxed) + 1;
            log::warn!("irq {}: nobody cared ({} unhandled)", irq, unhandled);
        }

        result
    }
}
