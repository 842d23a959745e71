pub mod irq;
pub mod irq_spinlock;

pub use irq::IrqControl;
pub use irq_spinlock::{IrqSpinLock, IrqSpinLockGuard};

use crate::arch::ArchIrq;

/// IRQ-safe spinlock using the interrupt control of the build target.
pub type IrqLock<T> = IrqSpinLock<T, ArchIrq>;
