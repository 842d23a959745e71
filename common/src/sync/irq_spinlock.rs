use core::{
    marker::PhantomData,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

use super::irq::IrqControl;

/// IRQ-safe spinlock.
///
/// - Disables interrupts on lock
/// - Spins until acquired
/// - Releases the lock, then restores interrupt state on drop
///
/// Safe to use from:
/// - IRQ context
/// - Normal kernel context
///
/// Not fair. Not reentrant.
pub struct IrqSpinLock<T, I: IrqControl> {
    inner: spin::Mutex<T>,
    _irq: PhantomData<fn() -> I>,
}

impl<T, I: IrqControl> IrqSpinLock<T, I> {
    /// Create a new IRQ-safe spinlock.
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
            _irq: PhantomData,
        }
    }

    /// Acquire the lock with interrupts disabled.
    pub fn lock(&self) -> IrqSpinLockGuard<'_, T, I> {
        let irq_state = I::disable();
        let guard = self.inner.lock();

        IrqSpinLockGuard {
            guard: ManuallyDrop::new(guard),
            irq_state,
        }
    }

    /// Consume the lock and return the protected value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

/// Guard returned by `IrqSpinLock::lock`.
///
/// Restores interrupt state on drop.
pub struct IrqSpinLockGuard<'a, T, I: IrqControl> {
    guard: ManuallyDrop<spin::MutexGuard<'a, T>>,
    irq_state: I::State,
}

impl<T, I: IrqControl> Deref for IrqSpinLockGuard<'_, T, I> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T, I: IrqControl> DerefMut for IrqSpinLockGuard<'_, T, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T, I: IrqControl> Drop for IrqSpinLockGuard<'_, T, I> {
    fn drop(&mut self) {
        // SAFETY: the guard is dropped exactly once, here, and never used after.
        unsafe { ManuallyDrop::drop(&mut self.guard) };

        I::restore(self.irq_state);
    }
}
