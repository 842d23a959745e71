//! ARM Architecture Support

/// Wait for interrupt (low-power idle)
///
/// Puts the CPU into a low-power state until an interrupt occurs.
#[inline(always)]
pub fn wait_for_interrupt() {
    unsafe {
        core::arch::asm!("wfi", options(nomem, nostack, preserves_flags));
    }
}

/// Unmask IRQs at the CPU.
#[inline(always)]
pub fn enable_interrupts() {
    unsafe { core::arch::asm!("cpsie i", options(nomem, nostack)) }
}

/// Mask IRQs at the CPU.
#[inline(always)]
pub fn disable_interrupts() {
    unsafe { core::arch::asm!("cpsid i", options(nomem, nostack)) }
}
