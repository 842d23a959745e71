use crate::sync::irq::IrqControl;

const CPSR_I_BIT: u32 = 1 << 7;

/// IRQ masking for ARMv7-A cores (the Cortex-A7 in the i.MX6UL).
///
/// Masking works on the I bit of the CPSR. FIQs are left alone; the board
/// routes nothing to them.
///
/// # State
///
/// `State` is `true` when IRQs were enabled before [`IrqControl::disable`].
/// A nested critical section sees `false` and its `restore` is a no-op, so
/// only the outermost guard unmasks.
///
/// # Assembly
///
/// - `mrs {0}, cpsr` then `cpsid i`: snapshot the CPSR, then mask. The
///   snapshot is taken first, so it reflects the caller's state.
/// - `cpsie i`: unmask. Issued only when the snapshot had the I bit clear.
///
/// Both sequences are `nomem`. Callers that need ordering against device
/// memory rely on the spin lock's acquire/release, not on these.
pub struct ArmIrq;

impl IrqControl for ArmIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let cpsr: u32;
        unsafe {
            core::arch::asm!(
                "mrs {0}, cpsr",
                "cpsid i",
                out(reg) cpsr,
                options(nomem, nostack)
            );
        }
        cpsr & CPSR_I_BIT == 0
    }

    #[inline(always)]
    fn restore(was_enabled: bool) {
        if was_enabled {
            unsafe {
                core::arch::asm!("cpsie i", options(nomem, nostack));
            }
        }
    }
}
