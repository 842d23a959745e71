use core::fmt::Debug;

/// CPU interrupt masking, one implementation per architecture.
///
/// Masking nests: `restore` with the state returned by the matching
/// `disable` only unmasks when the outermost section ends.
pub trait IrqControl {
    type State: Copy + Debug;

    /// Mask IRQs, returning what to hand back to [`IrqControl::restore`].
    fn disable() -> Self::State;

    fn restore(state: Self::State);
}
