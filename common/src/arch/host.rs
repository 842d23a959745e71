use crate::sync::irq::IrqControl;

/// Interrupt control for hosted builds.
///
/// Hosted code never runs in interrupt context, so masking is a no-op.
pub struct HostIrq;

impl IrqControl for HostIrq {
    type State = ();

    #[inline(always)]
    fn disable() {}

    #[inline(always)]
    fn restore(_state: ()) {}
}
