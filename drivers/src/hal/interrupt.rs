//! Root interrupt controller interface.
//!
//! Numbers are the controller's own interrupt IDs (GIC IDs on the i.MX6UL).
//! An interrupt is claimed with [`InterruptController::acknowledge`] and
//! retired with [`InterruptController::end_of_interrupt`].

/// Controller interrupt ID.
pub type IrqNumber = u32;

pub trait InterruptController {
    type Error: core::fmt::Debug;

    /// Let `irq` through to the CPU.
    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    fn disable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Claim the highest-priority pending interrupt and mark it active.
    ///
    /// `None` when nothing enabled is pending, including spurious reads.
    fn acknowledge(&mut self) -> Option<IrqNumber>;

    /// Retire an interrupt returned by [`acknowledge`](Self::acknowledge).
    fn end_of_interrupt(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;
}

/// Signal condition an interrupt line is sensed on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TriggerMode {
    RisingEdge,
    FallingEdge,
    LevelHigh,
    LevelLow,
}

impl TriggerMode {
    pub const fn is_edge(self) -> bool {
        matches!(self, Self::RisingEdge | Self::FallingEdge)
    }
}

/// Controllers whose per-interrupt trigger can be programmed.
pub trait ConfigurableInterruptController: InterruptController {
    /// Fails for modes the controller cannot sense.
    fn configure_trigger(&mut self, irq: IrqNumber, mode: TriggerMode) -> Result<(), Self::Error>;
}
