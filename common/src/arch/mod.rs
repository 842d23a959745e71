//! Architecture selection.
//!
//! [`ArchIrq`] is the [`IrqControl`](crate::sync::IrqControl) implementation
//! for the CPU the crate is built for. Host builds (tests, simulation) get a
//! no-op implementation since there is no CPU interrupt state to save.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        pub mod arm;
        pub use arm::irq::ArmIrq as ArchIrq;
    } else {
        pub mod host;
        pub use host::HostIrq as ArchIrq;
    }
}
