//! CPU-level primitives used by the kernel main loop.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        pub mod arm;
        pub use arm::{disable_interrupts, enable_interrupts, wait_for_interrupt};
    } else {
        pub mod host;
        pub use host::{disable_interrupts, enable_interrupts, wait_for_interrupt};
    }
}
