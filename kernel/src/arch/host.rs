//! Host build: there is no CPU interrupt line to control.

pub fn wait_for_interrupt() {
    core::hint::spin_loop();
}

pub fn enable_interrupts() {}

pub fn disable_interrupts() {}
