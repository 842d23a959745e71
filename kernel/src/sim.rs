//! A [`System`] running on the simulated board.

use crate::error::KernelResult;
use crate::irq::RootController;
use crate::system::System;
use alloc::boxed::Box;

pub use drivers::sim::SimBoard;

/// Build and attach a system over `board`.
///
/// The system is leaked so it can hand out `'static` registrations, as
/// the board one does.
pub fn system(board: &SimBoard) -> KernelResult<&'static System> {
    let system: &'static System = Box::leak(Box::new(System::new(
        Box::new(RootController::new(board.intc())),
        Box::new(board.gpio()),
        board.clock(),
    )));

    system.attach()?;
    Ok(system)
}
