//! Bare-metal image for the VAR-DART-6UL: brings up the console, interrupt
//! controller and GPIO, loads the button/LED driver and idles.

#![no_std]
#![no_main]

extern crate alloc;

use alloc::boxed::Box;
use button_led::ButtonLed;
use core::panic::PanicInfo;
use drivers::hal::serial::{SerialConfig, SerialPort, SerialWriter};
use drivers::platform::{CurrentPlatform as Board, Platform};
use kernel::System;
use kernel::arch;
use kernel::irq::RootController;
use kernel::logger::{self, ConsoleLogger};
use kernel::module::{Module, ModuleSlot};
use linked_list_allocator::LockedHeap;
use log::LevelFilter;

const HEAP_SIZE: usize = 256 * 1024;

static mut HEAP_MEMORY: [u8; HEAP_SIZE] = [0; HEAP_SIZE];

#[global_allocator]
static ALLOCATOR: LockedHeap = LockedHeap::empty();

type Console = SerialWriter<<Board as Platform>::Console>;

static LOGGER: spin::Once<ConsoleLogger<Console>> = spin::Once::new();
static CLOCK: spin::Once<<Board as Platform>::Clock> = spin::Once::new();
static SYSTEM: spin::Once<System> = spin::Once::new();
static MODULE: ModuleSlot<ButtonLed> = ModuleSlot::new();

#[unsafe(no_mangle)]
pub extern "C" fn kernel_main() -> ! {
    unsafe {
        ALLOCATOR
            .lock()
            .init((&raw mut HEAP_MEMORY).cast::<u8>(), HEAP_SIZE);
    }

    let mut uart = unsafe { Board::console() };
    if uart.configure(SerialConfig::default()).is_err() {
        halt();
    }
    let console = LOGGER.call_once(|| ConsoleLogger::new(SerialWriter(uart), LevelFilter::Info));
    if logger::init(console, LevelFilter::Info).is_err() {
        halt();
    }
    log::info!("booting on {}", Board::name());

    let clock = CLOCK.call_once(|| unsafe { Board::clock() });
    let system = SYSTEM.call_once(|| {
        System::new(
            Box::new(RootController::new(unsafe { Board::interrupt_controller() })),
            Box::new(unsafe { Board::gpio() }),
            clock,
        )
    });
    if let Err(err) = system.attach() {
        log::error!("interrupt wiring failed: {}", err);
        halt();
    }

    let status = MODULE.load(system);
    log::info!("{} loaded with status {}", ButtonLed::INFO.name, status);

    arch::enable_interrupts();
    loop {
        arch::wait_for_interrupt();
    }
}

/// Called from the IRQ exception vector.
#[unsafe(no_mangle)]
pub extern "C" fn irq_entry_rust() {
    if let Some(system) = SYSTEM.get() {
        system.service_interrupts();
    }
}

/// Called by the monitor before reset.
#[unsafe(no_mangle)]
pub extern "C" fn kernel_shutdown() {
    MODULE.unload();
}

fn halt() -> ! {
    arch::disable_interrupts();
    loop {
        arch::wait_for_interrupt();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    log::error!("panic: {}", info);
    halt()
}
