mod support;

use button_led::{ButtonLed, ButtonLedConfig};
use drivers::hal::gpio::{Direction, EdgeDetect, PinLevel};
use kernel::KernelError;
use kernel::irq::{IrqFlags, IrqHandler, IrqNumber, IrqReturn};
use kernel::module::{ModuleSlot, ModuleState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use support::{logged, press, setup};

const LED: u32 = 120;
const BUTTON: u32 = 0;
const BUTTON_IRQ: IrqNumber = 160;

#[test]
fn invalid_led_line_acquires_nothing() {
    let (_board, sys) = setup();
    let config = ButtonLedConfig {
        led_line: 54,
        ..ButtonLedConfig::default()
    };

    let err = ButtonLed::with_config(sys, config).err();

    assert_eq!(err, Some(KernelError::NoDevice));
    assert_eq!(KernelError::NoDevice.errno(), -19);
    assert!(logged("invalid LED GPIO 54"));
    assert!(!sys.gpio.is_requested(BUTTON));
    assert!(sys.gpio.sysfs().exported().is_empty());
    assert!(!sys.irq.is_claimed(BUTTON_IRQ));
}

#[test]
fn load_configures_and_exports_both_lines() {
    let (board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();

    assert_eq!(slot.load(sys), 0);
    assert_eq!(slot.state(), ModuleState::Active);

    assert_eq!(sys.gpio.sysfs().exported(), vec![BUTTON, LED]);
    assert_eq!(sys.gpio.label(LED), Some("sysfs"));
    assert_eq!(sys.gpio.label(BUTTON), Some("sysfs"));

    assert_eq!(board.direction(LED), Direction::Output);
    assert_eq!(board.output_level(LED), PinLevel::High);
    assert_eq!(sys.gpio.sysfs().read_value(LED), Ok(1));
    assert_eq!(slot.with(ButtonLed::led_on), Some(true));

    assert_eq!(board.direction(BUTTON), Direction::Input);
    assert_eq!(sys.gpio.debounce_us(BUTTON), 200_000);
    assert_eq!(board.edge_detect(BUTTON), Some(EdgeDetect::Rising));
    assert!(sys.irq.is_claimed(BUTTON_IRQ));

    assert!(logged("the button state is currently: 0"));
    assert!(logged("the button is mapped to IRQ: 160"));
    assert!(logged("the interrupt request result is: 0"));

    slot.unload();
}

#[test]
fn exported_lines_keep_their_direction() {
    let (_board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();
    assert_eq!(slot.load(sys), 0);

    let sysfs = sys.gpio.sysfs();
    assert_eq!(
        sysfs.set_direction(LED, Direction::Input),
        Err(KernelError::PermissionDenied)
    );
    assert_eq!(
        sysfs.set_direction(BUTTON, Direction::Output),
        Err(KernelError::PermissionDenied)
    );
    assert_eq!(sysfs.write_value(BUTTON, 1), Err(KernelError::PermissionDenied));

    slot.unload();
}

#[test]
fn each_press_inverts_the_led_and_counts_once() {
    let (board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();
    assert_eq!(slot.load(sys), 0);

    for n in 1..=5u32 {
        let before = board.output_level(LED);
        press(&board, sys, BUTTON);

        assert_eq!(board.output_level(LED), !before);
        assert_eq!(slot.with(ButtonLed::presses), Some(n));
        // Starting on: on after an even number of presses.
        assert_eq!(slot.with(ButtonLed::led_on), Some(n % 2 == 0));
        assert_eq!(
            board.output_level(LED),
            PinLevel::from(slot.with(ButtonLed::led_on) == Some(true))
        );
    }
    assert!(logged("interrupt! (button state is 0)"));

    slot.unload();
}

#[test]
fn three_presses_then_unload_releases_everything() {
    let (board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();
    assert_eq!(slot.load(sys), 0);

    for _ in 0..3 {
        press(&board, sys, BUTTON);
    }
    assert_eq!(slot.with(ButtonLed::led_on), Some(false));
    assert_eq!(slot.with(ButtonLed::presses), Some(3));

    slot.unload();

    assert_eq!(slot.state(), ModuleState::Unloaded);
    assert_eq!(board.output_level(LED), PinLevel::Low);
    assert!(logged("pressed 3 times"));
    assert!(logged("goodbye"));

    assert!(!sys.gpio.is_requested(LED));
    assert!(!sys.gpio.is_requested(BUTTON));
    assert!(sys.gpio.sysfs().exported().is_empty());
    assert!(!sys.irq.is_claimed(BUTTON_IRQ));
    assert_eq!(board.edge_detect(BUTTON), None);

    // A press after unload reaches nobody.
    press(&board, sys, BUTTON);
    assert_eq!(sys.irq.count(BUTTON_IRQ), 3);
}

struct Squatter;

impl IrqHandler for Squatter {
    fn handle(&self, _irq: IrqNumber) -> IrqReturn {
        IrqReturn::Handled
    }
}

#[test]
fn failed_registration_releases_lines_and_unload_is_a_no_op() {
    let (board, sys) = setup();
    let squatter = sys
        .irq
        .request(BUTTON_IRQ, IrqFlags::TRIGGER_RISING, "squatter", Arc::new(Squatter))
        .unwrap();

    let slot = ModuleSlot::<ButtonLed>::new();
    assert_eq!(slot.load(sys), KernelError::Busy.errno());
    assert!(logged("the interrupt request result is: -16"));
    assert_eq!(slot.state(), ModuleState::Unloaded);

    assert!(!sys.gpio.is_requested(LED));
    assert!(!sys.gpio.is_requested(BUTTON));
    assert!(sys.gpio.sysfs().exported().is_empty());

    slot.unload();
    assert!(logged("not loaded"));
    assert!(sys.irq.is_claimed(BUTTON_IRQ), "foreign registration untouched");
    assert_eq!(board.edge_detect(BUTTON), Some(EdgeDetect::Rising));

    drop(squatter);
}

#[test]
fn busy_button_line_rolls_back_the_led() {
    let (board, sys) = setup();
    let other = sys.gpio.request(BUTTON, "other").unwrap();

    let slot = ModuleSlot::<ButtonLed>::new();
    assert_eq!(slot.load(sys), KernelError::Busy.errno());
    assert_eq!(slot.state(), ModuleState::Unloaded);

    assert!(!sys.gpio.is_requested(LED));
    assert!(sys.gpio.sysfs().exported().is_empty());
    assert_eq!(board.output_level(LED), PinLevel::Low);
    assert!(!sys.irq.is_claimed(BUTTON_IRQ));
    assert_eq!(sys.gpio.label(BUTTON), Some("other"));

    drop(other);
}

#[test]
fn presses_racing_unload_leave_the_led_off() {
    for _ in 0..200 {
        let (board, sys) = setup();
        let slot = ModuleSlot::<ButtonLed>::new();
        assert_eq!(slot.load(sys), 0);

        let done = Arc::new(AtomicBool::new(false));
        let presser = {
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    sys.irq.dispatch(BUTTON_IRQ);
                }
            })
        };

        slot.unload();
        done.store(true, Ordering::Relaxed);
        presser.join().unwrap();

        assert_eq!(board.output_level(LED), PinLevel::Low);
        assert!(!sys.gpio.is_requested(LED));
    }
}

#[test]
fn unload_without_load_does_nothing() {
    let (_board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();

    slot.unload();
    slot.unload();

    assert_eq!(slot.state(), ModuleState::Unloaded);
    assert!(!sys.irq.is_claimed(BUTTON_IRQ));
}

#[test]
fn bounces_inside_the_debounce_window_are_dropped() {
    let (board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();
    assert_eq!(slot.load(sys), 0);

    press(&board, sys, BUTTON);
    for _ in 0..3 {
        board.clock().advance_ms(20);
        board.press(BUTTON);
        sys.service_interrupts();
    }

    assert_eq!(slot.with(ButtonLed::presses), Some(1));
    assert_eq!(slot.with(ButtonLed::led_on), Some(false));

    slot.unload();
}

#[test]
fn releasing_the_button_does_not_count() {
    let (board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();
    assert_eq!(slot.load(sys), 0);

    board.clock().advance_ms(250);
    board.drive(BUTTON, PinLevel::High);
    sys.service_interrupts();
    board.clock().advance_ms(250);
    board.drive(BUTTON, PinLevel::Low);
    sys.service_interrupts();

    assert_eq!(slot.with(ButtonLed::presses), Some(1));
    assert!(logged("interrupt! (button state is 1)"));

    slot.unload();
}

#[test]
fn second_load_is_rejected_while_active() {
    let (_board, sys) = setup();
    let slot = ModuleSlot::<ButtonLed>::new();

    assert_eq!(slot.load(sys), 0);
    assert_eq!(slot.load(sys), KernelError::AlreadyLoaded.errno());
    assert_eq!(slot.state(), ModuleState::Active);
    assert!(sys.irq.is_claimed(BUTTON_IRQ));

    slot.unload();
}

#[test]
fn other_boards_can_rebind_the_lines() {
    let (board, sys) = setup();
    let config = ButtonLedConfig {
        led_line: 5,
        button_line: 33,
        ..ButtonLedConfig::VAR_DART_6UL
    };

    let driver = ButtonLed::with_config(sys, config).unwrap();
    assert_eq!(driver.irq(), 160 + 33);

    press(&board, sys, 33);
    assert_eq!(driver.presses(), 1);
    assert_eq!(board.output_level(5), PinLevel::Low);

    kernel::module::Module::exit(driver);
    assert!(!sys.gpio.is_requested(5));
}
