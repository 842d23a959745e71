//! Button/LED driver module.

use crate::config::ButtonLedConfig;
use alloc::sync::Arc;
use common::sync::IrqLock;
use core::sync::atomic::{AtomicU32, Ordering};
use drivers::hal::gpio::{InputPin, OutputPin, PinLevel};
use kernel::gpio::{InputLine, OutputLine};
use kernel::irq::{IrqFlags, IrqHandler, IrqNumber, IrqReturn, Registration};
use kernel::module::{Module, ModuleInfo};
use kernel::{KernelError, KernelResult, System};

/// The LED line and the level it was last set to, updated together.
///
/// Once `stopping` is set the handler no longer drives the line.
struct Led {
    line: OutputLine<'static>,
    on: bool,
    stopping: bool,
}

impl Led {
    fn new(line: OutputLine<'static>) -> Self {
        Self {
            line,
            on: true,
            stopping: false,
        }
    }

    fn turn_off(&mut self) {
        self.on = false;
        if let Err(err) = self.line.set_low() {
            log::warn!("LED write failed: {}", err);
        }
    }
}

// The line is released right after this, so it goes out dark on every path.
impl Drop for Led {
    fn drop(&mut self) {
        if self.on {
            self.turn_off();
        }
    }
}

/// Context of the interrupt handler.
///
/// Fields drop in reverse order of acquisition.
struct PressState {
    button: InputLine<'static>,
    led: IrqLock<Led>,
    presses: AtomicU32,
}

impl PressState {
    fn button_level(&self) -> u8 {
        match InputPin::read(&self.button) {
            Ok(level) => level.as_u8(),
            Err(err) => {
                log::warn!("button read failed: {}", err);
                0
            }
        }
    }
}

impl IrqHandler for PressState {
    fn handle(&self, _irq: IrqNumber) -> IrqReturn {
        {
            let mut led = self.led.lock();
            if !led.stopping {
                led.on = !led.on;
                let on = led.on;
                if let Err(err) = led.line.set_state(on) {
                    log::error!("LED write failed: {}", err);
                }
            }
        }

        log::info!("interrupt! (button state is {})", self.button_level());
        self.presses.fetch_add(1, Ordering::Relaxed);

        IrqReturn::Handled
    }
}

/// Loaded driver: owns the IRQ registration and the handler context.
pub struct ButtonLed {
    irq: Registration<'static>,
    state: Arc<PressState>,
    config: ButtonLedConfig,
}

impl ButtonLed {
    /// Acquire and configure both lines and register the handler.
    ///
    /// On failure everything acquired so far is released, last first.
    pub fn with_config(sys: &'static System, config: ButtonLedConfig) -> KernelResult<Self> {
        log::info!("initializing the button/LED driver");

        if !sys.gpio.is_valid(config.led_line) {
            log::info!("invalid LED GPIO {}", config.led_line);
            return Err(KernelError::NoDevice);
        }

        let led = Led::new(
            sys.gpio
                .request(config.led_line, config.label)?
                .into_output(PinLevel::High)?,
        );
        led.line.export(false)?;

        let button = sys
            .gpio
            .request(config.button_line, config.label)?
            .into_input()?;
        button.set_debounce(config.debounce_ms)?;
        button.export(false)?;

        let state = Arc::new(PressState {
            button,
            led: IrqLock::new(led),
            presses: AtomicU32::new(0),
        });
        log::info!("the button state is currently: {}", state.button_level());

        let irq = state.button.to_irq()?;
        log::info!("the button is mapped to IRQ: {}", irq);

        let registration = sys
            .irq
            .request(irq, IrqFlags::TRIGGER_RISING, config.irq_name, state.clone());
        let status = registration.as_ref().map_or_else(|err| err.errno(), |_| 0);
        log::info!("the interrupt request result is: {}", status);

        Ok(Self {
            irq: registration?,
            state,
            config,
        })
    }

    /// Handled button presses since load.
    pub fn presses(&self) -> u32 {
        self.state.presses.load(Ordering::Relaxed)
    }

    pub fn led_on(&self) -> bool {
        self.state.led.lock().on
    }

    /// Interrupt number the handler is registered on.
    pub fn irq(&self) -> IrqNumber {
        self.irq.irq()
    }

    pub fn config(&self) -> &ButtonLedConfig {
        &self.config
    }
}

impl Module for ButtonLed {
    const INFO: ModuleInfo = ModuleInfo {
        name: "button_led",
        author: "Rajesh",
        description: "A Button/LED test driver for the iMX6 UL DART",
        version: "1.0",
        license: "GPL",
    };

    fn init(sys: &'static System) -> KernelResult<Self> {
        Self::with_config(sys, ButtonLedConfig::default())
    }

    fn exit(self) {
        let Self { irq, state, .. } = self;

        log::info!("the button state is currently: {}", state.button_level());
        log::info!(
            "the button was pressed {} times",
            state.presses.load(Ordering::Relaxed)
        );

        {
            let mut led = state.led.lock();
            led.stopping = true;
            led.turn_off();
            led.line.unexport();
        }

        // Waits for a running handler, after which this is the only reference.
        irq.free();
        state.button.unexport();

        match Arc::try_unwrap(state) {
            Ok(PressState { button, led, .. }) => {
                drop(led.into_inner());
                drop(button);
            }
            Err(_) => log::error!("handler context still shared, lines released with it"),
        }

        log::info!("goodbye from the button/LED driver");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivers::sim::SimBoard;

    fn load(board: &SimBoard) -> (&'static System, ButtonLed) {
        let sys = kernel::sim::system(board).unwrap();
        let driver = ButtonLed::init(sys).unwrap();
        (sys, driver)
    }

    #[test]
    fn handler_inverts_led_and_counts() {
        let board = SimBoard::new();
        let (_sys, driver) = load(&board);

        for n in 1..=4u32 {
            let before = driver.led_on();
            assert_eq!(driver.state.handle(driver.irq()), IrqReturn::Handled);

            assert_eq!(driver.led_on(), !before);
            assert_eq!(driver.presses(), n);
            assert_eq!(board.output_level(120), PinLevel::from(driver.led_on()));
        }
        driver.exit();
    }

    #[test]
    fn stopping_handler_counts_but_leaves_the_led() {
        let board = SimBoard::new();
        let (_sys, driver) = load(&board);

        {
            let mut led = driver.state.led.lock();
            led.stopping = true;
            led.turn_off();
        }
        assert_eq!(driver.state.handle(driver.irq()), IrqReturn::Handled);

        assert!(!driver.led_on());
        assert_eq!(driver.presses(), 1);
        assert_eq!(board.output_level(120), PinLevel::Low);
        driver.exit();
    }

    #[test]
    fn dropping_the_led_turns_it_off() {
        let board = SimBoard::new();
        let sys = kernel::sim::system(&board).unwrap();
        let line = sys.gpio.request(120, "test").unwrap();

        drop(Led::new(line.into_output(PinLevel::High).unwrap()));

        assert_eq!(board.output_level(120), PinLevel::Low);
        assert!(!sys.gpio.is_requested(120));
    }

    #[test]
    fn registration_uses_the_button_irq() {
        let board = SimBoard::new();
        let (sys, driver) = load(&board);

        assert_eq!(driver.irq(), 160);
        assert!(sys.irq.is_claimed(160));
        assert_eq!(driver.config(), &ButtonLedConfig::VAR_DART_6UL);

        driver.exit();
        assert!(!sys.irq.is_claimed(160));
    }
}
