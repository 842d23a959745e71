//! Simulated hardware for host-side tests.
//!
//! - [`FakeRegisters`]: heap-backed register block for exercising the
//!   register-level drivers through their normal volatile accessors
//! - [`SimBoard`]: a behavioural i.MX6UL GPIO + interrupt controller with a
//!   manual clock, sharing the real line geometry and bank interrupt numbers

use crate::hal::gpio::{Direction, EdgeDetect, GpioController, GpioInterrupts, PinLevel};
use crate::hal::interrupt::{
    ConfigurableInterruptController, InterruptController, IrqNumber, TriggerMode,
};
use crate::hal::timer::CountingTimer;
use crate::platform::imx6ul::gpio::{NR_GPIOS, bank_irq, is_valid_line};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ptr::{read_volatile, write_volatile};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ============================================================================
// Register blocks
// ============================================================================

/// Zero-initialised memory standing in for a peripheral register block.
pub struct FakeRegisters {
    ptr: *mut u32,
    words: usize,
}

impl FakeRegisters {
    /// Allocate a block of at least `bytes` bytes.
    pub fn new(bytes: usize) -> Self {
        let words = bytes.div_ceil(4);
        let block = vec![0u32; words].into_boxed_slice();
        Self {
            ptr: Box::into_raw(block).cast::<u32>(),
            words,
        }
    }

    /// Address to hand to a driver constructor.
    pub fn base(&self) -> usize {
        self.ptr as usize
    }

    /// Read the 32-bit register at byte `offset`.
    pub fn read(&self, offset: usize) -> u32 {
        assert!(offset / 4 < self.words, "offset {offset:#x} out of block");
        unsafe { read_volatile(self.ptr.add(offset / 4)) }
    }

    /// Overwrite the 32-bit register at byte `offset`, as hardware would.
    pub fn write(&self, offset: usize, value: u32) {
        assert!(offset / 4 < self.words, "offset {offset:#x} out of block");
        unsafe { write_volatile(self.ptr.add(offset / 4), value) }
    }
}

impl Drop for FakeRegisters {
    fn drop(&mut self) {
        let slice = std::ptr::slice_from_raw_parts_mut(self.ptr, self.words);
        // SAFETY: `ptr`/`words` came from `Box::into_raw` in `new`.
        drop(unsafe { Box::from_raw(slice) });
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Clock that only moves when a test advances it.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_us: AtomicU64,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self {
            now_us: AtomicU64::new(0),
        }
    }

    pub fn advance_us(&self, us: u64) {
        self.now_us.fetch_add(us, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }
}

impl CountingTimer for ManualClock {
    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Board
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct SimLine {
    direction: Direction,
    driven: PinLevel,
    pad: PinLevel,
    edge: Option<EdgeDetect>,
    pending: bool,
}

impl Default for SimLine {
    fn default() -> Self {
        Self {
            direction: Direction::Input,
            driven: PinLevel::Low,
            pad: PinLevel::Low,
            edge: None,
            pending: false,
        }
    }
}

#[derive(Debug, Default)]
struct BoardState {
    lines: Vec<SimLine>,
    enabled: BTreeSet<IrqNumber>,
    triggers: BTreeMap<IrqNumber, TriggerMode>,
    raised: VecDeque<IrqNumber>,
}

impl BoardState {
    fn line(&self, line: u32) -> Result<&SimLine, SimError> {
        if is_valid_line(line) {
            Ok(&self.lines[line as usize])
        } else {
            Err(SimError::InvalidPin)
        }
    }

    fn line_mut(&mut self, line: u32) -> Result<&mut SimLine, SimError> {
        if is_valid_line(line) {
            Ok(&mut self.lines[line as usize])
        } else {
            Err(SimError::InvalidPin)
        }
    }

    fn raise(&mut self, irq: IrqNumber) {
        if !self.raised.contains(&irq) {
            self.raised.push_back(irq);
        }
    }
}

/// Simulated i.MX6UL: GPIO banks, interrupt controller and clock.
///
/// Handles returned by [`SimBoard::gpio`] and [`SimBoard::intc`] share state
/// with the board, so a test can hand them to the kernel and still drive
/// pads and observe outputs from outside.
#[derive(Clone)]
pub struct SimBoard {
    state: Arc<Mutex<BoardState>>,
    clock: &'static ManualClock,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    pub fn new() -> Self {
        let state = BoardState {
            lines: vec![SimLine::default(); NR_GPIOS as usize],
            ..BoardState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            clock: Box::leak(Box::new(ManualClock::new())),
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn gpio(&self) -> SimGpio {
        SimGpio {
            state: Arc::clone(&self.state),
        }
    }

    pub fn intc(&self) -> SimIntc {
        SimIntc {
            state: Arc::clone(&self.state),
        }
    }

    pub fn clock(&self) -> &'static ManualClock {
        self.clock
    }

    /// Drive the pad of `line` from outside, latching an event if the
    /// transition matches its edge detection and raising the bank interrupt.
    pub fn drive(&self, line: u32, level: PinLevel) {
        let mut state = self.state();
        let Ok(pin) = state.line_mut(line) else {
            panic!("line {line} does not exist");
        };

        let previous = pin.pad;
        pin.pad = level;

        if pin.edge.is_some_and(|edge| edge.fires(previous, level)) {
            pin.pending = true;
            if let Some(parent) = bank_irq(line) {
                state.raise(parent);
            }
        }
    }

    /// One full button press: rising edge followed by release.
    pub fn press(&self, line: u32) {
        self.drive(line, PinLevel::High);
        self.drive(line, PinLevel::Low);
    }

    /// Level an output line is driving.
    pub fn output_level(&self, line: u32) -> PinLevel {
        self.state().lines[line as usize].driven
    }

    pub fn direction(&self, line: u32) -> Direction {
        self.state().lines[line as usize].direction
    }

    pub fn edge_detect(&self, line: u32) -> Option<EdgeDetect> {
        self.state().lines[line as usize].edge
    }

    pub fn irq_enabled(&self, irq: IrqNumber) -> bool {
        self.state().enabled.contains(&irq)
    }

    pub fn trigger(&self, irq: IrqNumber) -> Option<TriggerMode> {
        self.state().triggers.get(&irq).copied()
    }
}

/// GPIO side of a [`SimBoard`].
pub struct SimGpio {
    state: Arc<Mutex<BoardState>>,
}

impl SimGpio {
    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GpioController for SimGpio {
    type Pin = u32;
    type Error = SimError;

    fn is_valid(&self, pin: u32) -> bool {
        is_valid_line(pin)
    }

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<(), SimError> {
        self.state().line_mut(pin)?.direction = direction;
        Ok(())
    }

    fn direction(&self, pin: u32) -> Result<Direction, SimError> {
        Ok(self.state().line(pin)?.direction)
    }

    fn write(&mut self, pin: u32, level: PinLevel) -> Result<(), SimError> {
        self.state().line_mut(pin)?.driven = level;
        Ok(())
    }

    fn read(&self, pin: u32) -> Result<PinLevel, SimError> {
        let state = self.state();
        let line = state.line(pin)?;
        Ok(match line.direction {
            Direction::Output => line.driven,
            Direction::Input => line.pad,
        })
    }
}

impl GpioInterrupts for SimGpio {
    fn set_edge_detect(&mut self, pin: u32, edge: Option<EdgeDetect>) -> Result<(), SimError> {
        let mut state = self.state();
        let line = state.line_mut(pin)?;
        line.edge = edge;
        line.pending = false;
        Ok(())
    }

    fn event_pending(&self, pin: u32) -> Result<bool, SimError> {
        let state = self.state();
        let line = state.line(pin)?;
        Ok(line.pending && line.edge.is_some())
    }

    fn clear_event(&mut self, pin: u32) -> Result<(), SimError> {
        self.state().line_mut(pin)?.pending = false;
        Ok(())
    }

    fn parent_irq(&self, pin: u32) -> Option<IrqNumber> {
        bank_irq(pin)
    }
}

/// Interrupt controller side of a [`SimBoard`].
pub struct SimIntc {
    state: Arc<Mutex<BoardState>>,
}

impl SimIntc {
    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InterruptController for SimIntc {
    type Error = SimError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), SimError> {
        self.state().enabled.insert(irq);
        Ok(())
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), SimError> {
        self.state().enabled.remove(&irq);
        Ok(())
    }

    fn acknowledge(&mut self) -> Option<IrqNumber> {
        let mut state = self.state();
        let index = state
            .raised
            .iter()
            .position(|irq| state.enabled.contains(irq))?;
        state.raised.remove(index)
    }

    fn end_of_interrupt(&mut self, _irq: IrqNumber) -> Result<(), SimError> {
        Ok(())
    }
}

impl ConfigurableInterruptController for SimIntc {
    fn configure_trigger(&mut self, irq: IrqNumber, mode: TriggerMode) -> Result<(), SimError> {
        self.state().triggers.insert(irq, mode);
        Ok(())
    }
}

/// Simulation errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimError {
    InvalidPin,
}
