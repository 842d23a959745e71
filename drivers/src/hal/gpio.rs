//! GPIO interfaces.
//!
//! Controllers address lines by number through [`GpioController`] and
//! [`GpioInterrupts`]. Handles for a single line implement [`InputPin`] and
//! [`OutputPin`].

use crate::hal::interrupt::IrqNumber;
use core::fmt::Debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    /// The `0`/`1` form used by the exported `value` attribute.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        level == PinLevel::High
    }
}

impl core::ops::Not for PinLevel {
    type Output = PinLevel;

    fn not(self) -> PinLevel {
        PinLevel::from(self == PinLevel::Low)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Transitions that latch a line event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EdgeDetect {
    Rising,
    Falling,
    Both,
}

impl EdgeDetect {
    /// Whether a change of the pad from `from` to `to` latches an event.
    pub fn fires(self, from: PinLevel, to: PinLevel) -> bool {
        match (self, from, to) {
            (Self::Rising | Self::Both, PinLevel::Low, PinLevel::High) => true,
            (Self::Falling | Self::Both, PinLevel::High, PinLevel::Low) => true,
            _ => false,
        }
    }
}

/// A controller owning a range of numbered lines.
pub trait GpioController {
    type Pin: Copy;
    type Error: Debug;

    /// Whether `pin` names a line this controller actually has.
    fn is_valid(&self, pin: Self::Pin) -> bool;

    fn set_direction(&mut self, pin: Self::Pin, direction: Direction) -> Result<(), Self::Error>;

    fn direction(&self, pin: Self::Pin) -> Result<Direction, Self::Error>;

    /// Latch `level` in the output register. It reaches the pad once the
    /// line is an output.
    fn write(&mut self, pin: Self::Pin, level: PinLevel) -> Result<(), Self::Error>;

    /// Outputs report the driven level, inputs the sampled pad level.
    fn read(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error>;

    /// Program a hardware debounce filter.
    ///
    /// Returns whether the controller filters in hardware. Controllers
    /// without a filter leave debouncing to the caller.
    fn set_debounce(&mut self, pin: Self::Pin, debounce_us: u32) -> Result<bool, Self::Error> {
        let _ = (pin, debounce_us);
        Ok(false)
    }
}

/// Edge detection and event latching.
pub trait GpioInterrupts: GpioController {
    /// Latch events on `edge`, or stop latching with `None`.
    ///
    /// Events latched under the previous setting are discarded.
    fn set_edge_detect(&mut self, pin: Self::Pin, edge: Option<EdgeDetect>) -> Result<(), Self::Error>;

    fn event_pending(&self, pin: Self::Pin) -> Result<bool, Self::Error>;

    fn clear_event(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Acknowledge a latched event. Returns whether there was one.
    fn take_event(&mut self, pin: Self::Pin) -> Result<bool, Self::Error> {
        if !self.event_pending(pin)? {
            return Ok(false);
        }
        self.clear_event(pin)?;
        Ok(true)
    }

    /// Root controller interrupt carrying this line's events.
    fn parent_irq(&self, pin: Self::Pin) -> Option<IrqNumber>;
}

pub trait InputPin {
    type Error: Debug;

    fn read(&self) -> Result<PinLevel, Self::Error>;

    fn is_high(&self) -> Result<bool, Self::Error> {
        self.read().map(bool::from)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub trait OutputPin {
    type Error: Debug;

    fn write(&mut self, level: PinLevel) -> Result<(), Self::Error>;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinLevel::High)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinLevel::Low)
    }

    /// `true` drives high.
    fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
        self.write(state.into())
    }
}

/// An output whose driven level can be read back.
pub trait StatefulOutputPin: OutputPin {
    fn read(&self) -> Result<PinLevel, Self::Error>;

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let level = self.read()?;
        self.write(!level)
    }

    fn is_set_high(&self) -> Result<bool, Self::Error> {
        self.read().map(bool::from)
    }
}
