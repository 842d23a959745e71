//! i.MX6UL General Purpose Timer (GPT) as a monotonic clock.

use crate::hal::timer::CountingTimer;
use core::ptr::{read_volatile, write_volatile};
use core::sync::atomic::{AtomicU32, Ordering};

/// ipg_clk feeding the GPT, in Hz.
const IPG_CLOCK_HZ: u32 = 66_000_000;
const TICK_HZ: u32 = 1_000_000;

// Register offsets
const CR: usize = 0x00;
const PR: usize = 0x04;
const CNT: usize = 0x24;

// Control Register (CR) bits
const CR_EN: u32 = 1 << 0;
const CR_ENMOD: u32 = 1 << 1;
const CR_CLKSRC_IPG: u32 = 0b001 << 6;
const CR_FRR: u32 = 1 << 9;

/// Free-running GPT counter ticking at 1 MHz.
///
/// The hardware counter is 32 bits and wraps every ~71 minutes;
/// [`CountingTimer::now_us`] widens it to 64 bits by counting wraps, which
/// requires it to be sampled at least once per wrap period.
#[derive(Debug)]
pub struct Gpt {
    base: usize,
    wraps: AtomicU32,
    last: AtomicU32,
}

impl Gpt {
    /// Create a GPT driver.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapped GPT register block that no other
    /// driver uses.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            base,
            wraps: AtomicU32::new(0),
            last: AtomicU32::new(0),
        }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Start counting from zero at 1 MHz.
    ///
    /// With ENMOD set the counter is reset when EN goes high.
    pub fn start(&mut self) {
        self.write_reg(CR, 0);
        self.write_reg(PR, IPG_CLOCK_HZ / TICK_HZ - 1);
        self.write_reg(CR, CR_CLKSRC_IPG | CR_FRR | CR_ENMOD);
        self.write_reg(CR, CR_CLKSRC_IPG | CR_FRR | CR_ENMOD | CR_EN);

        self.wraps.store(0, Ordering::Relaxed);
        self.last.store(0, Ordering::Relaxed);
    }
}

impl CountingTimer for Gpt {
    fn now_us(&self) -> u64 {
        let count = self.read_reg(CNT);
        let previous = self.last.swap(count, Ordering::AcqRel);

        let wraps = if count < previous {
            self.wraps.fetch_add(1, Ordering::AcqRel) + 1
        } else {
            self.wraps.load(Ordering::Acquire)
        };

        (u64::from(wraps) << 32) | u64::from(count)
    }
}
