//! Monotonic clock.

/// Free-running microsecond counter, used for debounce timing.
pub trait CountingTimer {
    /// Microseconds since the counter started. Never goes backwards.
    fn now_us(&self) -> u64;
}
