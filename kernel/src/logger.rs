//! Console logger for the `log` facade.

use crate::error::{KernelError, KernelResult};
use common::sync::IrqLock;
use core::fmt;
use log::{LevelFilter, Log, Metadata, Record};

/// Writes `[LEVEL] target: message` lines to a console.
pub struct ConsoleLogger<W> {
    sink: IrqLock<W>,
    level: LevelFilter,
}

impl<W> ConsoleLogger<W> {
    pub const fn new(sink: W, level: LevelFilter) -> Self {
        Self {
            sink: IrqLock::new(sink),
            level,
        }
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}

impl<W: fmt::Write + Send> Log for ConsoleLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut sink = self.sink.lock();
        // Nowhere to report a failing console.
        let _ = writeln!(
            sink,
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Install `logger` as the global logger.
pub fn init(logger: &'static dyn Log, level: LevelFilter) -> KernelResult<()> {
    log::set_logger(logger).map_err(|_| KernelError::Busy)?;
    log::set_max_level(level);
    Ok(())
}
