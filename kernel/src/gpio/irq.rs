//! GPIO interrupt chip and bank demultiplexer.
//!
//! Each GPIO bank signals its line events on a root controller IRQ. A
//! [`BankDemux`] registered there acknowledges every pending line event,
//! applies the software debounce filter and dispatches the line's virtual
//! IRQ.

use super::GpioLib;
use crate::error::{KernelError, KernelResult};
use crate::irq::{GPIO_IRQ_BASE, IrqChip, IrqFlags, IrqHandler, IrqNumber, IrqReturn, IrqTable};
use alloc::vec::Vec;
use drivers::hal::gpio::EdgeDetect;

impl IrqChip for GpioLib {
    fn set_trigger(&self, irq: IrqNumber, flags: IrqFlags) -> KernelResult<()> {
        let line = self.irq_to_line(irq).ok_or(KernelError::InvalidArgument)?;

        if flags.intersects(IrqFlags::TRIGGER_HIGH | IrqFlags::TRIGGER_LOW) {
            log::warn!("gpio{}: level triggers are not supported", line);
            return Err(KernelError::NotSupported);
        }

        let edge = match (
            flags.contains(IrqFlags::TRIGGER_RISING),
            flags.contains(IrqFlags::TRIGGER_FALLING),
        ) {
            (true, true) => EdgeDetect::Both,
            (true, false) => EdgeDetect::Rising,
            (false, true) => EdgeDetect::Falling,
            (false, false) => return Ok(()),
        };

        self.with_line(line, |desc| desc.irq_edge = Some(edge));
        Ok(())
    }

    fn mask(&self, irq: IrqNumber) {
        if let Some(line) = self.irq_to_line(irq) {
            let _ = self.with_chip(|chip| chip.set_edge(line, None));
        }
    }

    fn unmask(&self, irq: IrqNumber) {
        let Some(line) = self.irq_to_line(irq) else {
            return;
        };

        match self.with_line(line, |desc| desc.irq_edge) {
            Some(edge) => {
                let _ = self.with_chip(|chip| chip.set_edge(line, Some(edge)));
            }
            None => log::warn!("gpio{}: unmasked with no trigger configured", line),
        }
    }
}

/// Handler chained on a bank's root IRQ.
pub struct BankDemux {
    gpio: &'static GpioLib,
    irq: &'static IrqTable,
    lines: Vec<u32>,
}

impl BankDemux {
    pub fn new(gpio: &'static GpioLib, irq: &'static IrqTable, lines: Vec<u32>) -> Self {
        Self { gpio, irq, lines }
    }
}

impl IrqHandler for BankDemux {
    fn handle(&self, _irq: IrqNumber) -> IrqReturn {
        let mut result = IrqReturn::None;

        for &line in &self.lines {
            if !matches!(self.gpio.with_chip(|chip| chip.take_event(line)), Ok(true)) {
                continue;
            }
            result = IrqReturn::Handled;

            if !self.gpio.accept_edge(line) {
                log::trace!("gpio{}: bounce suppressed", line);
                continue;
            }
            self.irq.dispatch(GPIO_IRQ_BASE + line);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use crate::error::KernelError;
    use crate::irq::testing::CountingHandler;
    use crate::irq::IrqFlags;
    use crate::sim;
    use drivers::hal::gpio::{EdgeDetect, PinLevel};
    use drivers::sim::SimBoard;

    #[test]
    fn rising_edges_reach_the_line_handler() {
        let board = SimBoard::new();
        let sys = sim::system(&board).unwrap();
        let handler = CountingHandler::new();

        let _button = sys.gpio.request(0, "sysfs").unwrap().into_input().unwrap();
        let reg = sys
            .irq
            .request(160, IrqFlags::TRIGGER_RISING, "probe", handler.clone())
            .unwrap();
        assert_eq!(board.edge_detect(0), Some(EdgeDetect::Rising));

        board.press(0);
        board.press(0);
        sys.service_interrupts();
        assert_eq!(handler.hits(), 1, "both edges latched into one event");

        board.press(0);
        assert_eq!(sys.service_interrupts(), 1);
        assert_eq!(handler.hits(), 2);

        drop(reg);
        assert_eq!(board.edge_detect(0), None);
    }

    #[test]
    fn falling_edges_do_not_fire_rising_handlers() {
        let board = SimBoard::new();
        let sys = sim::system(&board).unwrap();
        let handler = CountingHandler::new();

        board.drive(0, PinLevel::High);
        let _reg = sys
            .irq
            .request(160, IrqFlags::TRIGGER_RISING, "probe", handler.clone())
            .unwrap();

        board.drive(0, PinLevel::Low);
        sys.service_interrupts();
        assert_eq!(handler.hits(), 0);
    }

    #[test]
    fn software_debounce_filters_bounces() {
        let board = SimBoard::new();
        let sys = sim::system(&board).unwrap();
        let handler = CountingHandler::new();

        let button = sys.gpio.request(0, "sysfs").unwrap().into_input().unwrap();
        button.set_debounce(200).unwrap();
        let _reg = sys
            .irq
            .request(160, IrqFlags::TRIGGER_RISING, "probe", handler.clone())
            .unwrap();

        board.press(0);
        sys.service_interrupts();
        board.clock().advance_ms(5);
        board.press(0);
        sys.service_interrupts();
        assert_eq!(handler.hits(), 1);

        board.clock().advance_ms(200);
        board.press(0);
        sys.service_interrupts();
        assert_eq!(handler.hits(), 2);
    }

    #[test]
    fn level_triggers_are_rejected() {
        let board = SimBoard::new();
        let sys = sim::system(&board).unwrap();

        let err = sys
            .irq
            .request(160, IrqFlags::TRIGGER_HIGH, "probe", CountingHandler::new())
            .unwrap_err();
        assert_eq!(err, KernelError::NotSupported);
        assert_eq!(board.edge_detect(0), None);
    }

    #[test]
    fn bank_demux_dispatches_only_pending_lines() {
        let board = SimBoard::new();
        let sys = sim::system(&board).unwrap();
        let handler = CountingHandler::new();
        let idle = CountingHandler::new();

        let _reg = sys
            .irq
            .request(160 + 5, IrqFlags::TRIGGER_RISING, "probe", handler.clone())
            .unwrap();
        let _idle = sys
            .irq
            .request(160 + 6, IrqFlags::TRIGGER_RISING, "idle", idle.clone())
            .unwrap();
        board.press(5);
        sys.service_interrupts();

        assert_eq!((handler.hits(), idle.hits()), (1, 0));
        assert_eq!(sys.irq.count(98), 1);
        assert_eq!(sys.irq.unhandled(98), 0);
    }
}
