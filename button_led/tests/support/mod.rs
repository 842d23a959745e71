//! Shared helpers for the driver integration tests.

use drivers::sim::SimBoard;
use kernel::System;
use log::{LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;

thread_local! {
    static LINES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Records log messages per test thread.
struct Capture;

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        LINES.with(|lines| lines.borrow_mut().push(record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture;

/// A fresh simulated system with log capture for the calling thread.
pub fn setup() -> (SimBoard, &'static System) {
    // Only the first test thread installs the logger; the level is set on
    // every thread so none of them logs before it is raised.
    let _ = kernel::logger::init(&CAPTURE, LevelFilter::Trace);
    log::set_max_level(LevelFilter::Trace);
    LINES.with(|lines| lines.borrow_mut().clear());

    let board = SimBoard::new();
    let sys = kernel::sim::system(&board).expect("simulated system");
    (board, sys)
}

pub fn logged(needle: &str) -> bool {
    LINES.with(|lines| lines.borrow().iter().any(|line| line.contains(needle)))
}

/// One clean press of the button on `line`, well apart from the previous one.
pub fn press(board: &SimBoard, sys: &System, line: u32) {
    board.clock().advance_ms(250);
    board.press(line);
    sys.service_interrupts();
}
