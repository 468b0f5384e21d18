//! Serial-backed `log::Log` implementation.
//!
//! Installed immediately after `serial_init`, so every boot step after the
//! first can report progress through the `log` facade without caring
//! whether the display exists yet.

use log::{LevelFilter, Metadata, Record};

static LOGGER: SerialLogger = SerialLogger;

struct SerialLogger;

impl log::Log for SerialLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        noxiom_hal::println!("[noxiom] {}", record.args());
    }

    fn flush(&self) {}
}

pub fn init(max_level: LevelFilter) {
    log::set_logger(&LOGGER).expect("logger installed twice");
    log::set_max_level(max_level);
}
