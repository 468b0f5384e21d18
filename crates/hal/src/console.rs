//! Serial-backed `print!`/`println!` macros.
//!
//! These always target the serial port, never the display: they are the
//! channel for boot progress, the logger and panic reports, and must keep
//! working when display bring-up fails.

use core::fmt;

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use core::fmt::Write;
    #[cfg(target_arch = "x86_64")]
    let _ = crate::x86_64::serial::WRITER.lock().write_fmt(args);
    #[cfg(target_arch = "aarch64")]
    let _ = crate::aarch64::serial::WRITER.lock().write_fmt(args);
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::console::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}
