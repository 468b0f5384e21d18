//! Portable kernel logic: everything here is arch-neutral and talks to the
//! hardware exclusively through `noxiom-hal`.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod banner;
pub mod logger;
pub mod shell;

pub const VERSION: &str = "0.1.0";

/// `ShellIo` wired to the HAL display and input.
pub struct HalIo;

impl shell::ShellIo for HalIo {
    fn read_byte(&mut self) -> u8 {
        noxiom_hal::input_getchar()
    }

    fn write_byte(&mut self, byte: u8) {
        noxiom_hal::display_putchar(byte);
    }

    fn write_str(&mut self, s: &str) {
        noxiom_hal::display_print(s);
    }

    fn set_color(&mut self, attr: u8) {
        noxiom_hal::display_set_color(attr);
    }

    fn clear(&mut self) {
        noxiom_hal::display_clear();
    }
}
