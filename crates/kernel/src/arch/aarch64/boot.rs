//! Firmware entry for the raw `kernel8.img` loaded at 0x80000.
//!
//! The stub parks secondary cores, zeroes BSS, stashes the DTB pointer the
//! firmware passed in x0 (the HAL reads it back during discovery), installs
//! the exception vector base and calls into the portable kernel.

use core::arch::global_asm;

global_asm!(include_str!("asm/boot.S"));
