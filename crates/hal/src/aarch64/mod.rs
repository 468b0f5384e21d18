//! AArch64 back-end: PL011 UART, GICv2, DTB discovery, MIDR identification.
//!
//! Serial and display are the same device here; there is no framebuffer.
//! Every MMIO base is discovered from the device tree at runtime — nothing
//! board-specific is hard-coded.

pub mod exceptions;
pub mod fdt;
pub mod gic;
pub mod midr;
pub mod serial;

use crate::hwinfo::{Arch, HwInfo};

/// Physical address of the DTB, stored by the boot stub from register x0
/// before any Rust code runs. Zero when the firmware provided none.
#[unsafe(no_mangle)]
pub static mut G_DTB_ADDR: u64 = 0;

pub(crate) fn dtb_addr() -> usize {
    unsafe { core::ptr::addr_of!(G_DTB_ADDR).read() as usize }
}

pub fn serial_init() {
    serial::init();
}

pub fn serial_putchar(byte: u8) {
    serial::putchar(byte);
}

pub fn serial_print(s: &str) {
    serial::print(s);
}

/// The UART was already configured by `serial_init`; nothing extra to do.
pub fn display_init() {}

/// VT100 erase-screen + cursor-home.
pub fn display_clear() {
    serial::print("\x1b[2J\x1b[H");
}

pub fn display_putchar(byte: u8) {
    match byte {
        // Rub the glyph out on a terminal, not just step left.
        0x08 => serial::print("\x08 \x08"),
        byte => serial::putchar(byte),
    }
}

pub fn display_print(s: &str) {
    serial::print(s);
}

/// UART target: color attributes are dropped.
pub fn display_set_color(_attr: u8) {}

/// RX was enabled together with TX in `serial_init`.
pub fn input_init() {}

pub fn input_getchar() -> u8 {
    match serial::getchar() {
        // Serial terminals send CR for Enter and DEL for rub-out.
        b'\r' => b'\n',
        0x7F => 0x08,
        byte => byte,
    }
}

pub fn intc_init() {
    gic::init();
}

pub fn intc_unmask(irq: u32) {
    gic::enable_irq(irq);
}

pub fn intc_send_eoi(irq: u32) {
    gic::eoi(irq);
}

pub fn cpu_init() {
    exceptions::install();
}

pub fn halt() -> ! {
    #[cfg(all(target_arch = "aarch64", not(feature = "std")))]
    {
        use core::arch::asm;
        // Mask everything, then sleep forever.
        unsafe { asm!("msr daifset, #0xf", options(nomem, nostack)) };
        loop {
            aarch64_cpu::asm::wfe();
        }
    }
    #[cfg(any(not(target_arch = "aarch64"), feature = "std"))]
    panic!("halt invoked on a hosted target");
}

pub fn hw_detect() -> HwInfo {
    let dtb = fdt::probe();

    let mut info = HwInfo::empty();
    info.arch = Arch::Arm64;
    info.cpu_cores = dtb.cpu_count;
    info.ram_bytes = dtb.ram_size;
    info.uart_base = dtb.uart_base;
    info.intc_base = dtb.gic_cpu_base;
    info.intc_dist_base = dtb.gic_dist_base;
    info.model = midr::detect();
    info.compat = dtb.uart_compat;
    info
}
