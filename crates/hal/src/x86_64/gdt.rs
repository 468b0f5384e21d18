//! Kernel GDT: null, code, data. The boot stages run on their own flat GDT;
//! the kernel installs this one so it owns every descriptor it runs under.

use super::cpu::{self, DescriptorTablePointer};
use core::ptr::addr_of;

pub const KERNEL_CODE: u16 = 0x08;
pub const KERNEL_DATA: u16 = 0x10;

#[repr(C, align(16))]
pub struct Gdt {
    null: u64,
    kernel_code: u64,
    kernel_data: u64,
}

impl Gdt {
    pub const fn new() -> Self {
        Self {
            null: 0,
            // Long mode, present, exec/read, DPL=0.
            kernel_code: 0x00AF_9A00_0000_FFFF,
            // Present, read/write, DPL=0.
            kernel_data: 0x00CF_9200_0000_FFFF,
        }
    }
}

static GDT: Gdt = Gdt::new();

pub fn init() {
    let ptr = DescriptorTablePointer {
        limit: (core::mem::size_of::<Gdt>() - 1) as u16,
        base: addr_of!(GDT) as u64,
    };
    unsafe {
        cpu::lgdt(&ptr);
        cpu::reload_segments(KERNEL_CODE, KERNEL_DATA);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
