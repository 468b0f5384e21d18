//! ARM PL011 UART.
//!
//! Register offsets are fixed by the PL011 IP specification; only the MMIO
//! base varies between boards, and it comes from the device tree at first
//! use. With no UART in the tree the writer stays disabled and every byte
//! is silently dropped — the kernel still boots, just invisibly.

use super::fdt;
use bitflags::bitflags;
use core::fmt;
use core::ptr::{read_volatile, write_volatile};
use noxiom_utils::Mutex;

// Register offsets.
const UARTDR: usize = 0x000;
const UARTFR: usize = 0x018;
const UARTIBRD: usize = 0x024;
const UARTFBRD: usize = 0x028;
const UARTLCRH: usize = 0x02C;
const UARTCR: usize = 0x030;
const UARTIMSC: usize = 0x038;

// 115200 baud at the 48 MHz reference clock:
//   IBRD = 48_000_000 / (16 * 115200) = 26
//   FBRD = round((48_000_000 / (16 * 115200) - 26) * 64) = 3
const BAUD_IBRD: u32 = 26;
const BAUD_FBRD: u32 = 3;

bitflags! {
    /// Flag register (FR).
    #[derive(Clone, Copy)]
    pub struct FlagBits: u32 {
        /// Transmit FIFO full.
        const TXFF = 1 << 5;
        /// Receive FIFO empty.
        const RXFE = 1 << 4;
        const BUSY = 1 << 3;
    }
}

bitflags! {
    /// Control register (CR).
    #[derive(Clone, Copy)]
    pub struct ControlBits: u32 {
        const UARTEN = 1 << 0;
        const TXE = 1 << 8;
        const RXE = 1 << 9;
    }
}

bitflags! {
    /// Line control register (LCR_H).
    #[derive(Clone, Copy)]
    pub struct LineControlBits: u32 {
        /// Enable FIFOs.
        const FEN = 1 << 4;
        /// 8-bit word length.
        const WLEN_8 = 0b11 << 5;
    }
}

pub struct Pl011 {
    base: usize,
}

impl Pl011 {
    pub const fn disabled() -> Self {
        Self { base: 0 }
    }

    pub fn set_base(&mut self, base: usize) {
        self.base = base;
    }

    pub fn is_present(&self) -> bool {
        self.base != 0
    }

    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) };
    }

    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    fn flags(&self) -> FlagBits {
        FlagBits::from_bits_truncate(self.read_reg(UARTFR))
    }

    pub fn init(&mut self) {
        if self.base == 0 {
            return;
        }
        // Disable while reprogramming.
        self.write_reg(UARTCR, 0);
        self.write_reg(UARTIBRD, BAUD_IBRD);
        self.write_reg(UARTFBRD, BAUD_FBRD);
        // 8n1 with FIFOs.
        self.write_reg(
            UARTLCRH,
            (LineControlBits::WLEN_8 | LineControlBits::FEN).bits(),
        );
        // Polled operation; mask every UART interrupt.
        self.write_reg(UARTIMSC, 0);
        self.write_reg(
            UARTCR,
            (ControlBits::UARTEN | ControlBits::TXE | ControlBits::RXE).bits(),
        );
    }

    /// Blocks while the TX FIFO is full. No-op without a discovered UART.
    pub fn write_byte(&mut self, byte: u8) {
        if self.base == 0 {
            return;
        }
        while self.flags().contains(FlagBits::TXFF) {
            core::hint::spin_loop();
        }
        self.write_reg(UARTDR, u32::from(byte));
    }

    pub fn try_read_byte(&self) -> Option<u8> {
        if self.base == 0 || self.flags().contains(FlagBits::RXFE) {
            None
        } else {
            Some((self.read_reg(UARTDR) & 0xFF) as u8)
        }
    }
}

impl fmt::Write for Pl011 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

pub static WRITER: Mutex<Pl011> = Mutex::new(Pl011::disabled());

pub fn init() {
    let dtb = fdt::probe();
    if dtb.uart_base != 0 {
        let mut uart = WRITER.lock();
        uart.set_base(dtb.uart_base as usize);
        uart.init();
    }
}

pub fn putchar(byte: u8) {
    WRITER.lock().write_byte(byte);
}

pub fn print(s: &str) {
    let mut uart = WRITER.lock();
    for byte in s.bytes() {
        uart.write_byte(byte);
    }
}

/// Block until a byte arrives. With no UART discovered nothing can ever
/// arrive, so the CPU parks in its low-power wait instead of spinning.
pub fn getchar() -> u8 {
    if !WRITER.lock().is_present() {
        loop {
            wait_for_event();
        }
    }
    loop {
        if let Some(byte) = WRITER.lock().try_read_byte() {
            return byte;
        }
        core::hint::spin_loop();
    }
}

fn wait_for_event() {
    #[cfg(all(target_arch = "aarch64", not(feature = "std")))]
    aarch64_cpu::asm::wfe();
    #[cfg(any(not(target_arch = "aarch64"), feature = "std"))]
    core::hint::spin_loop();
}

// ============================================================================
// Unit Tests
// ============================================================================
