//! 16550-compatible UART on COM1. Early-boot debug channel; works before
//! anything else is initialized.

use super::io;
use core::fmt;
use noxiom_utils::Mutex;

const COM1: u16 = 0x3F8;

pub struct SerialPort {
    base: u16,
}

impl SerialPort {
    pub const fn new(base: u16) -> Self {
        Self { base }
    }

    pub fn init(&mut self) {
        unsafe {
            // Disable UART interrupts; we poll.
            io::outb(self.base + 1, 0x00);
            // DLAB on, divisor 3 = 38400 baud.
            io::outb(self.base + 3, 0x80);
            io::outb(self.base + 0, 0x03);
            io::outb(self.base + 1, 0x00);
            // 8 bits, no parity, one stop bit.
            io::outb(self.base + 3, 0x03);
            // FIFO on, cleared, 14-byte threshold.
            io::outb(self.base + 2, 0xC7);
            // RTS/DSR set.
            io::outb(self.base + 4, 0x0B);
        }
    }

    fn line_status(&self) -> u8 {
        unsafe { io::inb(self.base + 5) }
    }

    fn transmit_empty(&self) -> bool {
        self.line_status() & 0x20 != 0
    }

    /// Blocks until the TX FIFO accepts the byte.
    pub fn send(&mut self, byte: u8) {
        while !self.transmit_empty() {
            core::hint::spin_loop();
        }
        unsafe { io::outb(self.base, byte) };
    }
}

impl fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.send(byte);
        }
        Ok(())
    }
}

pub static WRITER: Mutex<SerialPort> = Mutex::new(SerialPort::new(COM1));

pub fn init() {
    WRITER.lock().init();
}

pub fn putchar(byte: u8) {
    WRITER.lock().send(byte);
}

pub fn print(s: &str) {
    let mut port = WRITER.lock();
    for byte in s.bytes() {
        port.send(byte);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::x86_64::io::{IoOp, mock_guard, mock_ops, mock_reset};

    #[test]
    fn init_programs_divisor_3() {
        let _io = mock_guard();
        mock_reset();
        let mut port = SerialPort::new(COM1);
        port.init();
        let ops = mock_ops();
        // DLAB enable followed by the low divisor byte on the data port.
        assert!(ops.contains(&IoOp::Outb(COM1 + 3, 0x80)));
        assert!(ops.contains(&IoOp::Outb(COM1, 0x03)));
        assert!(ops.contains(&IoOp::Outb(COM1 + 3, 0x03)));
    }

    #[test]
    fn send_writes_data_port_after_lsr_poll() {
        let _io = mock_guard();
        mock_reset();
        let mut port = SerialPort::new(COM1);
        port.send(b'N');
        let ops = mock_ops();
        assert!(ops.contains(&IoOp::Inb(COM1 + 5)));
        assert_eq!(*ops.last().unwrap(), IoOp::Outb(COM1, b'N'));
    }
}
