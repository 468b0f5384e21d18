//! PS/2 keyboard on IRQ1.
//!
//! Scancode decoding goes through the `pc-keyboard` state machine (set 1,
//! US-104 layout), which tracks shift make/break and drops key-release
//! events. Decoded line-oriented bytes are queued in a fixed ring shared
//! with the shell: the IRQ path is the only producer, `getchar` the only
//! consumer.

use super::{cpu, io, pic};
use crate::IrqSafeLock;
use noxiom_utils::{Mutex, RingBuffer};
use pc_keyboard::{DecodedKey, HandleControl, Keyboard, ScancodeSet1, layouts::Us104Key};

const DATA_PORT: u16 = 0x60;
const RING_CAPACITY: usize = 256;

static DECODER: Mutex<Option<Keyboard<Us104Key, ScancodeSet1>>> = Mutex::new(None);
static RING: IrqSafeLock<RingBuffer<u8, RING_CAPACITY>> = IrqSafeLock::new(RingBuffer::new(0));

pub fn init() {
    *DECODER.lock() = Some(Keyboard::new(
        ScancodeSet1::new(),
        Us104Key,
        HandleControl::Ignore,
    ));
    pic::unmask(1);
}

/// IRQ1 entry: consume one scancode from the controller and queue whatever
/// it decodes to. On a full ring the new byte is dropped (first-wins).
pub fn handle_irq() {
    let scancode = unsafe { io::inb(DATA_PORT) };
    if let Some(byte) = translate(scancode) {
        let _ = RING.lock().push(byte);
    }
}

fn translate(scancode: u8) -> Option<u8> {
    let mut guard = DECODER.lock();
    let decoder = guard.as_mut()?;
    let event = decoder.add_byte(scancode).ok().flatten()?;
    match decoder.process_keyevent(event)? {
        DecodedKey::Unicode(ch) if ch == '\n' || ch == '\x08' || (' '..='~').contains(&ch) => {
            Some(ch as u8)
        }
        _ => None,
    }
}

/// Block until a byte is queued, sleeping between interrupts.
pub fn getchar() -> u8 {
    loop {
        if let Some(byte) = RING.lock().pop() {
            return byte;
        }
        cpu::halt_once();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::x86_64::io::{mock_guard, mock_reset, mock_script_inb};

    fn drain_ring() {
        while RING.lock().pop().is_some() {}
    }

    fn feed(scancode: u8) {
        mock_script_inb(&[scancode]);
        handle_irq();
    }

    #[test]
    fn shifted_key_decodes_to_uppercase() {
        let _io = mock_guard();
        mock_reset();
        init();
        drain_ring();

        // LShift make, 'a' make, LShift break.
        feed(0x2A);
        feed(0x1E);
        feed(0xAA);

        assert_eq!(RING.lock().pop(), Some(b'A'));
        assert_eq!(RING.lock().pop(), None);
    }

    #[test]
    fn key_release_produces_nothing() {
        let _io = mock_guard();
        mock_reset();
        init();
        drain_ring();

        feed(0x1E); // 'a' make
        feed(0x9E); // 'a' break

        assert_eq!(RING.lock().pop(), Some(b'a'));
        assert_eq!(RING.lock().pop(), None);
    }

    #[test]
    fn enter_and_backspace_map_to_line_editing_bytes() {
        let _io = mock_guard();
        mock_reset();
        init();
        drain_ring();

        feed(0x1C); // Enter
        feed(0x0E); // Backspace

        assert_eq!(RING.lock().pop(), Some(b'\n'));
        assert_eq!(RING.lock().pop(), Some(0x08));
    }
}
