//! Noxiom hardware abstraction layer.
//!
//! The functions exported from this crate root are the complete surface the
//! portable kernel is allowed to call. Each architecture provides one
//! back-end module (`x86_64`, `aarch64`) implementing the same operations;
//! the active back-end is selected at compile time through the `arch` alias.
//!
//! Ordering contract: `serial_init` must be callable before anything else so
//! early diagnostics survive partial bring-up. `cpu_init` must run before
//! interrupts are enabled. Detection never fails — unknown hardware is
//! reported as zeroed fields and collapses to the FALLBACK tier.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod console;
pub mod hwinfo;
pub mod interrupts;
pub mod traits;

// Both back-ends compile on a hosted target when the `std` feature is on so
// their logic stays unit-testable from any build machine; hardware access is
// mocked or stubbed in that configuration.
#[cfg(any(target_arch = "x86_64", feature = "std"))]
pub mod x86_64;

#[cfg(any(target_arch = "aarch64", feature = "std"))]
pub mod aarch64;

#[cfg(target_arch = "x86_64")]
pub use self::x86_64 as arch;
#[cfg(target_arch = "aarch64")]
pub use self::aarch64 as arch;

pub use hwinfo::{Arch, HwInfo, Tier};

// ── Display colors ──────────────────────────────────────────────────────────
// VGA-compatible encoding; a packed attribute carries the foreground in the
// low nibble and the background in the high nibble. UART-only back-ends
// accept and ignore the attribute.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGrey = 7,
    DarkGrey = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    LightMagenta = 13,
    Yellow = 14,
    White = 15,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(pub u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((background as u8) << 4 | (foreground as u8))
    }
}

// ── HAL contract ────────────────────────────────────────────────────────────

/// Serial console. Safe to call before any other HAL operation.
pub fn serial_init() {
    arch::serial_init()
}

/// Blocks until the byte is accepted by the transmit FIFO.
pub fn serial_putchar(byte: u8) {
    arch::serial_putchar(byte)
}

pub fn serial_print(s: &str) {
    arch::serial_print(s)
}

/// Text display. VGA text mode on the PC, the UART itself on ARM boards.
pub fn display_init() {
    arch::display_init()
}

pub fn display_clear() {
    arch::display_clear()
}

/// Geometry characters are honored on every back-end: newline advances,
/// carriage return resets the column, backspace erases one column (never
/// underflowing past column 0), tab advances to the next multiple-of-8
/// column.
pub fn display_putchar(byte: u8) {
    arch::display_putchar(byte)
}

pub fn display_print(s: &str) {
    arch::display_print(s)
}

/// Back-ends without color silently ignore the attribute.
pub fn display_set_color(attr: u8) {
    arch::display_set_color(attr)
}

/// Line-oriented input.
pub fn input_init() {
    arch::input_init()
}

/// Blocks until a character is available. Returns printable bytes, `\n` for
/// commit and `\x08` for erase; shift handling and CR/DEL normalization are
/// back-end concerns.
pub fn input_getchar() -> u8 {
    arch::input_getchar()
}

/// Interrupt controller. All source lines are masked after `intc_init`; the
/// kernel re-enables only the lines it handles.
pub fn intc_init() {
    arch::intc_init()
}

pub fn intc_unmask(irq: u32) {
    arch::intc_unmask(irq)
}

/// Safe against double completion of the same IRQ.
pub fn intc_send_eoi(irq: u32) {
    arch::intc_send_eoi(irq)
}

/// Install descriptor tables / exception vectors. Must run before interrupts
/// are enabled; on x86_64 this is also the point where they are enabled.
pub fn cpu_init() {
    arch::cpu_init()
}

/// Mask interrupts and enter an unrecoverable low-power wait.
pub fn halt() -> ! {
    arch::halt()
}

/// Fill a fresh hardware descriptor. Never fails; undetected fields stay 0.
pub fn hw_detect() -> HwInfo {
    arch::hw_detect()
}

/// Pure tier scoring over a filled descriptor.
pub fn hw_score(info: &HwInfo) -> Tier {
    hwinfo::score(info)
}

/// Run detection once, score the result and publish the process-wide
/// descriptor. Later calls return the already-published value.
pub fn hw_init() -> &'static HwInfo {
    hwinfo::init_with(hw_detect)
}

// ── IRQ-safe lock ───────────────────────────────────────────────────────────

use core::mem::ManuallyDrop;
use noxiom_utils::{Mutex, MutexGuard};

/// Spin lock that disables interrupts while held.
///
/// Required for any state shared with an interrupt handler (the keyboard
/// ring): taking the plain lock with interrupts enabled could deadlock
/// against the handler spinning on the same lock.
pub struct IrqSafeLock<T> {
    inner: Mutex<T>,
}

impl<T> IrqSafeLock<T> {
    pub const fn new(data: T) -> Self {
        Self {
            inner: Mutex::new(data),
        }
    }

    pub fn lock(&self) -> IrqSafeLockGuard<'_, T> {
        let state = interrupts::disable();
        let guard = self.inner.lock();
        IrqSafeLockGuard {
            guard: ManuallyDrop::new(guard),
            state,
        }
    }
}

pub struct IrqSafeLockGuard<'a, T> {
    guard: ManuallyDrop<MutexGuard<'a, T>>,
    state: u64,
}

impl<T> core::ops::Deref for IrqSafeLockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> core::ops::DerefMut for IrqSafeLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for IrqSafeLockGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the guard is dropped exactly once, before interrupts are
        // restored.
        unsafe { ManuallyDrop::drop(&mut self.guard) };
        interrupts::restore(self.state);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn color_code_packs_vga_nibbles() {
        assert_eq!(ColorCode::new(Color::White, Color::Black).0, 0x0F);
        assert_eq!(ColorCode::new(Color::White, Color::Red).0, 0x4F);
        assert_eq!(ColorCode::new(Color::LightGrey, Color::Black).0, 0x07);
        assert_eq!(ColorCode::new(Color::Black, Color::White).0, 0xF0);
    }

    #[test]
    fn irq_safe_lock_disables_and_restores() {
        // The mocked interrupt flag is process-global; serialize with the
        // other hardware-state tests.
        let _io = crate::x86_64::io::mock_guard();
        interrupts::enable();
        let lock = IrqSafeLock::new(10);
        {
            let mut guard = lock.lock();
            assert_eq!(*guard, 10);
            *guard = 20;
            assert!(!interrupts::is_enabled());
        }
        assert!(interrupts::is_enabled());
        assert_eq!(*lock.lock(), 20);
    }

    #[test]
    fn irq_safe_lock_nests() {
        let _io = crate::x86_64::io::mock_guard();
        interrupts::enable();
        let lock1 = IrqSafeLock::new(1);
        let lock2 = IrqSafeLock::new(2);
        {
            let _g1 = lock1.lock();
            {
                let _g2 = lock2.lock();
                assert!(!interrupts::is_enabled());
            }
            // Inner drop restores to "disabled", not "enabled".
            assert!(!interrupts::is_enabled());
        }
        assert!(interrupts::is_enabled());
    }
}
