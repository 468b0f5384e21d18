//! Global interrupt enable/disable, one implementation per architecture.
//!
//! `disable` returns the previous state so critical sections nest: restoring
//! re-enables only if interrupts were enabled when the section was entered.

#[cfg(all(target_arch = "x86_64", not(feature = "std")))]
mod imp {
    use core::arch::asm;

    const RFLAGS_IF: u64 = 1 << 9;

    pub fn disable() -> u64 {
        let rflags: u64;
        unsafe {
            asm!("pushfq", "pop {}", "cli", out(reg) rflags, options(nomem));
        }
        rflags
    }

    pub fn restore(state: u64) {
        if state & RFLAGS_IF != 0 {
            enable();
        }
    }

    pub fn enable() {
        unsafe { asm!("sti", options(nomem, nostack)) };
    }

    pub fn is_enabled() -> bool {
        let rflags: u64;
        unsafe {
            asm!("pushfq", "pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        rflags & RFLAGS_IF != 0
    }
}

#[cfg(all(target_arch = "aarch64", not(feature = "std")))]
mod imp {
    use core::arch::asm;

    const DAIF_IRQ: u64 = 1 << 7;

    pub fn disable() -> u64 {
        let daif: u64;
        unsafe {
            asm!("mrs {}, daif", "msr daifset, #2", out(reg) daif, options(nomem, nostack));
        }
        daif
    }

    pub fn restore(state: u64) {
        if state & DAIF_IRQ == 0 {
            enable();
        }
    }

    pub fn enable() {
        unsafe { asm!("msr daifclr, #2", options(nomem, nostack)) };
    }

    pub fn is_enabled() -> bool {
        let daif: u64;
        unsafe { asm!("mrs {}, daif", out(reg) daif, options(nomem, nostack)) };
        daif & DAIF_IRQ == 0
    }
}

// Host tests: model the interrupt flag as a process-global bool so the
// IrqSafeLock protocol is checkable without privileged instructions.
#[cfg(feature = "std")]
mod imp {
    use core::sync::atomic::{AtomicBool, Ordering};

    static ENABLED: AtomicBool = AtomicBool::new(true);

    pub fn disable() -> u64 {
        ENABLED.swap(false, Ordering::SeqCst) as u64
    }

    pub fn restore(state: u64) {
        if state != 0 {
            enable();
        }
    }

    pub fn enable() {
        ENABLED.store(true, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        ENABLED.load(Ordering::SeqCst)
    }
}

pub use imp::{disable, enable, is_enabled, restore};
