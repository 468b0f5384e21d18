//! Privileged CPU instructions: descriptor-table loads and the halt
//! primitive. Stubbed out under the `std` feature so descriptor-table logic
//! can be exercised on a hosted target.

/// Pointer operand for `lgdt`/`lidt`.
#[repr(C, packed)]
pub struct DescriptorTablePointer {
    pub limit: u16,
    pub base: u64,
}

#[cfg(not(feature = "std"))]
mod imp {
    use super::DescriptorTablePointer;
    use core::arch::asm;

    /// # Safety
    /// `ptr` must describe a valid GDT that stays alive for the rest of the
    /// kernel's life. The caller must reload the segment registers afterwards.
    pub unsafe fn lgdt(ptr: &DescriptorTablePointer) {
        unsafe { asm!("lgdt [{}]", in(reg) ptr, options(readonly, nostack, preserves_flags)) };
    }

    /// # Safety
    /// `ptr` must describe a valid IDT that stays alive for the rest of the
    /// kernel's life.
    pub unsafe fn lidt(ptr: &DescriptorTablePointer) {
        unsafe { asm!("lidt [{}]", in(reg) ptr, options(readonly, nostack, preserves_flags)) };
    }

    /// Reload CS/DS/ES/FS/GS/SS with the given selectors. Used once after
    /// `lgdt`; the far return through the new code selector completes the
    /// switch.
    ///
    /// # Safety
    /// Both selectors must index valid descriptors in the live GDT.
    pub unsafe fn reload_segments(code: u16, data: u16) {
        unsafe {
            asm!(
                "push {code}",
                "lea {tmp}, [rip + 55f]",
                "push {tmp}",
                "retfq",
                "55:",
                "mov ds, {data:x}",
                "mov es, {data:x}",
                "mov fs, {data:x}",
                "mov gs, {data:x}",
                "mov ss, {data:x}",
                code = in(reg) u64::from(code),
                data = in(reg) data,
                tmp = out(reg) _,
            );
        }
    }

    /// Sleep until the next interrupt.
    #[inline(always)]
    pub fn halt_once() {
        unsafe { asm!("hlt", options(nomem, nostack, preserves_flags)) };
    }

    /// Mask interrupts and park the CPU forever.
    pub fn halt_forever() -> ! {
        unsafe { asm!("cli", options(nomem, nostack)) };
        loop {
            halt_once();
        }
    }
}

#[cfg(feature = "std")]
mod imp {
    use super::DescriptorTablePointer;

    pub unsafe fn lgdt(_ptr: &DescriptorTablePointer) {}
    pub unsafe fn lidt(_ptr: &DescriptorTablePointer) {}
    pub unsafe fn reload_segments(_code: u16, _data: u16) {}
    pub fn halt_once() {
        core::hint::spin_loop();
    }
    pub fn halt_forever() -> ! {
        panic!("halt_forever invoked on a hosted target");
    }
}

pub use imp::*;
