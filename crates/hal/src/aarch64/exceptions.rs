//! Exception vector installation and the report-and-halt handler behind it.

#[cfg(all(target_arch = "aarch64", not(feature = "std")))]
core::arch::global_asm!(include_str!("asm/vectors.S"));

static CLASS_NAMES: [&str; 16] = [
    "Synchronous (SP_EL0)",
    "IRQ (SP_EL0)",
    "FIQ (SP_EL0)",
    "SError (SP_EL0)",
    "Synchronous",
    "IRQ",
    "FIQ",
    "SError",
    "Synchronous (lower EL)",
    "IRQ (lower EL)",
    "FIQ (lower EL)",
    "SError (lower EL)",
    "Synchronous (lower EL, AArch32)",
    "IRQ (lower EL, AArch32)",
    "FIQ (lower EL, AArch32)",
    "SError (lower EL, AArch32)",
];

/// Called from every vector slot with the slot index and the syndrome
/// registers already sampled. Reports over the UART and parks the CPU.
#[unsafe(no_mangle)]
extern "C" fn aarch64_exception_entry(slot: u64, esr: u64, elr: u64) -> ! {
    let name = CLASS_NAMES[(slot & 0xF) as usize];
    crate::println!("\n*** KERNEL EXCEPTION: {} ***", name);
    crate::println!("ESR_EL1: {:#018x}  ELR_EL1: {:#018x}", esr, elr);
    super::halt()
}

/// Point VBAR_EL1 at the vector table. The boot stub already did this
/// before `kmain`; repeating it here keeps `cpu_init` self-contained.
pub fn install() {
    #[cfg(all(target_arch = "aarch64", not(feature = "std")))]
    {
        use aarch64_cpu::registers::{VBAR_EL1, Writeable};
        unsafe extern "C" {
            static exception_vectors: u8;
        }
        let base = unsafe { core::ptr::addr_of!(exception_vectors) } as u64;
        VBAR_EL1.set(base);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_vector_slot_has_a_name() {
        assert_eq!(CLASS_NAMES.len(), 16);
        assert_eq!(CLASS_NAMES[4], "Synchronous");
        assert_eq!(CLASS_NAMES[5], "IRQ");
    }
}
