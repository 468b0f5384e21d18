//! CPU identification from MIDR_EL1.
//!
//! Lookup is by implementer + part number — identifiers owned by the CPU IP
//! vendors — so the same table serves every board built around the same
//! cores. Apple Silicon is matched on implementer alone because part
//! numbers change every chip generation.
//!
//! MIDR_EL1 layout: [31:24] implementer, [15:4] part number.

use core::fmt::Write;
use heapless::String;

const APPLE: u8 = 0x61;

#[rustfmt::skip]
const CPU_TABLE: &[(u8, u16, &str)] = &[
    // ARM Ltd.
    (0x41, 0xD03, "ARM Cortex-A53"),
    (0x41, 0xD04, "ARM Cortex-A35"),
    (0x41, 0xD05, "ARM Cortex-A55"),
    (0x41, 0xD07, "ARM Cortex-A57"),
    (0x41, 0xD08, "ARM Cortex-A72"),
    (0x41, 0xD09, "ARM Cortex-A73"),
    (0x41, 0xD0A, "ARM Cortex-A75"),
    (0x41, 0xD0B, "ARM Cortex-A76"),
    (0x41, 0xD0C, "ARM Neoverse-N1"),
    (0x41, 0xD0D, "ARM Cortex-A77"),
    (0x41, 0xD40, "ARM Neoverse-V1"),
    (0x41, 0xD41, "ARM Cortex-A78"),
    (0x41, 0xD44, "ARM Cortex-X1"),
    (0x41, 0xD46, "ARM Cortex-A510"),
    (0x41, 0xD47, "ARM Cortex-A710"),
    (0x41, 0xD48, "ARM Cortex-X2"),
    (0x41, 0xD4B, "ARM Cortex-A78C"),
    (0x41, 0xD4D, "ARM Cortex-A715"),
    (0x41, 0xD4E, "ARM Cortex-X3"),
    // Apple Silicon: implementer-only match.
    (APPLE, 0x000, "Apple Silicon"),
    // Qualcomm.
    (0x51, 0x800, "Qualcomm Kryo"),
    (0x51, 0x801, "Qualcomm Kryo"),
    (0x51, 0x802, "Qualcomm Kryo"),
    // Broadcom (Pi 1/2 era).
    (0x42, 0x00F, "Broadcom Cortex-A7"),
];

pub fn model_name(implementer: u8, part: u16) -> Option<&'static str> {
    CPU_TABLE
        .iter()
        .find(|(imp, p, _)| *imp == implementer && (*imp == APPLE || *p == part))
        .map(|(_, _, name)| *name)
}

pub fn format_model(implementer: u8, part: u16) -> String<128> {
    let mut out = String::new();
    match model_name(implementer, part) {
        Some(name) => {
            let _ = out.push_str(name);
        }
        None => {
            let _ = write!(out, "AArch64 CPU (impl={implementer:#04x} part={part:#05x})");
        }
    }
    out
}

#[cfg(all(target_arch = "aarch64", not(feature = "std")))]
fn read_midr() -> u64 {
    use aarch64_cpu::registers::{MIDR_EL1, Readable};
    MIDR_EL1.get()
}

// Hosted builds report a Cortex-A53 shape so the formatting path stays
// exercised end to end.
#[cfg(any(not(target_arch = "aarch64"), feature = "std"))]
fn read_midr() -> u64 {
    0x410F_D034
}

pub fn detect() -> String<128> {
    let midr = read_midr();
    let implementer = ((midr >> 24) & 0xFF) as u8;
    let part = ((midr >> 4) & 0xFFF) as u16;
    format_model(implementer, part)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_parts_resolve_by_implementer_and_part() {
        assert_eq!(model_name(0x41, 0xD03), Some("ARM Cortex-A53"));
        assert_eq!(model_name(0x41, 0xD08), Some("ARM Cortex-A72"));
        assert_eq!(model_name(0x41, 0xD0B), Some("ARM Cortex-A76"));
        assert_eq!(model_name(0x42, 0x00F), Some("Broadcom Cortex-A7"));
    }

    #[test]
    fn apple_matches_on_implementer_alone() {
        assert_eq!(model_name(0x61, 0x023), Some("Apple Silicon"));
        assert_eq!(model_name(0x61, 0xFFF), Some("Apple Silicon"));
    }

    #[test]
    fn unknown_parts_format_the_raw_fields() {
        let s = format_model(0x99, 0x123);
        assert_eq!(s.as_str(), "AArch64 CPU (impl=0x99 part=0x123)");
    }

    #[test]
    fn unknown_arm_part_is_not_misattributed() {
        assert_eq!(model_name(0x41, 0xFFF), None);
    }

    // Only meaningful against the hosted stub value.
    #[cfg(feature = "std")]
    #[test]
    fn detect_reports_a_model_string() {
        assert_eq!(detect().as_str(), "ARM Cortex-A53");
    }
}
