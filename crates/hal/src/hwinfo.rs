//! Hardware descriptor and tier scoring.
//!
//! The descriptor is filled once during boot by the arch back-end, scored by
//! the portable `score` function, published through a `Once`, and read-only
//! from then on. No locking is needed: publication happens before interrupts
//! are enabled.

use heapless::String;
use noxiom_utils::Once;

pub const MIB: u64 = 1024 * 1024;
pub const GIB: u64 = 1024 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Arm64,
    Unknown,
}

/// Hardware capability classes, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Detection failed or the host is below every threshold.
    Fallback,
    Low,
    Mid,
    High,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::High => "HIGH",
            Tier::Mid => "MID",
            Tier::Low => "LOW",
            Tier::Fallback => "FALLBACK",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HwInfo {
    pub arch: Arch,
    /// Logical core count; 0 means detection failed.
    pub cpu_cores: u32,
    /// Total detectable RAM in bytes; 0 means unknown.
    pub ram_bytes: u64,
    /// CPU model (CPUID brand string or MIDR part name).
    pub model: String<128>,
    /// Matched DTB compatible string (ARM only; empty on PC).
    pub compat: &'static str,
    /// Peripheral MMIO bases discovered at boot; 0 = absent / not applicable.
    pub uart_base: u64,
    pub intc_base: u64,
    pub intc_dist_base: u64,
    pub tier: Tier,
}

impl HwInfo {
    pub fn empty() -> Self {
        Self {
            arch: Arch::Unknown,
            cpu_cores: 0,
            ram_bytes: 0,
            model: String::new(),
            compat: "",
            uart_base: 0,
            intc_base: 0,
            intc_dist_base: 0,
            tier: Tier::Fallback,
        }
    }
}

/// Classify the host from the detected core count and RAM size.
///
/// Pure function; first matching row wins:
///
/// | condition                    | tier     |
/// |------------------------------|----------|
/// | cores == 0 or ram == 0       | FALLBACK |
/// | cores >= 4 and ram >= 2 GiB  | HIGH     |
/// | cores >= 2 and ram >= 512 MiB| MID      |
/// | ram >= 128 MiB               | LOW      |
/// | otherwise                    | FALLBACK |
pub fn score(info: &HwInfo) -> Tier {
    let cores = info.cpu_cores;
    let ram = info.ram_bytes;

    if cores == 0 || ram == 0 {
        return Tier::Fallback;
    }
    if cores >= 4 && ram >= 2 * GIB {
        return Tier::High;
    }
    if cores >= 2 && ram >= 512 * MIB {
        return Tier::Mid;
    }
    if ram >= 128 * MIB {
        return Tier::Low;
    }
    Tier::Fallback
}

static HW_INFO: Once<HwInfo> = Once::new();

/// Detect, score and publish the process-wide descriptor. Only the first
/// call runs `detect`; later calls return the published value.
pub fn init_with(detect: impl FnOnce() -> HwInfo) -> &'static HwInfo {
    HW_INFO.call_once(|| {
        let mut info = detect();
        info.tier = score(&info);
        info
    })
}

/// The published descriptor, if boot has already detected hardware.
pub fn get() -> Option<&'static HwInfo> {
    HW_INFO.get()
}

// ============================================================================
// Unit Tests
// ============================================================================
