//! Runtime hardware discovery from the Flattened Device Tree.
//!
//! The firmware hands over one pointer; everything else — UART, GIC, RAM,
//! CPU count — is found by walking the tree. Matching is strictly against
//! IP-block `compatible` identifiers (defined by ARM or Broadcom), never
//! against board model strings: the same binary must run on any SoC built
//! from the same IP blocks.

use fdt::Fdt;
use fdt::node::FdtNode;
use noxiom_utils::Once;

/// UART IP blocks we can drive.
pub const UART_COMPATIBLE: &[&str] = &["arm,pl011", "brcm,bcm2835-aux-uart"];

/// GIC flavors with a v2-compatible programming model.
pub const GIC_COMPATIBLE: &[&str] = &["arm,cortex-a15-gic", "arm,gic-400", "arm,gic-v3"];

/// Everything the kernel needs from the device tree. All fields stay zero
/// for hardware the tree did not describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtbInfo {
    pub uart_base: u64,
    pub uart_compat: &'static str,
    pub gic_dist_base: u64,
    pub gic_cpu_base: u64,
    pub ram_base: u64,
    pub ram_size: u64,
    pub cpu_count: u32,
}

impl DtbInfo {
    pub const fn empty() -> Self {
        Self {
            uart_base: 0,
            uart_compat: "",
            gic_dist_base: 0,
            gic_cpu_base: 0,
            ram_base: 0,
            ram_size: 0,
            cpu_count: 0,
        }
    }

    /// Parse the blob the firmware left at `addr`. A null pointer or a blob
    /// without the FDT magic yields the zeroed result; the kernel then boots
    /// in FALLBACK mode.
    pub fn parse(addr: usize) -> Self {
        if addr == 0 {
            return Self::empty();
        }
        // SAFETY: a non-null addr is the firmware-provided DTB pointer; the
        // header (magic and total size) is validated before the tree is
        // walked.
        match unsafe { Fdt::from_ptr(addr as *const u8) } {
            Ok(tree) => Self::from_tree(&tree),
            Err(_) => Self::empty(),
        }
    }

    /// Parse from an in-memory blob. Same contract as [`DtbInfo::parse`].
    pub fn parse_bytes(blob: &[u8]) -> Self {
        match Fdt::new(blob) {
            Ok(tree) => Self::from_tree(&tree),
            Err(_) => Self::empty(),
        }
    }

    fn from_tree(tree: &Fdt) -> Self {
        let mut info = Self::empty();

        if let Some(root) = tree.find_node("/") {
            for child in root.children() {
                if child.name == "memory" || child.name.starts_with("memory@") {
                    if let Some((base, size)) = reg_region(&child, 0) {
                        info.ram_base = base;
                        info.ram_size = size;
                    }
                } else if child.name == "cpus" {
                    info.cpu_count =
                        child.children().filter(|n| n.name.starts_with("cpu@")).count() as u32;
                }
            }
        }

        if let Some((node, compat)) = first_compatible(tree, UART_COMPATIBLE) {
            if let Some((base, _)) = reg_region(&node, 0) {
                info.uart_base = base;
                info.uart_compat = compat;
            }
        }

        if let Some((node, _)) = first_compatible(tree, GIC_COMPATIBLE) {
            if let Some((base, _)) = reg_region(&node, 0) {
                info.gic_dist_base = base;
            }
            // The CPU interface is the second reg region.
            if let Some((base, _)) = reg_region(&node, 1) {
                info.gic_cpu_base = base;
            }
        }

        info
    }
}

/// First node in document order whose `compatible` list contains one of the
/// given IP-block identifiers.
fn first_compatible<'b, 'a>(
    tree: &'b Fdt<'a>,
    allow: &[&'static str],
) -> Option<(FdtNode<'b, 'a>, &'static str)> {
    for node in tree.all_nodes() {
        if let Some(compat) = node.compatible() {
            for want in allow {
                if compat.all().any(|s| s == *want) {
                    return Some((node, *want));
                }
            }
        }
    }
    None
}

/// The `index`-th `(address, size)` pair of a node's reg property.
fn reg_region(node: &FdtNode, index: usize) -> Option<(u64, u64)> {
    let region = node.reg()?.nth(index)?;
    Some((
        region.starting_address as u64,
        region.size.unwrap_or(0) as u64,
    ))
}

static DTB: Once<DtbInfo> = Once::new();

/// Parse once at first use and cache the result; discovery happens lazily
/// from whichever HAL operation runs first (normally `serial_init`).
pub fn probe() -> &'static DtbInfo {
    DTB.call_once(|| DtbInfo::parse(super::dtb_addr()))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::vec::Vec;

    const FDT_BEGIN_NODE: u32 = 1;
    const FDT_END_NODE: u32 = 2;
    const FDT_PROP: u32 = 3;
    const FDT_END: u32 = 9;

    /// Small builder emitting structurally valid DTB blobs so the tests do
    /// not depend on hand-computed offsets.
    struct DtbBuilder {
        structure: Vec<u8>,
        strings: Vec<u8>,
    }

    impl DtbBuilder {
        fn new() -> Self {
            Self {
                structure: Vec::new(),
                strings: Vec::new(),
            }
        }

        fn token(&mut self, t: u32) {
            self.structure.extend_from_slice(&t.to_be_bytes());
        }

        fn pad4(&mut self) {
            while self.structure.len() % 4 != 0 {
                self.structure.push(0);
            }
        }

        fn intern(&mut self, name: &str) -> u32 {
            let off = self.strings.len() as u32;
            self.strings.extend_from_slice(name.as_bytes());
            self.strings.push(0);
            off
        }

        fn begin_node(&mut self, name: &str) -> &mut Self {
            self.token(FDT_BEGIN_NODE);
            self.structure.extend_from_slice(name.as_bytes());
            self.structure.push(0);
            self.pad4();
            self
        }

        fn end_node(&mut self) -> &mut Self {
            self.token(FDT_END_NODE);
            self
        }

        fn prop(&mut self, name: &str, value: &[u8]) -> &mut Self {
            let nameoff = self.intern(name);
            self.token(FDT_PROP);
            self.structure
                .extend_from_slice(&(value.len() as u32).to_be_bytes());
            self.structure.extend_from_slice(&nameoff.to_be_bytes());
            self.structure.extend_from_slice(value);
            self.pad4();
            self
        }

        fn prop_u32(&mut self, name: &str, value: u32) -> &mut Self {
            self.prop(name, &value.to_be_bytes())
        }

        fn prop_str(&mut self, name: &str, value: &str) -> &mut Self {
            let mut bytes = Vec::from(value.as_bytes());
            bytes.push(0);
            self.prop(name, &bytes)
        }

        fn prop_cells(&mut self, name: &str, cells: &[u32]) -> &mut Self {
            let mut bytes = Vec::new();
            for c in cells {
                bytes.extend_from_slice(&c.to_be_bytes());
            }
            self.prop(name, &bytes)
        }

        fn finish(mut self) -> Vec<u8> {
            self.token(FDT_END);

            let header_len = 40u32;
            let rsvmap_len = 16u32;
            let off_dt_struct = header_len + rsvmap_len;
            let off_dt_strings = off_dt_struct + self.structure.len() as u32;
            let totalsize = off_dt_strings + self.strings.len() as u32;

            let mut blob = Vec::new();
            for field in [
                0xD00D_FEEDu32, // magic
                totalsize,
                off_dt_struct,
                off_dt_strings,
                header_len, // off_mem_rsvmap
                17,         // version
                16,         // last_comp_version
                0,          // boot_cpuid_phys
                self.strings.len() as u32,
                self.structure.len() as u32,
            ] {
                blob.extend_from_slice(&field.to_be_bytes());
            }
            // Empty memory reservation block: one all-zero terminator entry.
            blob.extend_from_slice(&[0u8; 16]);
            blob.extend_from_slice(&self.structure);
            blob.extend_from_slice(&self.strings);
            blob
        }
    }

    /// DTB shaped like a Pi 4: 1 GiB of RAM, four CPUs, a PL011 under /soc
    /// and a GIC-400 with distributor + CPU interface regions.
    fn pi_like_blob() -> Vec<u8> {
        let mut b = DtbBuilder::new();
        b.begin_node("");
        b.prop_u32("#address-cells", 1);
        b.prop_u32("#size-cells", 1);
        b.prop_str("compatible", "raspberrypi,4-model-b");

        b.begin_node("memory@0");
        b.prop_str("device_type", "memory");
        b.prop_cells("reg", &[0x0000_0000, 0x4000_0000]);
        b.end_node();

        b.begin_node("cpus");
        for i in 0..4u32 {
            b.begin_node(match i {
                0 => "cpu@0",
                1 => "cpu@1",
                2 => "cpu@2",
                _ => "cpu@3",
            });
            b.prop_str("device_type", "cpu");
            b.end_node();
        }
        b.end_node();

        b.begin_node("soc");
        b.prop_u32("#address-cells", 1);
        b.prop_u32("#size-cells", 1);
        b.begin_node("serial@7e201000");
        b.prop_str("compatible", "arm,pl011");
        b.prop_cells("reg", &[0x7E20_1000, 0x1000]);
        b.end_node();
        b.end_node();

        b.begin_node("intc@ff841000");
        b.prop_str("compatible", "arm,gic-400");
        b.prop_cells("reg", &[0xFF84_1000, 0x1000, 0xFF84_2000, 0x2000]);
        b.end_node();

        b.end_node();
        b.finish()
    }

    #[test]
    fn null_pointer_yields_zeroed_result() {
        assert_eq!(DtbInfo::parse(0), DtbInfo::empty());
    }

    #[test]
    fn bad_magic_yields_zeroed_result() {
        let mut blob = pi_like_blob();
        blob[0] = 0xBA;
        blob[1] = 0xD0;
        assert_eq!(DtbInfo::parse_bytes(&blob), DtbInfo::empty());
    }

    #[test]
    fn truncated_blob_yields_zeroed_result() {
        assert_eq!(DtbInfo::parse_bytes(&[0xD0, 0x0D]), DtbInfo::empty());
    }

    #[test]
    fn pi_like_tree_is_fully_discovered() {
        let info = DtbInfo::parse_bytes(&pi_like_blob());
        assert_eq!(info.ram_base, 0);
        assert_eq!(info.ram_size, 0x4000_0000);
        assert_eq!(info.cpu_count, 4);
        assert_eq!(info.uart_base, 0x7E20_1000);
        assert_eq!(info.uart_compat, "arm,pl011");
        assert_eq!(info.gic_dist_base, 0xFF84_1000);
        assert_eq!(info.gic_cpu_base, 0xFF84_2000);
    }

    #[test]
    fn board_names_are_never_matched() {
        // A tree whose only compatible strings are board models must leave
        // every peripheral base at zero.
        let mut b = DtbBuilder::new();
        b.begin_node("");
        b.prop_u32("#address-cells", 1);
        b.prop_u32("#size-cells", 1);
        b.prop_str("compatible", "raspberrypi,4-model-b");
        b.begin_node("memory@0");
        b.prop_str("device_type", "memory");
        b.prop_cells("reg", &[0, 0x2000_0000]);
        b.end_node();
        b.end_node();
        let info = DtbInfo::parse_bytes(&b.finish());

        assert_eq!(info.uart_base, 0);
        assert_eq!(info.gic_dist_base, 0);
        assert_eq!(info.gic_cpu_base, 0);
        // ...while fields with a provenance node are still filled.
        assert_eq!(info.ram_size, 0x2000_0000);
    }

    #[test]
    fn empty_tree_leaves_every_field_zero() {
        let mut b = DtbBuilder::new();
        b.begin_node("");
        b.end_node();
        assert_eq!(DtbInfo::parse_bytes(&b.finish()), DtbInfo::empty());
    }

    #[test]
    fn first_uart_match_wins() {
        let mut b = DtbBuilder::new();
        b.begin_node("");
        b.prop_u32("#address-cells", 1);
        b.prop_u32("#size-cells", 1);
        b.begin_node("serial@9000000");
        b.prop_str("compatible", "arm,pl011");
        b.prop_cells("reg", &[0x0900_0000, 0x1000]);
        b.end_node();
        b.begin_node("serial@9001000");
        b.prop_str("compatible", "arm,pl011");
        b.prop_cells("reg", &[0x0900_1000, 0x1000]);
        b.end_node();
        b.end_node();
        let info = DtbInfo::parse_bytes(&b.finish());
        assert_eq!(info.uart_base, 0x0900_0000);
    }
}
