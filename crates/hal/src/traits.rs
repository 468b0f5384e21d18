//! The interrupt-controller seam shared by both back-ends.

/// Operations every interrupt controller must provide. The PC back-end
/// implements this for the 8259 PIC pair, the ARM back-end for the GICv2
/// distributor + CPU interface.
pub trait IntController {
    /// Bring the controller to a known state with every source masked.
    fn init(&self);

    /// Unmask one source line.
    fn enable_irq(&self, irq: u32);

    /// Mask one source line.
    fn disable_irq(&self, irq: u32);

    /// Fetch the pending source, if the controller supports acknowledge
    /// reads. Controllers that do not (the PIC, where the vector arrives via
    /// the CPU) report the spurious value.
    fn ack(&self) -> u32;

    /// Signal completion. Must tolerate a second call for the same source.
    fn eoi(&self, irq: u32);

    /// Whether an acknowledged value means "nothing was actually pending".
    fn is_spurious(&self, irq: u32) -> bool;
}
