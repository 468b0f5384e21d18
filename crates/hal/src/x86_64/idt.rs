//! Interrupt descriptor table and the Rust side of interrupt dispatch.
//!
//! CPU exceptions 0-31 print their name and stop the machine; hardware IRQs
//! (remapped to vectors 32-47 by the PIC) are routed to their driver and
//! completed with an EOI.

use super::cpu::{self, DescriptorTablePointer};
use super::gdt::KERNEL_CODE;
use super::{keyboard, pic, vga};
use crate::{Color, ColorCode};
use noxiom_utils::Mutex;

/// Register snapshot built by the common interrupt stub.
///
/// Field order is the exact memory layout produced by the push sequence in
/// `asm/interrupts.S`: general-purpose registers, then the normalized
/// `(int_no, err_code)` pair, then the frame the CPU pushed itself.
#[repr(C)]
pub struct InterruptFrame {
    pub rax: u64,
    pub rbx: u64,
    pub rcx: u64,
    pub rdx: u64,
    pub rbp: u64,
    pub rsi: u64,
    pub rdi: u64,
    pub r8: u64,
    pub r9: u64,
    pub r10: u64,
    pub r11: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,
    pub int_no: u64,
    pub err_code: u64,
    pub rip: u64,
    pub cs: u64,
    pub rflags: u64,
    pub rsp: u64,
    pub ss: u64,
}

#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct IdtEntry {
    offset_low: u16,
    selector: u16,
    ist: u8,
    type_attr: u8,
    offset_mid: u16,
    offset_high: u32,
    zero: u32,
}

impl IdtEntry {
    pub const fn missing() -> Self {
        Self {
            offset_low: 0,
            selector: 0,
            ist: 0,
            type_attr: 0,
            offset_mid: 0,
            offset_high: 0,
            zero: 0,
        }
    }

    pub fn set_handler(&mut self, handler: u64) {
        self.offset_low = handler as u16;
        self.selector = KERNEL_CODE;
        self.ist = 0;
        // Interrupt gate, present, ring 0.
        self.type_attr = 0x8E;
        self.offset_mid = (handler >> 16) as u16;
        self.offset_high = (handler >> 32) as u32;
        self.zero = 0;
    }
}

#[repr(C, align(16))]
pub struct Idt([IdtEntry; 256]);

impl Idt {
    pub const fn new() -> Self {
        Self([IdtEntry::missing(); 256])
    }

    pub fn set_handler(&mut self, index: u8, handler: u64) {
        self.0[index as usize].set_handler(handler);
    }

    pub fn load(&self) {
        let ptr = DescriptorTablePointer {
            limit: (core::mem::size_of::<Self>() - 1) as u16,
            base: self as *const _ as u64,
        };
        unsafe { cpu::lidt(&ptr) };
    }
}

static IDT: Mutex<Idt> = Mutex::new(Idt::new());

static EXCEPTION_NAMES: [&str; 32] = [
    "Divide-by-Zero",
    "Debug",
    "NMI",
    "Breakpoint",
    "Overflow",
    "Bound Range Exceeded",
    "Invalid Opcode",
    "Device Not Available",
    "Double Fault",
    "Coprocessor Segment Overrun",
    "Invalid TSS",
    "Segment Not Present",
    "Stack-Segment Fault",
    "General Protection Fault",
    "Page Fault",
    "Reserved",
    "x87 FP Exception",
    "Alignment Check",
    "Machine Check",
    "SIMD FP Exception",
    "Virtualization",
    "Control Protection",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "Security Exception",
    "Reserved",
];

#[cfg(all(target_arch = "x86_64", not(feature = "std")))]
mod stubs {
    core::arch::global_asm!(include_str!("asm/interrupts.S"));

    macro_rules! declare_stubs {
        ($($name:ident),+ $(,)?) => {
            unsafe extern "C" {
                $( pub fn $name(); )+
            }
        };
    }

    declare_stubs!(
        isr0, isr1, isr2, isr3, isr4, isr5, isr6, isr7, isr8, isr9, isr10, isr11, isr12, isr13,
        isr14, isr15, isr16, isr17, isr18, isr19, isr20, isr21, isr22, isr23, isr24, isr25, isr26,
        isr27, isr28, isr29, isr30, isr31, irq0, irq1, irq2, irq3, irq4, irq5, irq6, irq7, irq8,
        irq9, irq10, irq11, irq12, irq13, irq14, irq15,
    );

    pub fn exception_stubs() -> [u64; 32] {
        [
            isr0 as usize as u64,
            isr1 as usize as u64,
            isr2 as usize as u64,
            isr3 as usize as u64,
            isr4 as usize as u64,
            isr5 as usize as u64,
            isr6 as usize as u64,
            isr7 as usize as u64,
            isr8 as usize as u64,
            isr9 as usize as u64,
            isr10 as usize as u64,
            isr11 as usize as u64,
            isr12 as usize as u64,
            isr13 as usize as u64,
            isr14 as usize as u64,
            isr15 as usize as u64,
            isr16 as usize as u64,
            isr17 as usize as u64,
            isr18 as usize as u64,
            isr19 as usize as u64,
            isr20 as usize as u64,
            isr21 as usize as u64,
            isr22 as usize as u64,
            isr23 as usize as u64,
            isr24 as usize as u64,
            isr25 as usize as u64,
            isr26 as usize as u64,
            isr27 as usize as u64,
            isr28 as usize as u64,
            isr29 as usize as u64,
            isr30 as usize as u64,
            isr31 as usize as u64,
        ]
    }

    pub fn irq_stubs() -> [u64; 16] {
        [
            irq0 as usize as u64,
            irq1 as usize as u64,
            irq2 as usize as u64,
            irq3 as usize as u64,
            irq4 as usize as u64,
            irq5 as usize as u64,
            irq6 as usize as u64,
            irq7 as usize as u64,
            irq8 as usize as u64,
            irq9 as usize as u64,
            irq10 as usize as u64,
            irq11 as usize as u64,
            irq12 as usize as u64,
            irq13 as usize as u64,
            irq14 as usize as u64,
            irq15 as usize as u64,
        ]
    }
}

/// Install gates for exceptions 0-31 and IRQs 32-47, load the table and
/// enable interrupts. The enable must come last; nothing may unmask before
/// the gates exist.
pub fn init() {
    #[cfg(all(target_arch = "x86_64", not(feature = "std")))]
    {
        let mut idt = IDT.lock();
        for (i, stub) in stubs::exception_stubs().iter().enumerate() {
            idt.set_handler(i as u8, *stub);
        }
        for (i, stub) in stubs::irq_stubs().iter().enumerate() {
            idt.set_handler(32 + i as u8, *stub);
        }
        idt.load();
    }
    crate::interrupts::enable();
}

#[unsafe(no_mangle)]
extern "C" fn interrupt_dispatch(frame: &mut InterruptFrame) {
    if frame.int_no < 32 {
        handle_exception(frame);
    } else {
        handle_irq(frame);
    }
}

fn handle_exception(frame: &InterruptFrame) -> ! {
    let name = EXCEPTION_NAMES[frame.int_no as usize];
    vga::set_color(ColorCode::new(Color::White, Color::Red).0);
    vga::print("\n*** KERNEL EXCEPTION: ");
    vga::print(name);
    vga::print(" ***\n");
    crate::println!(
        "*** KERNEL EXCEPTION: {} (vector {}, err {:#x}) at {:#x} ***",
        name,
        frame.int_no,
        frame.err_code,
        frame.rip
    );
    cpu::halt_forever()
}

fn handle_irq(frame: &InterruptFrame) {
    if frame.int_no == 33 {
        keyboard::handle_irq();
    }
    pic::send_eoi((frame.int_no - 32) as u8);
}

// ============================================================================
// Unit Tests
// ============================================================================
