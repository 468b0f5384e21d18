//! Long-mode kernel entry. Stage 2 jumps here at 0x100000 with paging on
//! (1 GiB identity map), interrupts off and a flat boot GDT live.

use core::arch::global_asm;

global_asm!(include_str!("asm/entry.S"));
