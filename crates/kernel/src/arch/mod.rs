//! Architecture-specific boot stubs. Each module carries the assembly that
//! takes the machine from firmware handoff to `kmain`.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "aarch64")]
pub mod aarch64;
