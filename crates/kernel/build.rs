use std::env;

fn main() {
    println!("cargo:rerun-if-changed=linker/x86_64.ld");
    println!("cargo:rerun-if-changed=linker/aarch64.ld");

    // Bare-metal images link against the arch's fixed load address; hosted
    // builds (tests, tooling) keep the default layout.
    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if os == "none" {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let dir = env::var("CARGO_MANIFEST_DIR").unwrap();
        println!("cargo:rustc-link-arg-bins=-T{dir}/linker/{arch}.ld");
    }
}
