use std::env;

fn main() {
    println!("cargo:rerun-if-changed=boot.ld");
    println!("cargo:rerun-if-changed=src/stage1.S");
    println!("cargo:rerun-if-changed=src/stage2.S");

    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if os == "none" {
        let dir = env::var("CARGO_MANIFEST_DIR").unwrap();
        println!("cargo:rustc-link-arg-bins=-T{dir}/boot.ld");
    }
}
