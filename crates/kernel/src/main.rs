//! Kernel binary: arch boot stubs plus the portable entry point.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod arch;

#[cfg(target_os = "none")]
mod boot {
    use log::LevelFilter;
    use noxiom_hal as hal;
    use noxiom_kernel::{HalIo, banner, logger, shell};

    /// Portable entry point, reached from the arch stub with a live stack
    /// and zeroed BSS.
    ///
    /// The order is deliberate: serial first so every later step can report
    /// a failure, then detection (needs nothing but the DTB / CPUID), then
    /// CPU tables before the interrupt controller, display and input last.
    #[unsafe(no_mangle)]
    pub extern "C" fn kmain() -> ! {
        hal::serial_init();
        logger::init(LevelFilter::Info);
        log::info!("kernel started");

        let info = hal::hw_init();
        log::info!("hw detected");

        hal::cpu_init();
        log::info!("cpu ok");

        hal::intc_init();
        log::info!("intc ok");

        hal::display_init();
        log::info!("display ok");

        hal::input_init();
        log::info!("input ok");

        let mut io = HalIo;
        banner::print_hw_info(info, &mut io);
        banner::print_banner(&mut io);
        log::info!("entering shell");

        let mut sh = shell::Shell::new();
        sh.run(&mut io);

        // The shell only returns on a halt request.
        hal::halt()
    }

    #[panic_handler]
    fn panic(info: &core::panic::PanicInfo) -> ! {
        noxiom_hal::println!("\nKERNEL PANIC: {}", info);
        noxiom_hal::halt()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("noxiom-kernel is a freestanding image; build it with");
    eprintln!("  cargo build -p noxiom-kernel --target x86_64-unknown-none --release");
    eprintln!("  cargo build -p noxiom-kernel --target aarch64-unknown-none --release");
}
