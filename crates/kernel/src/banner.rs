//! Startup banner and hardware summary, printed once before the shell.

use crate::VERSION;
use crate::shell::ShellIo;
use noxiom_hal::{Color, ColorCode, HwInfo};

const RULE: &str =
    "================================================================================";

pub fn print_hw_info(info: &HwInfo, io: &mut dyn ShellIo) {
    io.set_color(ColorCode::new(Color::Yellow, Color::Black).0);
    io.write_str("[hal] CPU: ");
    io.set_color(ColorCode::new(Color::LightGrey, Color::Black).0);
    io.write_str(info.model.as_str());
    io.write_str("  Tier: ");
    io.write_str(info.tier.as_str());
    io.write_str("\n");
}

pub fn print_banner(io: &mut dyn ShellIo) {
    io.set_color(ColorCode::new(Color::Cyan, Color::Black).0);
    io.write_str(RULE);
    io.set_color(ColorCode::new(Color::White, Color::Black).0);
    io.write_str("\n");
    io.write_str("                              N O X I O M   O S\n");
    io.write_str("                         Lightweight Server Operating System\n");
    io.write_str("                                  Version ");
    io.write_str(VERSION);
    io.write_str("\n\n");
    io.set_color(ColorCode::new(Color::Cyan, Color::Black).0);
    io.write_str(RULE);
    io.set_color(ColorCode::new(Color::LightGrey, Color::Black).0);
    io.write_str("\n\nType 'help' for a list of commands.\n\n");
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use noxiom_hal::hwinfo::{self, GIB};

    #[derive(Default)]
    struct CaptureIo {
        output: String,
    }

    impl ShellIo for CaptureIo {
        fn read_byte(&mut self) -> u8 {
            0
        }
        fn write_byte(&mut self, byte: u8) {
            self.output.push(byte as char);
        }
        fn write_str(&mut self, s: &str) {
            self.output.push_str(s);
        }
        fn set_color(&mut self, _attr: u8) {}
        fn clear(&mut self) {}
    }

    #[test]
    fn high_tier_host_is_reported_on_one_line() {
        let mut info = HwInfo::empty();
        info.cpu_cores = 8;
        info.ram_bytes = 8 * GIB;
        let _ = info.model.push_str("Intel(R) Core(TM) i7");
        info.tier = hwinfo::score(&info);

        let mut io = CaptureIo::default();
        print_hw_info(&info, &mut io);
        assert!(io.output.contains("CPU: Intel(R) Core(TM) i7  Tier: HIGH"));
    }

    #[test]
    fn fallback_by_zero_ram() {
        let mut info = HwInfo::empty();
        info.cpu_cores = 4;
        info.ram_bytes = 0;
        info.tier = hwinfo::score(&info);

        let mut io = CaptureIo::default();
        print_hw_info(&info, &mut io);
        assert!(io.output.contains("Tier: FALLBACK"));
    }

    #[test]
    fn banner_names_the_system_and_version() {
        let mut io = CaptureIo::default();
        print_banner(&mut io);
        assert!(io.output.contains("N O X I O M"));
        assert!(io.output.contains("Version 0.1.0"));
        assert!(io.output.contains("Type 'help'"));
    }
}
