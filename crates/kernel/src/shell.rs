//! Line-edited read-eval-dispatch shell over the HAL display and input.
//!
//! The loop owns a 256-byte line buffer. Committed lines are split on space
//! runs into at most 16 arguments; the first selects a built-in command.
//! Dispatch reports whether to keep going or halt, so the loop itself never
//! needs to reach for the halt primitive — its caller does.

use crate::VERSION;
use noxiom_hal::{Color, ColorCode};

pub const LINE_CAP: usize = 256;
const MAX_ARGS: usize = 16;

/// What the shell talks through. The kernel binary wires this to the HAL;
/// tests script input and capture output.
pub trait ShellIo {
    fn read_byte(&mut self) -> u8;
    fn write_byte(&mut self, byte: u8);
    fn write_str(&mut self, s: &str);
    fn set_color(&mut self, attr: u8);
    fn clear(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Halt,
}

pub struct Shell {
    line: [u8; LINE_CAP],
    len: usize,
}

impl Shell {
    pub const fn new() -> Self {
        Self {
            line: [0; LINE_CAP],
            len: 0,
        }
    }

    /// Read-dispatch loop. Returns only when a command asked for the halt;
    /// the caller then invokes the HAL halt primitive.
    pub fn run(&mut self, io: &mut dyn ShellIo) {
        self.len = 0;
        prompt(io);

        loop {
            let byte = io.read_byte();

            match byte {
                b'\n' => {
                    io.write_byte(b'\n');
                    let line = core::str::from_utf8(&self.line[..self.len]).unwrap_or("");
                    if dispatch(line, io) == Outcome::Halt {
                        return;
                    }
                    self.len = 0;
                    prompt(io);
                }
                0x08 => {
                    if self.len > 0 {
                        self.len -= 1;
                        io.write_byte(0x08);
                    }
                }
                // Printable bytes are echoed and buffered; anything past the
                // capacity is dropped without feedback.
                0x20..=0x7E => {
                    if self.len < LINE_CAP - 1 {
                        self.line[self.len] = byte;
                        self.len += 1;
                        io.write_byte(byte);
                    }
                }
                _ => {}
            }
        }
    }
}

fn prompt(io: &mut dyn ShellIo) {
    io.set_color(ColorCode::new(Color::LightGreen, Color::Black).0);
    io.write_str("noxiom");
    io.set_color(ColorCode::new(Color::White, Color::Black).0);
    io.write_str("> ");
    io.set_color(ColorCode::new(Color::LightGrey, Color::Black).0);
}

/// Split on space runs; arguments past the sixteenth are dropped.
fn parse<'a>(line: &'a str, argv: &mut [&'a str; MAX_ARGS]) -> usize {
    let mut argc = 0;
    for token in line.split(' ') {
        if token.is_empty() {
            continue;
        }
        if argc < MAX_ARGS {
            argv[argc] = token;
            argc += 1;
        }
    }
    argc
}

/// Execute one committed line. An empty line is a silent no-op.
pub fn dispatch(line: &str, io: &mut dyn ShellIo) -> Outcome {
    let mut argv = [""; MAX_ARGS];
    let argc = parse(line, &mut argv);
    if argc == 0 {
        return Outcome::Continue;
    }

    match argv[0] {
        "help" => cmd_help(io),
        "clear" => io.clear(),
        "echo" => cmd_echo(&argv[1..argc], io),
        "version" => cmd_version(io),
        "halt" => {
            io.set_color(ColorCode::new(Color::LightRed, Color::Black).0);
            io.write_str("System halted.\n");
            return Outcome::Halt;
        }
        unknown => {
            io.set_color(ColorCode::new(Color::LightRed, Color::Black).0);
            io.write_str("Unknown command: ");
            io.write_str(unknown);
            io.write_str("\n");
            io.set_color(ColorCode::new(Color::LightGrey, Color::Black).0);
        }
    }

    Outcome::Continue
}

fn cmd_help(io: &mut dyn ShellIo) {
    io.set_color(ColorCode::new(Color::Yellow, Color::Black).0);
    io.write_str("Noxiom OS built-in commands:\n");
    io.set_color(ColorCode::new(Color::LightGrey, Color::Black).0);
    io.write_str("  help      - show this message\n");
    io.write_str("  clear     - clear the screen\n");
    io.write_str("  echo ...  - print arguments\n");
    io.write_str("  version   - show OS version\n");
    io.write_str("  halt      - halt the system\n");
}

fn cmd_echo(args: &[&str], io: &mut dyn ShellIo) {
    for (i, arg) in args.iter().enumerate() {
        io.write_str(arg);
        if i + 1 < args.len() {
            io.write_byte(b' ');
        }
    }
    io.write_byte(b'\n');
}

fn cmd_version(io: &mut dyn ShellIo) {
    io.set_color(ColorCode::new(Color::Cyan, Color::Black).0);
    io.write_str("Noxiom OS v");
    io.write_str(VERSION);
    io.write_str("\n");
    io.set_color(ColorCode::new(Color::LightGrey, Color::Black).0);
    io.write_str("Lightweight server OS - built from scratch\n");
}

// ============================================================================
// Unit Tests
// ============================================================================
