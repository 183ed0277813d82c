use std::fmt;

/// Line terminator expected by the necklace firmware
pub const LINE_TERMINATOR: char = '\n';

/// RGB color value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Payload for the SET command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingCommand {
    /// Pattern selector understood by the firmware
    pub pattern: i64,
    pub primary: Rgb,
    pub secondary: Rgb,
    /// Animation speed in beats per minute
    pub bpm: i64,
    /// Pattern modifier bitmask, passed through untouched
    pub flags: i64,
}

impl LightingCommand {
    /// Arguments in wire order:
    /// pattern, primary r/g/b, secondary r/g/b, bpm, flags
    pub fn args(&self) -> [String; 9] {
        [
            self.pattern.to_string(),
            self.primary.r.to_string(),
            self.primary.g.to_string(),
            self.primary.b.to_string(),
            self.secondary.r.to_string(),
            self.secondary.g.to_string(),
            self.secondary.b.to_string(),
            self.bpm.to_string(),
            self.flags.to_string(),
        ]
    }
}

/// Commands accepted by the necklace over serial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Set pattern, colors and speed
    Set(LightingCommand),
    /// Turn all LEDs off
    Dark,
    /// Ask the necklace to report signal strength
    Rssi,
    /// Put the necklace to sleep
    Sleep,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set(_) => "SET",
            Command::Dark => "DARK",
            Command::Rssi => "RSSI",
            Command::Sleep => "SLEEP",
        }
    }

    /// Render the command as a single newline-terminated protocol line
    pub fn to_line(&self) -> String {
        match self {
            Command::Set(payload) => format_command(self.name(), &payload.args()),
            _ => format_command::<&str>(self.name(), &[]),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_line().trim_end_matches(LINE_TERMINATOR))
    }
}

/// Join a command name and its arguments with single spaces and terminate with a newline
pub fn format_command<A: AsRef<str>>(name: &str, args: &[A]) -> String {
    let mut line = String::from(name);
    for arg in args {
        line.push(' ');
        line.push_str(arg.as_ref());
    }
    line.push(LINE_TERMINATOR);
    line
}
