pub mod colors {
    pub const GREY: u8 = 102;      // #7D7D7D - Secondary, prefixes
    pub const AQUA: u8 = 109;      // #7A9EB5 - 1xx
    pub const ORANGE: u8 = 208;    // #F2913D - 4xx
    pub const RED: u8 = 167;       // #E34F45 - Errors, 5xx
    pub const BLUE: u8 = 68;       // #426BD1 - Labels
    pub const GREEN: u8 = 71;      // #63C27A - Success, 2xx
    pub const YELLOW: u8 = 185;    // #CCCC3D - 3xx
}

/// ANSI escape code constants
pub const RESET: &str = "\x1b[0m";

/// Generate foreground color escape code
#[inline]
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

/// Generate bold foreground color escape code
#[inline]
pub fn bold_fg(color: u8) -> String {
    format!("\x1b[1;38;5;{}m", color)
}

/// Colorize text with a foreground color
#[inline]
pub fn colorize(text: &str, color: u8) -> String {
    format!("{}{}{}", fg(color), text, RESET)
}

/// Colorize text with bold foreground color
#[inline]
pub fn bold(text: &str, color: u8) -> String {
    format!("{}{}{}", bold_fg(color), text, RESET)
}

/// Whether stdout should receive ANSI colors: a terminal, and `NO_COLOR` unset
pub fn stdout_supports_color() -> bool {
    supports_color(atty::Stream::Stdout)
}

/// Whether stderr should receive ANSI colors: a terminal, and `NO_COLOR` unset
pub fn stderr_supports_color() -> bool {
    supports_color(atty::Stream::Stderr)
}

fn supports_color(stream: atty::Stream) -> bool {
    atty::is(stream) && std::env::var_os("NO_COLOR").is_none()
}

/// Applies the palette, or passes text through untouched when colors are off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Detect from the current stdout
    pub fn for_stdout() -> Self {
        Self::new(stdout_supports_color())
    }

    /// Detect from the current stderr
    pub fn for_stderr() -> Self {
        Self::new(stderr_supports_color())
    }

    fn paint(&self, text: &str, color: u8, strong: bool) -> String {
        match (self.enabled, strong) {
            (false, _) => text.to_string(),
            (true, true) => bold(text, color),
            (true, false) => colorize(text, color),
        }
    }

    /// Success message (green)
    pub fn success(&self, text: &str) -> String {
        self.paint(text, colors::GREEN, true)
    }

    /// Error message (red)
    pub fn error(&self, text: &str) -> String {
        self.paint(text, colors::RED, true)
    }

    /// Label/name (blue)
    pub fn label(&self, text: &str) -> String {
        self.paint(text, colors::BLUE, false)
    }

    /// Secondary/muted text (grey)
    pub fn muted(&self, text: &str) -> String {
        self.paint(text, colors::GREY, false)
    }

    /// Color a progress line's `[prefix]` and leave the message plain
    pub fn progress_line(&self, line: &str) -> String {
        match line.find("] ") {
            Some(end) if self.enabled && line.starts_with('[') => {
                format!("{}{}", self.muted(&line[..=end]), &line[end + 1..])
            }
            _ => line.to_string(),
        }
    }

    /// HTTP status code, colored by class
    pub fn http_status(&self, code: u16, text: &str) -> String {
        let color = match code / 100 {
            1 => colors::AQUA,   // Informational
            2 => colors::GREEN,  // Success
            3 => colors::YELLOW, // Redirect
            4 => colors::ORANGE, // Client error
            5 => colors::RED,    // Server error
            _ => colors::GREY,
        };
        self.paint(text, color, true)
    }
}
