use reconlog_types::Level;

/// ANSI color theme for rendered lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    enabled: bool,
}

impl Theme {
    // SGR codes
    pub const RESET: &'static str = "\x1b[0m";
    pub const RED: &'static str = "\x1b[0;31m";
    pub const GREEN: &'static str = "\x1b[0;32m";
    pub const YELLOW: &'static str = "\x1b[0;33m";
    pub const BLUE: &'static str = "\x1b[0;34m";
    pub const GRAY: &'static str = "\x1b[0;90m";
    pub const BRIGHT_WHITE: &'static str = "\x1b[1;37m";

    /// Theme that emits escape codes
    pub fn ansi() -> Self {
        Self { enabled: true }
    }

    /// Theme that emits no escape codes, same layout
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn code(&self, code: &'static str) -> &'static str {
        if self.enabled { code } else { "" }
    }

    pub fn reset(&self) -> &'static str {
        self.code(Self::RESET)
    }

    // Headline colors

    /// Level, date, time and controller slot
    pub fn header(&self, level: Level) -> &'static str {
        self.code(match level {
            Level::Error => Self::RED,
            Level::Warning => Self::YELLOW,
            _ => Self::BLUE,
        })
    }

    /// `namespace/name`
    pub fn object(&self, level: Level) -> &'static str {
        self.code(match level {
            Level::Error => Self::RED,
            _ => Self::GREEN,
        })
    }

    pub fn message(&self, level: Level) -> &'static str {
        self.code(match level {
            Level::Error => Self::RED,
            _ => Self::BRIGHT_WHITE,
        })
    }

    // Key/value section

    pub fn key_value(&self) -> &'static str {
        self.code(Self::GRAY)
    }

    pub fn separator(&self) -> &'static str {
        self.code(Self::RED)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ansi()
    }
}
