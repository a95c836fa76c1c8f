use colored::*;
use std::io::{self, Write};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
    Debug,
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub color: bool,
}

static SETTINGS: RwLock<OutputSettings> = RwLock::new(OutputSettings { color: true });

// Global debug state
static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_debug_mode(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

pub fn init(color: bool) {
    if let Ok(mut s) = SETTINGS.write() {
        s.color = color;
    }
    if !color {
        colored::control::set_override(false);
    }
}

pub fn color_enabled() -> bool {
    SETTINGS.read().map(|s| s.color).unwrap_or(false)
}

pub mod glyph;
pub use glyph::Glyph;

pub const SEPARATOR_HEAVY: &str = "━";
pub const SEPARATOR_LIGHT: &str = "─";

fn colorize(level: Level, s: &str, enable: bool) -> String {
    if !enable {
        return s.to_string();
    }
    match level {
        Level::Info => s.normal().to_string(),
        Level::Success => s.green().bold().to_string(),
        Level::Warn => s.yellow().bold().to_string(),
        Level::Error => s.red().bold().to_string(),
        Level::Debug => s.cyan().dimmed().to_string(),
    }
}

/// Print an event. `code` is a stable dotted identifier shown with debug events.
pub fn emit(level: Level, code: &str, message: &str) {
    if level == Level::Debug && !is_debug_enabled() {
        return;
    }
    let color = color_enabled();
    let line = if level == Level::Debug {
        colorize(level, &format!("[{code}] {message}"), color)
    } else {
        colorize(level, message, color)
    };
    let mut out: Box<dyn Write> = match level {
        Level::Error | Level::Warn | Level::Debug => Box::new(io::stderr()),
        _ => Box::new(io::stdout()),
    };
    let _ = writeln!(out, "{}", line);
}

pub fn separator(light: bool) {
    let glyph = if light {
        SEPARATOR_LIGHT
    } else {
        SEPARATOR_HEAVY
    };
    let line = glyph.repeat(80);
    let mut out = io::stdout();
    let _ = writeln!(
        out,
        "{}",
        if color_enabled() {
            line.dimmed().to_string()
        } else {
            line
        }
    );
}

pub mod prelude {
    pub use super::{Glyph, Level, emit, separator};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_when_colour_disabled() {
        assert_eq!(colorize(Level::Error, "boom", false), "boom");
        assert_eq!(colorize(Level::Success, "ok", false), "ok");
    }

    #[test]
    fn debug_mode_toggles() {
        set_debug_mode(true);
        assert!(is_debug_enabled());
        set_debug_mode(false);
        assert!(!is_debug_enabled());
    }
}
