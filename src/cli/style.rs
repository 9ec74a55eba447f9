//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when stdout is
//! not a color-capable terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark for successful targets
pub const CHECK: &str = "✓";

/// Cross for failed targets
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
pub trait Stylize {
    /// De-emphasized text
    fn muted(&self) -> String;
    /// Bold text
    fn emphasis(&self) -> String;
    /// Names (branches, PR numbers)
    fn accent(&self) -> String;
    /// Success text
    fn success(&self) -> String;
    /// Warning text
    fn warn(&self) -> String;
    /// Error text
    fn error(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().to_string()
    }
}

/// Styled check mark
pub fn check() -> String {
    CHECK.success()
}

/// Styled cross
pub fn cross() -> String {
    CROSS.error()
}
