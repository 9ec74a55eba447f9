//! GitHub Actions workflow commands
//!
//! The runner parses `::command::message` lines on stdout. Messages must
//! have `%`, `\r` and `\n` escaped or they are truncated at the first line
//! break.

use anstream::println;

/// Escape a workflow command message
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Mark the step as failed with `message`
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Emit a notice annotation
pub fn notice(message: &str) {
    println!("::notice::{}", escape_data(message));
}
