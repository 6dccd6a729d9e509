//! Terminal I/O utilities for CLI.
//!
//! Human-readable progress goes to stderr so stdout stays parseable JSON.

use std::io::IsTerminal;

pub fn is_stderr_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Print a status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if is_stderr_tty() {
        eprintln!("{}", message);
    }
}
