//! Colored status lines for terminal output.

use crate::errors::{AppError, ErrorKind};
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use std::fmt;

const BOLD: &str = "\x1b[1m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_DENIED: &str = "🔒";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", CYAN, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", RED, BOLD, ICON_ERR, RESET, msg);
}

/// Print a failed command's error on stderr, prefixed by its category.
pub fn report(err: &AppError) {
    match err.kind() {
        ErrorKind::Validation => error(format!("Invalid input: {err}")),
        ErrorKind::StateConflict => error(format!("Not possible: {err}")),
        ErrorKind::NotFound => error(format!("Not found: {err}")),
        ErrorKind::Authorization => {
            eprintln!("{}{}{} {}Access denied: {}", RED, BOLD, ICON_DENIED, RESET, err)
        }
        ErrorKind::Internal => error(format!("Error: {err}")),
    }
}
