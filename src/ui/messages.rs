use std::fmt;
use std::io::Write;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_MAGENTA: &str = "\x1b[35m";

fn styled(color: &str, icon: &str, msg: impl fmt::Display) -> String {
    format!("{color}{BOLD}{icon} {RESET}{msg}")
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_BLUE, "ℹ️", msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_GREEN, "✅", msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_YELLOW, "⚠️", msg));
}

/// Errors go to stderr.
pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", styled(FG_RED, "❌", msg));
}

/// A line spoken by the receptionist.
pub fn bot<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_MAGENTA, "🤖", msg));
}

/// Shown before reading a line from the person at the desk.
pub fn prompt<T: fmt::Display>(label: T) {
    print!("{BOLD}🗣️ {label}>{RESET} ");
    std::io::stdout().flush().ok();
}

pub fn header<T: fmt::Display>(msg: T) {
    println!("{FG_BLUE}{BOLD}====================== {msg}\n{RESET}");
}
