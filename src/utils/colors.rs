/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Appointment status color: scheduled → green, cancelled → grey.
pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "scheduled" => GREEN,
        "cancelled" => GREY,
        _ => RESET,
    }
}

/// SMS delivery color: sent → green, failed → red, queued → yellow.
pub fn color_for_delivery(status: &str) -> &'static str {
    match status {
        "sent" => GREEN,
        "failed" => RED,
        "queued" => YELLOW,
        _ => RESET,
    }
}
