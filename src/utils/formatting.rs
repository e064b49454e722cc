//! Formatting utilities used for spoken replies and CLI output.

/// Greeting for the hour of the day: morning 5-11, afternoon 12-16, evening otherwise.
pub fn time_greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        _ => "Good Evening",
    }
}

/// 1 → "1st", 2 → "2nd", 11 → "11th", 22 → "22nd".
pub fn ordinal(n: usize) -> String {
    let suffix = if (10..=20).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

/// "ramu kumar" → "Ramu Kumar". Already capitalised tails are kept.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join items as "a, b and c".
pub fn join_spoken(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}
