pub mod colors;
pub mod date;
pub mod formatting;
pub mod path;
pub mod phone;
pub mod table;
pub mod time;

pub use formatting::{ordinal, time_greeting, title_case};
pub use phone::normalize_e164;
