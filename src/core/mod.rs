pub mod attendance;
pub mod calendar;
pub mod directory;
pub mod log;
