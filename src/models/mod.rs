pub mod appointment;
pub mod attendance;
pub mod employee;
pub mod sms;
