pub mod appointment;
pub mod ask;
pub mod attendance;
pub mod config;
pub mod db;
pub mod employee;
pub mod faces;
pub mod init;
pub mod log;
pub mod run;
pub mod sms;
