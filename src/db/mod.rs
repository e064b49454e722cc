pub mod appointments;
pub mod attendance;
pub mod employees;
pub mod log;
pub mod migrate;
pub mod outbox;
pub mod pool;
pub mod stats;
