//! Rule-based dialogue: intent keywords, slot extraction, cross-turn context
//! and the query router.

mod appointments;
pub mod context;
pub mod engine;
pub mod extract;
pub mod intents;
mod people;

pub use context::{DialogContext, PendingAction, Speaker};
pub use engine::{DialogueEngine, ERROR_REPLY, EngineSettings, NOT_UNDERSTOOD, Reply};
