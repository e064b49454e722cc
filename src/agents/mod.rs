//! Collaborators the receptionist talks to: microphone, camera, model, SMS gateway, avatar.
//! Each one is a trait with a console or offline implementation plus thin real adapters.

pub mod avatar;
pub mod console;
pub mod face;
pub mod llm;
pub mod sms;
pub mod voice;
pub mod wake;
