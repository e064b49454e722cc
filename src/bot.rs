//! The receptionist loop: sleep until the wake word, recognise the person at
//! the desk, greet them and hold the conversation.

use crate::agents::avatar::{Avatar, AvatarState};
use crate::agents::face::FaceRecognizer;
use crate::agents::voice::{Voice, is_incomplete, split_questions};
use crate::agents::wake::WakeWord;
use crate::config::Config;
use crate::core::attendance;
use crate::dialogue::{DialogueEngine, ERROR_REPLY, NOT_UNDERSTOOD, Speaker};
use crate::errors::AppResult;
use crate::utils::{ordinal, time_greeting};
use chrono::{Local, NaiveDateTime, Timelike};

const WAKE_REPLY: &str = "Hello! I'm here to help you. Let me recognize you.";
const VISITOR_GREETING: &str = "Hello! Welcome. May I know your name, or how can I assist you today?";

#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Consecutive silent turns before going back to sleep.
    pub max_silent_turns: u32,
    pub follow_up_prompt: String,
}

impl BotSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            max_silent_turns: cfg.max_silent_turns.max(1),
            follow_up_prompt: cfg.follow_up_prompt.clone(),
        }
    }
}

pub struct ReceptionBot {
    engine: DialogueEngine,
    wake: Box<dyn WakeWord>,
    face: Box<dyn FaceRecognizer>,
    voice: Box<dyn Voice>,
    avatar: Box<dyn Avatar>,
    settings: BotSettings,
    clock: Box<dyn Fn() -> NaiveDateTime>,
}

impl ReceptionBot {
    pub fn new(
        engine: DialogueEngine,
        wake: Box<dyn WakeWord>,
        face: Box<dyn FaceRecognizer>,
        voice: Box<dyn Voice>,
        avatar: Box<dyn Avatar>,
        settings: BotSettings,
    ) -> Self {
        Self {
            engine,
            wake,
            face,
            voice,
            avatar,
            settings,
            clock: Box::new(|| Local::now().naive_local()),
        }
    }

    /// Replace the wall clock (scripted sessions, tests).
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn engine(&self) -> &DialogueEngine {
        &self.engine
    }

    /// Serve sessions until the wake source or the voice input is exhausted.
    pub fn run(&mut self) -> AppResult<()> {
        loop {
            self.avatar.show(AvatarState::Idle);
            if !self.wake.wait()? {
                tracing::info!("wake source closed, shutting down");
                return Ok(());
            }

            if let Err(e) = self.session() {
                tracing::error!(error = %e, "session failed");
                if let Err(e) = self.voice.speak(ERROR_REPLY) {
                    tracing::warn!(error = %e, "could not report the error");
                }
            }

            if self.voice.is_closed() {
                tracing::info!("voice input closed, shutting down");
                return Ok(());
            }
        }
    }

    /// One wake-up: recognise, greet, converse.
    pub fn session(&mut self) -> AppResult<()> {
        self.say(WAKE_REPLY, AvatarState::Happy)?;

        self.avatar.show(AvatarState::Processing);
        let speaker = self.recognize();
        self.greet(&speaker)?;
        self.engine.begin_session(speaker);

        self.converse()
    }

    fn recognize(&mut self) -> Speaker {
        match self.face.recognize() {
            Ok(Some(name)) => {
                let name = self
                    .engine
                    .directory()
                    .search(self.engine.conn(), &name)
                    .map(|e| e.name)
                    .unwrap_or(name);
                tracing::info!(%name, "recognised");
                Speaker::Employee(name)
            }
            Ok(None) => Speaker::visitor(),
            Err(e) => {
                tracing::warn!(error = %e, "face recognition failed, treating as visitor");
                Speaker::visitor()
            }
        }
    }

    fn greet(&mut self, speaker: &Speaker) -> AppResult<()> {
        let now = (self.clock)();
        match speaker {
            Speaker::Employee(name) => {
                if let Err(e) = attendance::log_arrival(self.engine.conn(), name, now) {
                    tracing::warn!(%name, error = %e, "could not log arrival");
                }
                let text = format!(
                    "Hi {name}, {}! How can I help you today?",
                    time_greeting(now.hour())
                );
                self.say(&text, AvatarState::Happy)
            }
            Speaker::Visitor { .. } => self.say(VISITOR_GREETING, AvatarState::Happy),
        }
    }

    fn converse(&mut self) -> AppResult<()> {
        let mut silent = 0u32;
        loop {
            self.avatar.show(AvatarState::Listening);
            let heard = self.voice.listen()?;

            let Some(mut text) = heard else {
                if self.voice.is_closed() {
                    return Ok(());
                }
                silent += 1;
                if silent >= self.settings.max_silent_turns {
                    let follow_up = self.settings.follow_up_prompt.clone();
                    return self.say(&follow_up, AvatarState::Idle);
                }
                self.say(NOT_UNDERSTOOD, AvatarState::Speaking)?;
                continue;
            };
            silent = 0;

            if is_incomplete(&text)
                && let Some(rest) = self.voice.listen()?
            {
                text = format!("{} {}", text.trim(), rest.trim());
            }

            match self.answer(&text) {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, "turn failed");
                    self.say(ERROR_REPLY, AvatarState::Speaking)?;
                }
            }
        }
    }

    /// Answer every question in `text`. `true` when the conversation ended.
    fn answer(&mut self, text: &str) -> AppResult<bool> {
        let questions = split_questions(text);
        if questions.is_empty() {
            self.say(NOT_UNDERSTOOD, AvatarState::Speaking)?;
            return Ok(false);
        }
        if questions.len() > 1 {
            self.say(
                "I heard you ask several questions. Let me address them one by one.",
                AvatarState::Speaking,
            )?;
        }

        for (i, question) in questions.iter().enumerate() {
            if i > 0 {
                let lead = format!("Now for your {} question:", ordinal(i + 1));
                self.say(&lead, AvatarState::Speaking)?;
            }
            self.avatar.show(AvatarState::Thinking);
            let reply = self.engine.process_query(question, (self.clock)());
            self.say(&reply.text, reply.state)?;
            if reply.end {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn say(&mut self, text: &str, state: AvatarState) -> AppResult<()> {
        self.avatar.show(state);
        self.voice.speak(text)
    }
}
