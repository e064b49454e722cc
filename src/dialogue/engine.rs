//! Query router. Rules are tried in a fixed order and the first one that
//! produces a reply wins.

use crate::agents::avatar::AvatarState;
use crate::agents::llm::{self, FALLBACK_REPLY, LanguageModel, receptionist_prompt};
use crate::agents::sms::{self, SmsSender, deliver};
use crate::config::Config;
use crate::core::attendance;
use crate::core::calendar::Calendar;
use crate::core::directory::{Directory, mobile_of};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::dialogue::context::{DialogContext, PendingAction, Speaker};
use crate::dialogue::extract::{extract_denied_name, extract_identity_claim, parse_time_string};
use crate::dialogue::intents::{self, Utterance};
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::models::sms::Delivery;
use crate::utils::formatting::join_spoken;
use crate::utils::time::format_clock;
use crate::utils::{time_greeting, title_case};
use chrono::{NaiveDateTime, Timelike};
use rusqlite::Connection;

pub const NOT_UNDERSTOOD: &str = "I didn't catch that. Could you please repeat?";
pub const ERROR_REPLY: &str = "I encountered an error. Please try again.";
const FAREWELL: &str = "Okay, feel free to ask me anytime. Have a great day!";
const RESTROOM: &str = "The restroom is near the lift, just to your right.";
const VISITOR_SCOPE: &str = "Please ask where a department is or whom you want to meet.";

/// What the receptionist answers to one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// An action with side effects was carried out (SMS, booking, attendance change).
    pub handled: bool,
    /// The conversation is over; the bot goes back to sleep.
    pub end: bool,
    pub state: AvatarState,
}

impl Reply {
    pub fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            handled: false,
            end: false,
            state: AvatarState::Speaking,
        }
    }

    pub(super) fn handled(mut self) -> Self {
        self.handled = true;
        self
    }

    pub(super) fn ending(mut self) -> Self {
        self.end = true;
        self
    }

    pub(super) fn with_state(mut self, state: AvatarState) -> Self {
        self.state = state;
        self
    }
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Person notified for walk-ins, department questions and absentees.
    pub receptionist: String,
    pub default_cc: String,
}

impl EngineSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            receptionist: cfg.receptionist.clone(),
            default_cc: cfg.default_country_code.clone(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct DialogueEngine {
    pub(super) pool: DbPool,
    pub(super) directory: Directory,
    pub(super) calendar: Calendar,
    pub(super) model: Box<dyn LanguageModel>,
    pub(super) sms: Box<dyn SmsSender>,
    pub(super) settings: EngineSettings,
    pub(super) context: DialogContext,
}

impl DialogueEngine {
    pub fn new(
        pool: DbPool,
        directory: Directory,
        calendar: Calendar,
        model: Box<dyn LanguageModel>,
        sms: Box<dyn SmsSender>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            pool,
            directory,
            calendar,
            model,
            sms,
            settings,
            context: DialogContext::new(Speaker::visitor()),
        }
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Ok(Self::new(
            DbPool::open_initialized(&cfg.database)?,
            Directory::new(cfg.employees_csv_path()),
            Calendar::from_config(&cfg.calendar)?,
            llm::from_config(&cfg.llm)?,
            sms::from_config(&cfg.sms)?,
            EngineSettings::from_config(cfg),
        ))
    }

    /// Start a new conversation. Any pending action is dropped.
    pub fn begin_session(&mut self, speaker: Speaker) {
        tracing::info!(speaker = speaker.label(), "session started");
        self.context = DialogContext::new(speaker);
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    pub fn context(&self) -> &DialogContext {
        &self.context
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Answer one utterance. Never fails: internal errors are logged and
    /// turned into an apology.
    pub fn process_query(&mut self, text: &str, now: NaiveDateTime) -> Reply {
        match self.route(text, now) {
            Ok(reply) => {
                tracing::debug!(speaker = self.context.speaker.label(), handled = reply.handled, "reply ready");
                reply
            }
            Err(e) => {
                tracing::error!(error = %e, "query failed");
                Reply::say(ERROR_REPLY)
            }
        }
    }

    fn route(&mut self, text: &str, now: NaiveDateTime) -> AppResult<Reply> {
        let u = Utterance::new(text);
        if u.is_empty() {
            return Ok(Reply::say(NOT_UNDERSTOOD));
        }

        if let Some(pending) = self.context.take_pending()
            && let Some(reply) = self.resolve_pending(pending, &u, now)?
        {
            return Ok(reply);
        }

        if intents::is_goodbye(&u) {
            self.context.clear();
            return Ok(Reply::say(FAREWELL).ending().with_state(AvatarState::Happy));
        }
        if let Some(reply) = self.handle_identity(&u, now)? {
            return Ok(reply);
        }
        if intents::is_department_query(&u) {
            return Ok(self.handle_department(&u));
        }
        if let Some(reply) = self.handle_appointments(&u, now)? {
            return Ok(reply);
        }
        if let Some(reply) = self.handle_presence(&u, now)? {
            return Ok(reply);
        }
        if let Some(reply) = self.handle_employee_details(&u) {
            return Ok(reply);
        }
        if let Some(reply) = self.handle_visitor_sensitive(&u) {
            return Ok(reply);
        }
        if let Some(reply) = self.handle_meeting_request(&u, now)? {
            return Ok(reply);
        }
        if intents::is_restroom_query(&u) {
            return Ok(Reply::say(RESTROOM));
        }
        if !self.context.speaker.is_employee() {
            return Ok(self.handle_visitor_restriction(&u));
        }
        if intents::is_greeting(&u) {
            return Ok(greeting(&u, now));
        }
        Ok(self.general(&u))
    }

    /// `None` means the user moved on; the pending action is dropped and
    /// the utterance is routed normally.
    fn resolve_pending(
        &mut self,
        pending: PendingAction,
        u: &Utterance,
        now: NaiveDateTime,
    ) -> AppResult<Option<Reply>> {
        match pending {
            PendingAction::AwaitingTimeSelection {
                participant,
                date,
                slots,
                duration,
            } => {
                if !is_slot_choice(u) {
                    return Ok(None);
                }
                let Some(time) = parse_time_string(u.raw()) else {
                    if intents::is_no(u) {
                        return Ok(Some(Reply::say("Okay, I won't book anything.")));
                    }
                    return Ok(None);
                };

                if slots.contains(&time) {
                    let organizer = self.context.speaker.label().to_string();
                    return self
                        .book(&organizer, &participant, date, time, duration, now)
                        .map(Some);
                }

                let nearest = Calendar::nearest_slots(&slots, time, 3);
                let offered: Vec<String> = nearest.iter().map(|t| format_clock(*t)).collect();
                self.context.set_pending(PendingAction::AwaitingTimeSelection {
                    participant,
                    date,
                    slots,
                    duration,
                });
                Ok(Some(Reply::say(format!(
                    "{} is not one of the free times. The closest ones are {}. Which one works for you?",
                    format_clock(time),
                    join_spoken(&offered)
                ))))
            }

            PendingAction::AwaitingNotifyConfirmation { name } => {
                if intents::is_yes(u) {
                    Ok(Some(self.notify_visitor_arrival(&name)))
                } else if intents::is_no(u) {
                    Ok(Some(Reply::say("Okay. If you need anything else, let me know.")))
                } else {
                    Ok(None)
                }
            }

            PendingAction::AwaitingIdentityName => {
                let name = extract_identity_claim(u.raw()).or_else(|| bare_name(u));
                match name {
                    Some(name) => self.apply_identity(&name, now).map(Some),
                    None => Ok(None),
                }
            }
        }
    }

    fn handle_identity(&mut self, u: &Utterance, now: NaiveDateTime) -> AppResult<Option<Reply>> {
        let denial = intents::is_identity_denial(u) || extract_denied_name(u.raw()).is_some();

        if let Some(claim) = extract_identity_claim(u.raw()) {
            if let Speaker::Visitor { .. } = self.context.speaker
                && (intents::is_meeting_request(u) || intents::is_department_query(u))
            {
                // Remember the name and let the request itself be answered.
                self.context.speaker = Speaker::Visitor {
                    claimed_name: Some(claim),
                };
                return Ok(None);
            }
            return self.apply_identity(&claim, now).map(Some);
        }

        if denial {
            self.context.set_pending(PendingAction::AwaitingIdentityName);
            return Ok(Some(Reply::say(
                "I'm sorry about that. Could you please tell me your name?",
            )));
        }
        Ok(None)
    }

    /// The speaker says they are `name`.
    fn apply_identity(&mut self, name: &str, now: NaiveDateTime) -> AppResult<Reply> {
        let current = match self.context.speaker.clone() {
            Speaker::Employee(current) => current,
            Speaker::Visitor { .. } => {
                self.context.speaker = Speaker::Visitor {
                    claimed_name: Some(name.to_string()),
                };
                return Ok(Reply::say(format!(
                    "Nice to meet you, {name}! How can I assist you today?"
                ))
                .with_state(AvatarState::Happy));
            }
        };

        if same_person(&current, name) {
            return Ok(Reply::say(format!(
                "Yes, I know you, {current}. How can I help you?"
            )));
        }

        let today = now.date();
        let found = self.directory.search(&self.pool.conn, name);
        attendance::remove_arrival(&self.pool.conn, &current, today)?;

        match found {
            Some(emp) => {
                attendance::log_arrival(&self.pool.conn, &emp.name, now)?;
                ttlog_quiet(
                    &self.pool.conn,
                    "identity",
                    &emp.name,
                    &format!("recognised as {current}, corrected to {}", emp.name),
                );
                tracing::info!(from = %current, to = %emp.name, "identity corrected");
                self.context.speaker = Speaker::Employee(emp.name.clone());
                Ok(Reply::say(format!(
                    "Sorry about that, {}! I've updated your attendance. How can I help you?",
                    emp.name
                ))
                .handled())
            }
            None => {
                ttlog_quiet(
                    &self.pool.conn,
                    "identity",
                    name,
                    &format!("recognised as {current}, not in the directory"),
                );
                self.context.speaker = Speaker::Visitor {
                    claimed_name: Some(name.to_string()),
                };
                Ok(Reply::say(format!(
                    "Sorry about that, {name}. I couldn't find you in our employee directory, so I'll treat you as a visitor. How can I assist you today?"
                ))
                .handled())
            }
        }
    }

    fn handle_department(&mut self, u: &Utterance) -> Reply {
        let department = intents::detect_department(u).unwrap_or("requested");
        self.notify_receptionist(&format!(
            "Reception: A visitor is asking about {department} department location. Please assist them."
        ));
        Reply::say(format!(
            "Please wait here, {} will come and assist you. I have notified them.",
            self.settings.receptionist
        ))
        .handled()
    }

    fn handle_visitor_restriction(&self, u: &Utterance) -> Reply {
        if intents::is_verification_query(u)
            && let Some(name) = crate::dialogue::extract::extract_presence_name(u.raw())
        {
            return match self.directory.search(&self.pool.conn, &name) {
                Some(emp) => Reply::say(format!("Yes, {} works here.", emp.name)),
                None => Reply::say(not_found(&name)),
            };
        }
        Reply::say(VISITOR_SCOPE)
    }

    fn general(&mut self, u: &Utterance) -> Reply {
        match self.model.ask(&receptionist_prompt(u.raw())) {
            Ok(text) if !text.trim().is_empty() => {
                Reply::say(text.trim()).with_state(AvatarState::Thinking)
            }
            Ok(_) => Reply::say(FALLBACK_REPLY),
            Err(e) => {
                tracing::warn!(error = %e, "language model unavailable");
                Reply::say(FALLBACK_REPLY)
            }
        }
    }

    pub(super) fn send_sms(&mut self, to: &str, body: &str) -> Delivery {
        deliver(self.sms.as_mut(), &self.pool.conn, to, body)
    }

    /// `None` when the employee has no usable mobile number.
    pub(super) fn notify_employee(&mut self, emp: &Employee, body: &str) -> Option<Delivery> {
        let Some(to) = mobile_of(emp, &self.settings.default_cc) else {
            tracing::warn!(name = %emp.name, "no mobile number, notification skipped");
            return None;
        };
        Some(self.send_sms(&to, body))
    }

    pub(super) fn notify_receptionist(&mut self, body: &str) -> Option<Delivery> {
        let receptionist = self.settings.receptionist.clone();
        match self.directory.search(&self.pool.conn, &receptionist) {
            Some(emp) => self.notify_employee(&emp, body),
            None => {
                tracing::warn!(%receptionist, "receptionist not in the directory, notification skipped");
                None
            }
        }
    }

    /// Tell `name` a visitor is waiting for them.
    pub(super) fn notify_visitor_arrival(&mut self, name: &str) -> Reply {
        let Some(emp) = self.directory.search(&self.pool.conn, name) else {
            return Reply::say(format!(
                "{} Please wait, our receptionist {} will meet you shortly.",
                not_found(name),
                self.settings.receptionist
            ));
        };

        let body = match &self.context.speaker {
            Speaker::Visitor {
                claimed_name: Some(visitor),
            } => format!("You have a visitor, {visitor}, at the reception asking for you."),
            _ => "You have a visitor at the reception asking for you.".to_string(),
        };

        match self.notify_employee(&emp, &body) {
            Some(_) => Reply::say(format!(
                "I've notified {}. Please wait in the reception.",
                emp.name
            ))
            .handled(),
            None => Reply::say(format!(
                "Yes, {} works here, but I couldn't notify them (no mobile number found).",
                emp.name
            )),
        }
    }
}

pub(super) fn not_found(name: &str) -> String {
    format!("Sorry, I couldn't find anyone named {name} in our employee directory.")
}

/// Same name, or `short` is the first name of `full`.
pub(super) fn same_person(full: &str, short: &str) -> bool {
    let full = full.trim().to_lowercase();
    let short = short.trim().to_lowercase();
    full == short
        || full.split_whitespace().next() == Some(short.as_str())
        || short.split_whitespace().next() == Some(full.as_str())
}

/// An answer to "which time works for you?": a time, a yes or a no, and
/// no question or request of its own.
fn is_slot_choice(u: &Utterance) -> bool {
    !(intents::is_goodbye(u)
        || intents::is_presence_query(u)
        || intents::appointment_intent(u).is_some()
        || intents::is_department_query(u)
        || intents::is_employee_detail_query(u)
        || intents::is_meeting_request(u)
        || intents::is_restroom_query(u)
        || intents::is_identity_denial(u)
        || extract_identity_claim(u.raw()).is_some())
}

/// A reply that is nothing but a name ("Priya", "Priya Sharma").
fn bare_name(u: &Utterance) -> Option<String> {
    let words: Vec<&str> = u.raw().split_whitespace().collect();
    let plausible = (1..=3).contains(&words.len())
        && words
            .iter()
            .all(|w| w.trim_end_matches(['.', '!']).chars().all(char::is_alphabetic))
        && !intents::is_yes(u)
        && !intents::is_no(u);
    plausible.then(|| title_case(&u.raw().trim_end_matches(['.', '!']).to_lowercase()))
}

fn greeting(u: &Utterance, now: NaiveDateTime) -> Reply {
    let tg = time_greeting(now.hour());
    let text = if u.has("how are you") {
        format!("{tg}! I'm doing well, thank you for asking. How can I help you today?")
    } else if u.has_any(&["good morning", "good afternoon", "good evening"]) {
        format!("{tg}! How can I assist you today?")
    } else {
        "Hi there! How can I assist you today?".to_string()
    };
    Reply::say(text).with_state(AvatarState::Happy)
}
