use chrono::{NaiveDate, NaiveTime};

/// Who the receptionist is talking to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Speaker {
    Employee(String),
    /// Unrecognised face. A name stated in conversation is remembered, but a
    /// visitor is never promoted to employee by what they say.
    Visitor { claimed_name: Option<String> },
}

impl Speaker {
    pub fn visitor() -> Self {
        Speaker::Visitor { claimed_name: None }
    }

    pub fn is_employee(&self) -> bool {
        matches!(self, Speaker::Employee(_))
    }

    /// Name used in logs and messages.
    pub fn label(&self) -> &str {
        match self {
            Speaker::Employee(name) => name,
            Speaker::Visitor {
                claimed_name: Some(name),
            } => name,
            Speaker::Visitor { claimed_name: None } => "Visitor",
        }
    }
}

/// Something the receptionist asked and is waiting an answer for.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    AwaitingTimeSelection {
        participant: String,
        date: NaiveDate,
        slots: Vec<NaiveTime>,
        duration: i64,
    },
    AwaitingNotifyConfirmation {
        name: String,
    },
    AwaitingIdentityName,
}

/// Per-conversation state. Holds at most one pending action.
#[derive(Debug, Clone)]
pub struct DialogContext {
    pub speaker: Speaker,
    pending: Option<PendingAction>,
}

impl DialogContext {
    pub fn new(speaker: Speaker) -> Self {
        Self {
            speaker,
            pending: None,
        }
    }

    /// Replaces any action already pending.
    pub fn set_pending(&mut self, action: PendingAction) {
        if let Some(old) = self.pending.replace(action) {
            tracing::debug!(?old, "pending action replaced");
        }
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
