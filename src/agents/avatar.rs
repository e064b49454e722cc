use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarState {
    Idle,
    Listening,
    Thinking,
    Processing,
    Speaking,
    Happy,
}

impl fmt::Display for AvatarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AvatarState::Idle => "idle",
            AvatarState::Listening => "listening",
            AvatarState::Thinking => "thinking",
            AvatarState::Processing => "processing",
            AvatarState::Speaking => "speaking",
            AvatarState::Happy => "happy",
        };
        f.write_str(s)
    }
}

/// Visual indicator only; nothing in the dialogue depends on it.
pub trait Avatar {
    fn show(&mut self, state: AvatarState);
}

/// Logs state changes at debug level.
#[derive(Debug, Default)]
pub struct ConsoleAvatar {
    current: Option<AvatarState>,
}

impl Avatar for ConsoleAvatar {
    fn show(&mut self, state: AvatarState) {
        if self.current != Some(state) {
            tracing::debug!(%state, "avatar");
            self.current = Some(state);
        }
    }
}
