use crate::errors::AppResult;
use crate::ui::messages::prompt;
use super::console::SharedStdin;
use std::io::BufRead;

/// Matches transcripts against the wake word.
///
/// A transcript matches when it contains the wake word or when one of its
/// tokens starts with the wake word minus its last letter, so that
/// recognizer slips like "jarvi" or "jarvin" still wake the bot.
#[derive(Debug, Clone)]
pub struct WakeWordMatcher {
    word: String,
    stem: String,
}

impl WakeWordMatcher {
    pub fn new(word: &str) -> Self {
        let word = word.trim().to_lowercase();
        let mut stem = word.clone();
        if stem.chars().count() > 3 {
            stem.pop();
        }
        Self { word, stem }
    }

    pub fn matches(&self, transcript: &str) -> bool {
        if self.word.is_empty() {
            return false;
        }
        let text = transcript.to_lowercase();
        if text.contains(&self.word) {
            return true;
        }
        text.replace(['.', ',', '!', '?'], " ")
            .split_whitespace()
            .any(|tok| tok.starts_with(&self.stem))
    }

    pub fn word(&self) -> &str {
        &self.word
    }
}

/// Blocks until the wake word is heard. `Ok(false)` means shut down.
pub trait WakeWord {
    fn wait(&mut self) -> AppResult<bool>;
}

/// Reads transcripts line by line; end of input shuts the bot down.
pub struct LineWake<R: BufRead> {
    matcher: WakeWordMatcher,
    reader: R,
    interactive: bool,
}

impl<R: BufRead> LineWake<R> {
    pub fn new(matcher: WakeWordMatcher, reader: R) -> Self {
        Self {
            matcher,
            reader,
            interactive: false,
        }
    }
}

impl LineWake<SharedStdin> {
    pub fn stdin(matcher: WakeWordMatcher, input: SharedStdin) -> Self {
        Self {
            matcher,
            reader: input,
            interactive: true,
        }
    }
}

impl<R: BufRead> WakeWord for LineWake<R> {
    fn wait(&mut self) -> AppResult<bool> {
        tracing::info!(wake_word = %self.matcher.word(), "waiting for wake word");
        loop {
            if self.interactive {
                prompt(format!("(say \"{}\")", self.matcher.word()));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            let heard = line.trim();
            if heard.is_empty() {
                continue;
            }
            tracing::debug!(%heard, "heard while sleeping");
            if self.matcher.matches(heard) {
                tracing::info!("wake word detected");
                return Ok(true);
            }
        }
    }
}
