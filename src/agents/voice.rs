use crate::errors::AppResult;
use crate::ui::messages::{bot, prompt};
use super::console::SharedStdin;
use regex::Regex;
use std::io::BufRead;
use std::process::Command;
use std::sync::OnceLock;

const QUESTION_INDICATORS: &[&str] = &[
    "?", "what", "how", "when", "where", "why", "who", "which", "can you", "could you",
    "would you", "do you", "are you", "is there", "are there", "tell me", "explain", "describe",
];

const QUESTION_SEPARATORS: &[&str] = &[" and ", " also ", " plus ", " furthermore ", " additionally "];

const DANGLING_WORDS: &[&str] = &[
    "and", "but", "or", "so", "because", "if", "when", "where", "how", "what", "who", "why",
    "which", "that", "the", "a", "an", "in", "on", "at", "to", "for", "of", "with", "by", "from",
    "up", "down",
];

pub trait Voice {
    fn speak(&mut self, text: &str) -> AppResult<()>;

    /// Next utterance; `None` when nothing intelligible was heard.
    fn listen(&mut self) -> AppResult<Option<String>>;

    /// True once the input source is exhausted.
    fn is_closed(&self) -> bool;
}

/// Separators as case-insensitive patterns ("and", "AND", "And").
fn separators() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        QUESTION_SEPARATORS
            .iter()
            .map(|sep| Regex::new(&format!("(?i){}", regex::escape(sep))).expect("valid regex"))
            .collect()
    })
}

fn has_question_indicator(s: &str) -> bool {
    let lower = s.to_lowercase();
    QUESTION_INDICATORS.iter().any(|i| lower.contains(i))
}

/// Split an utterance holding several questions.
///
/// Separators are tried in order; the first one that yields parts with a
/// question indicator wins. Otherwise the whole text is a single question.
pub fn split_questions(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    for sep in separators() {
        if !sep.is_match(text) {
            continue;
        }
        let questions: Vec<String> = sep
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty() && has_question_indicator(p))
            .map(str::to_string)
            .collect();
        if !questions.is_empty() {
            return questions;
        }
    }

    vec![text.to_string()]
}

/// Speech that was probably cut off: very short, or ending on a conjunction,
/// preposition or article.
pub fn is_incomplete(text: &str) -> bool {
    let t = text.trim();
    if t.chars().count() < 3 {
        return true;
    }
    let lower = t.to_lowercase();
    DANGLING_WORDS
        .iter()
        .any(|w| lower.ends_with(&format!(" {w}")))
}

/// Stdin/stdout voice. Replies are wrapped and optionally handed to a TTS program.
pub struct ConsoleVoice<R: BufRead> {
    reader: R,
    wrap_width: usize,
    tts_command: Option<String>,
    interactive: bool,
    closed: bool,
}

impl<R: BufRead> ConsoleVoice<R> {
    pub fn new(reader: R, wrap_width: usize) -> Self {
        Self {
            reader,
            wrap_width,
            tts_command: None,
            interactive: false,
            closed: false,
        }
    }

    pub fn with_tts(mut self, command: Option<String>) -> Self {
        self.tts_command = command.filter(|c| !c.trim().is_empty());
        self
    }
}

impl ConsoleVoice<SharedStdin> {
    pub fn stdin(input: SharedStdin, wrap_width: usize) -> Self {
        let mut v = Self::new(input, wrap_width);
        v.interactive = true;
        v
    }
}

impl<R: BufRead> Voice for ConsoleVoice<R> {
    fn speak(&mut self, text: &str) -> AppResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        for line in textwrap::wrap(text, self.wrap_width.max(20)) {
            bot(line);
        }

        if let Some(cmd) = &self.tts_command {
            let mut parts = cmd.split_whitespace();
            if let Some(program) = parts.next() {
                match Command::new(program).args(parts).arg(text).status() {
                    Ok(s) if s.success() => {}
                    Ok(s) => tracing::warn!(%program, status = %s, "text-to-speech failed"),
                    Err(e) => tracing::warn!(%program, error = %e, "text-to-speech unavailable"),
                }
            }
        }
        Ok(())
    }

    fn listen(&mut self) -> AppResult<Option<String>> {
        if self.closed {
            return Ok(None);
        }
        if self.interactive {
            prompt("you");
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.closed = true;
            return Ok(None);
        }
        let heard = line.trim();
        if heard.is_empty() {
            return Ok(None);
        }
        tracing::debug!(%heard, "heard");
        Ok(Some(heard.to_string()))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
