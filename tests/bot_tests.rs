mod common;
use common::{at, engine, monday};
use rreception::agents::avatar::{Avatar, AvatarState};
use rreception::agents::face::FixedRecognizer;
use rreception::agents::voice::Voice;
use rreception::agents::wake::{LineWake, WakeWordMatcher};
use rreception::bot::{BotSettings, ReceptionBot};
use rreception::core::attendance;
use rreception::errors::AppResult;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::rc::Rc;

type Transcript = Rc<RefCell<Vec<String>>>;

/// Plays back scripted utterances; `None` entries are silence.
struct ScriptedVoice {
    heard: VecDeque<Option<String>>,
    said: Transcript,
}

impl ScriptedVoice {
    fn new(lines: &[Option<&str>]) -> (Self, Transcript) {
        let said: Transcript = Rc::new(RefCell::new(Vec::new()));
        let voice = Self {
            heard: lines.iter().map(|l| l.map(str::to_string)).collect(),
            said: said.clone(),
        };
        (voice, said)
    }
}

impl Voice for ScriptedVoice {
    fn speak(&mut self, text: &str) -> AppResult<()> {
        self.said.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn listen(&mut self) -> AppResult<Option<String>> {
        Ok(self.heard.pop_front().flatten())
    }

    fn is_closed(&self) -> bool {
        self.heard.is_empty()
    }
}

struct NullAvatar;

impl Avatar for NullAvatar {
    fn show(&mut self, _state: AvatarState) {}
}

fn settings() -> BotSettings {
    BotSettings {
        max_silent_turns: 2,
        follow_up_prompt: "How else can I help you?".to_string(),
    }
}

fn bot(name: &str, who: Option<&str>, lines: &[Option<&str>]) -> (ReceptionBot, Transcript) {
    let (engine, _) = engine(name);
    let (voice, said) = ScriptedVoice::new(lines);
    let bot = ReceptionBot::new(
        engine,
        Box::new(LineWake::new(WakeWordMatcher::new("jarvis"), Cursor::new("jarvis\n"))),
        Box::new(FixedRecognizer(who.map(str::to_string))),
        Box::new(voice),
        Box::new(NullAvatar),
        settings(),
    )
    .with_clock(|| at(monday(), 9, 40));
    (bot, said)
}

#[test]
fn test_recognised_employee_is_greeted_and_logged() {
    let (mut bot, said) = bot("bot_employee", Some("Ramu"), &[Some("bye")]);
    bot.run().expect("run");

    let said = said.borrow();
    assert_eq!(said[0], "Hello! I'm here to help you. Let me recognize you.");
    assert_eq!(said[1], "Hi Ramu Kumar, Good Morning! How can I help you today?");
    assert!(said.last().expect("farewell").contains("Have a great day"));

    let arrived = attendance::lookup(bot.engine().conn(), "Ramu Kumar", monday()).expect("lookup");
    assert!(arrived.is_some());
}

#[test]
fn test_visitor_greeting_and_scope() {
    let (mut bot, said) = bot("bot_visitor", None, &[Some("tell me a joke"), Some("goodbye")]);
    bot.run().expect("run");

    let said = said.borrow();
    assert!(said[1].starts_with("Hello! Welcome."));
    assert_eq!(said[2], "Please ask where a department is or whom you want to meet.");
}

#[test]
fn test_several_questions_answered_in_turn() {
    let (mut bot, said) = bot(
        "bot_multi",
        Some("Ramu Kumar"),
        &[Some("where is the restroom and who is present today"), Some("bye")],
    );
    bot.run().expect("run");

    let said = said.borrow();
    assert_eq!(
        said[2],
        "I heard you ask several questions. Let me address them one by one."
    );
    assert!(said[3].contains("restroom is near the lift"));
    assert_eq!(said[4], "Now for your 2nd question:");
    assert!(said[5].contains("Ramu Kumar (arrived at 9:40 AM)"));
}

#[test]
fn test_silence_leads_to_follow_up_prompt() {
    let (mut bot, said) = bot("bot_silence", Some("Alex"), &[None, None, Some("ignored")]);
    bot.run().expect("run");

    let said = said.borrow();
    assert_eq!(said[2], "I didn't catch that. Could you please repeat?");
    assert_eq!(said[3], "How else can I help you?");
    assert_eq!(said.len(), 4);
}
