use crate::agents::avatar::ConsoleAvatar;
use crate::agents::console::SharedStdin;
use crate::agents::face::{ConsoleRecognizer, EmbeddingRecognizer, FaceDb, FaceRecognizer, FixedRecognizer};
use crate::agents::voice::ConsoleVoice;
use crate::agents::wake::{LineWake, WakeWordMatcher};
use crate::bot::{BotSettings, ReceptionBot};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::dialogue::DialogueEngine;
use crate::errors::AppResult;
use crate::ui::messages::info;

fn recognizer(
    as_employee: Option<&str>,
    visitor: bool,
    cfg: &Config,
    input: &SharedStdin,
) -> AppResult<Box<dyn FaceRecognizer>> {
    if let Some(name) = as_employee {
        return Ok(Box::new(FixedRecognizer(Some(name.to_string()))));
    }
    if visitor {
        return Ok(Box::new(FixedRecognizer(None)));
    }
    match cfg.recognition.capture_command.as_deref() {
        Some(command) => {
            let db = FaceDb::load(&cfg.face_db_path())?;
            Ok(Box::new(EmbeddingRecognizer::new(
                db,
                command,
                cfg.recognition.similarity_threshold,
            )))
        }
        None => Ok(Box::new(ConsoleRecognizer::stdin(input.clone()))),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Run {
        as_employee,
        visitor,
    } = cmd
    else {
        return Ok(());
    };

    let engine = DialogueEngine::from_config(cfg)?;
    let input = SharedStdin::new();
    let face = recognizer(as_employee.as_deref(), *visitor, cfg, &input)?;
    let wake = WakeWordMatcher::new(&cfg.wake_word);
    info(format!("Say \"{}\" to wake me up. Ctrl-D quits.", wake.word()));

    let voice = ConsoleVoice::stdin(input.clone(), cfg.voice.wrap_width).with_tts(cfg.voice.tts_command.clone());
    let mut bot = ReceptionBot::new(
        engine,
        Box::new(LineWake::stdin(wake, input)),
        face,
        Box::new(voice),
        Box::new(ConsoleAvatar::default()),
        BotSettings::from_config(cfg),
    );
    bot.run()
}
