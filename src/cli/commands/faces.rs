use crate::agents::face::{FaceDb, capture_embedding};
use crate::cli::parser::{Commands, FacesAction};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;
use std::fs;

/// Embedding from a JSON file, or from the configured capture command.
fn read_embedding(file: Option<&str>, cfg: &Config) -> AppResult<Vec<f32>> {
    match file {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(content.trim())?)
        }
        None => {
            let command = cfg.recognition.capture_command.as_deref().ok_or_else(|| {
                AppError::Face("no --embedding given and recognition.capture_command is not set".into())
            })?;
            capture_embedding(command)
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Faces { action } = cmd else {
        return Ok(());
    };
    let path = cfg.face_db_path();
    let mut db = FaceDb::load(&path)?;

    match action {
        FacesAction::Enroll { name, embedding } => {
            let vector = read_embedding(embedding.as_deref(), cfg)?;
            db.enroll(name, vector)?;
            db.save(&path)?;
            success(format!("Face embedding enrolled for '{}'.", name.trim()));
        }

        FacesAction::List => {
            if db.is_empty() {
                info(format!("No faces enrolled in {}.", path.display()));
                return Ok(());
            }
            let mut table = Table::new(&["NAME", "EMBEDDINGS"]);
            for (name, count) in db.names() {
                table.add_row(vec![name, count.to_string()]);
            }
            print!("{}", table.render());
        }

        FacesAction::Identify { embedding } => {
            let vector = read_embedding(embedding.as_deref(), cfg)?;
            let threshold = cfg.recognition.similarity_threshold;
            match db.identify(&vector) {
                Some(m) if m.accepted(threshold) => success(format!(
                    "Recognised {} (similarity {:.3}, runner-up {:.3}).",
                    m.name, m.score, m.second_best
                )),
                Some(m) => warning(format!(
                    "Unknown face: closest is {} at {:.3}, below threshold {:.3}.",
                    m.name, m.score, threshold
                )),
                None => warning("Unknown face: no comparable embeddings enrolled."),
            }
        }

        FacesAction::Remove { name } => {
            if !db.remove(name) {
                return Err(AppError::Face(format!("'{name}' is not enrolled")));
            }
            db.save(&path)?;
            success(format!("Removed '{name}' from the face database."));
        }
    }

    Ok(())
}
