//! Face matching against enrolled embeddings.

use super::console::SharedStdin;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::prompt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;
use std::process::Command;

/// Stored references for one person. Older files hold a single vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Stored {
    Many(Vec<Vec<f32>>),
    One(Vec<f32>),
}

impl Stored {
    fn into_vecs(self) -> Vec<Vec<f32>> {
        match self {
            Stored::Many(v) => v,
            Stored::One(v) => vec![v],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub name: String,
    pub score: f32,
    /// Best score of any other person, or -1 when only one person matched.
    pub second_best: f32,
}

impl FaceMatch {
    pub fn accepted(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

/// name → enrolled embeddings, persisted as JSON.
#[derive(Debug, Clone, Default)]
pub struct FaceDb {
    entries: BTreeMap<String, Vec<Vec<f32>>>,
}

fn l2_normalize(v: &[f32]) -> Option<Vec<f32>> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if v.is_empty() || norm == 0.0 || !norm.is_finite() {
        return None;
    }
    Some(v.iter().map(|x| x / norm).collect())
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl FaceDb {
    /// Load the database; a missing file is an empty database.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: BTreeMap<String, Stored> = serde_json::from_str(&content)?;
        Ok(Self {
            entries: raw.into_iter().map(|(k, v)| (k, v.into_vecs())).collect(),
        })
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }

    pub fn enroll(&mut self, name: &str, embedding: Vec<f32>) -> AppResult<()> {
        if l2_normalize(&embedding).is_none() {
            return Err(AppError::Face(format!("empty or zero embedding for {name}")));
        }
        self.entries
            .entry(name.trim().to_string())
            .or_default()
            .push(embedding);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Enrolled names with their embedding counts.
    pub fn names(&self) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best cosine match for a live embedding.
    ///
    /// References that are empty, zero-norm or of a different length than the
    /// live vector are skipped. `None` when nothing could be compared.
    pub fn identify(&self, live: &[f32]) -> Option<FaceMatch> {
        let live = l2_normalize(live)?;

        let mut per_name: Vec<(&str, f32)> = Vec::new();
        for (name, refs) in &self.entries {
            let mut best: Option<f32> = None;
            for r in refs {
                if r.len() != live.len() {
                    tracing::warn!(%name, live = live.len(), stored = r.len(), "embedding length mismatch, skipped");
                    continue;
                }
                let Some(r) = l2_normalize(r) else { continue };
                let score = dot(&live, &r);
                best = Some(best.map_or(score, |b: f32| b.max(score)));
            }
            if let Some(score) = best {
                per_name.push((name, score));
            }
        }

        per_name.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (name, score) in per_name.iter().take(3) {
            tracing::debug!(%name, score, "face similarity");
        }

        let (name, score) = *per_name.first()?;
        let second_best = per_name.get(1).map(|(_, s)| *s).unwrap_or(-1.0);
        Some(FaceMatch {
            name: name.to_string(),
            score,
            second_best,
        })
    }
}

/// Identifies the person in front of the kiosk. `Ok(None)` means unknown.
pub trait FaceRecognizer {
    fn recognize(&mut self) -> AppResult<Option<String>>;
}

/// Operator types the name of the person at the desk; blank means visitor.
pub struct ConsoleRecognizer<R: BufRead> {
    reader: R,
    interactive: bool,
}

impl<R: BufRead> ConsoleRecognizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            interactive: false,
        }
    }
}

impl ConsoleRecognizer<SharedStdin> {
    pub fn stdin(input: SharedStdin) -> Self {
        Self {
            reader: input,
            interactive: true,
        }
    }
}

impl<R: BufRead> FaceRecognizer for ConsoleRecognizer<R> {
    fn recognize(&mut self) -> AppResult<Option<String>> {
        if self.interactive {
            prompt("(camera) who is at the desk? blank = visitor");
        }
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        let name = line.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }
}

/// Always returns the same identity; used by `run --as` and `--visitor`.
pub struct FixedRecognizer(pub Option<String>);

impl FaceRecognizer for FixedRecognizer {
    fn recognize(&mut self) -> AppResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Runs an external capture program printing a JSON embedding and matches it.
pub struct EmbeddingRecognizer {
    db: FaceDb,
    command: String,
    threshold: f32,
}

impl EmbeddingRecognizer {
    pub fn new(db: FaceDb, command: &str, threshold: f32) -> Self {
        Self {
            db,
            command: command.to_string(),
            threshold,
        }
    }
}

/// Run a capture command (`program arg arg…`) and parse its JSON embedding.
pub fn capture_embedding(command: &str) -> AppResult<Vec<f32>> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| AppError::Face("empty capture command".into()))?;

    let output = Command::new(program)
        .args(parts)
        .output()
        .map_err(|e| AppError::Face(format!("cannot run '{program}': {e}")))?;

    if !output.status.success() {
        return Err(AppError::Face(format!(
            "capture command failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let embedding: Vec<f32> = serde_json::from_str(stdout.trim())?;
    Ok(embedding)
}

impl FaceRecognizer for EmbeddingRecognizer {
    fn recognize(&mut self) -> AppResult<Option<String>> {
        let live = capture_embedding(&self.command)?;
        let Some(m) = self.db.identify(&live) else {
            tracing::info!("no comparable face embeddings");
            return Ok(None);
        };

        tracing::info!(
            name = %m.name,
            score = m.score,
            second_best = m.second_best,
            threshold = self.threshold,
            "closest face match"
        );
        Ok(m.accepted(self.threshold).then_some(m.name))
    }
}
