use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_time;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: String,
    /// CSV fallback for the employee directory
    pub employees_csv: Option<String>,
    pub face_db: String,
    pub wake_word: String,
    /// Person who handles walk-ins and department requests
    pub receptionist: String,
    pub follow_up_prompt: String,
    pub default_country_code: String,
    pub max_silent_turns: u32,
    pub calendar: CalendarConfig,
    pub recognition: RecognitionConfig,
    pub llm: LlmConfig,
    pub sms: SmsConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub office_start: String,
    pub office_end: String,
    pub slot_minutes: i64,
    pub default_duration: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub similarity_threshold: f32,
    /// External program printing a JSON embedding of the face in front of the camera.
    /// When unset the operator types the name at the console.
    pub capture_command: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    Offline,
    Command,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub endpoint: String,
    pub model: String,
    /// Name of the env var holding the bearer token for `http`
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsBackend {
    Outbox,
    Twilio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub backend: SmsBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub wrap_width: usize,
    /// Program invoked with the text to speak as its last argument (e.g. `espeak`)
    pub tts_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            employees_csv: None,
            face_db: Self::config_dir()
                .join("faces.json")
                .to_string_lossy()
                .to_string(),
            wake_word: "jarvis".to_string(),
            receptionist: "Alex".to_string(),
            follow_up_prompt: "How else can I help you?".to_string(),
            default_country_code: "+91".to_string(),
            max_silent_turns: 2,
            calendar: CalendarConfig::default(),
            recognition: RecognitionConfig::default(),
            llm: LlmConfig::default(),
            sms: SmsConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            office_start: "09:00".to_string(),
            office_end: "18:00".to_string(),
            slot_minutes: 30,
            default_duration: 30,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.30,
            capture_command: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Offline,
            command: None,
            args: Vec::new(),
            endpoint: "http://localhost:11434/v1/chat/completions".to_string(),
            model: "llama3".to_string(),
            api_key_env: "RRECEPTION_LLM_KEY".to_string(),
            max_tokens: 120,
            temperature: 0.6,
            timeout_secs: 20,
        }
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            backend: SmsBackend::Outbox,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            wrap_width: 72,
            tts_command: None,
        }
    }
}

impl CalendarConfig {
    /// Parsed office hours, validated so that opening precedes closing.
    pub fn office_hours(&self) -> AppResult<(NaiveTime, NaiveTime)> {
        let start = parse_time(&self.office_start)
            .ok_or_else(|| AppError::Config(format!("office_start: {}", self.office_start)))?;
        let end = parse_time(&self.office_end)
            .ok_or_else(|| AppError::Config(format!("office_end: {}", self.office_end)))?;
        if start >= end {
            return Err(AppError::Config(format!(
                "office_start ({}) must be before office_end ({})",
                self.office_start, self.office_end
            )));
        }
        if self.slot_minutes <= 0 || self.default_duration <= 0 {
            return Err(AppError::Config(
                "slot_minutes and default_duration must be positive".into(),
            ));
        }
        Ok((start, end))
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rreception")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rreception")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rreception.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rreception.sqlite")
    }

    /// Load configuration from the standard file, or defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Top-level keys present in the defaults but missing from the file.
    pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let on_disk: serde_yaml::Value = serde_yaml::from_str(&content)?;
        let defaults = serde_yaml::to_value(Self::default())?;

        let mut missing = Vec::new();
        if let (Some(disk), Some(def)) = (on_disk.as_mapping(), defaults.as_mapping()) {
            for key in def.keys() {
                if !disk.contains_key(key)
                    && let Some(k) = key.as_str()
                {
                    missing.push(k.to_string());
                }
            }
        }
        Ok(missing)
    }

    pub fn employees_csv_path(&self) -> Option<PathBuf> {
        self.employees_csv.as_deref().map(expand_tilde)
    }

    pub fn face_db_path(&self) -> PathBuf {
        expand_tilde(&self.face_db)
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("rreception.sqlite"),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            config.save_to(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
