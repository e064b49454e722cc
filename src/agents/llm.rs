//! Hosted or local language model used for general conversation and for
//! pulling `{field, name}` out of employee questions.

use crate::config::{LlmBackend, LlmConfig};
use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde_json::{Value, json};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::time::Duration;

pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting to my brain right now.";

pub trait LanguageModel {
    fn ask(&mut self, prompt: &str) -> AppResult<String>;
}

/// No model configured: every call fails and callers use their scripted fallback.
pub struct OfflineModel;

impl LanguageModel for OfflineModel {
    fn ask(&mut self, _prompt: &str) -> AppResult<String> {
        Err(AppError::Model("no language model configured".into()))
    }
}

/// Pipes the prompt to an external program and reads the reply from stdout.
pub struct CommandModel {
    program: String,
    args: Vec<String>,
}

impl CommandModel {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

impl LanguageModel for CommandModel {
    fn ask(&mut self, prompt: &str) -> AppResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AppError::Model(format!("cannot run '{}': {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(AppError::Model(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let reply = parse_model_reply(&String::from_utf8_lossy(&output.stdout));
        if reply.is_empty() {
            return Err(AppError::Model("empty reply".into()));
        }
        Ok(reply)
    }
}

/// OpenAI-compatible chat completions endpoint.
pub struct HttpModel {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl HttpModel {
    pub fn new(cfg: &LlmConfig) -> AppResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: std::env::var(&cfg.api_key_env)
                .ok()
                .filter(|s| !s.is_empty()),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        })
    }
}

impl LanguageModel for HttpModel {
    fn ask(&mut self, prompt: &str) -> AppResult<String> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let mut req = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let started = std::time::Instant::now();
        let resp = req.send()?;
        let status = resp.status();
        let text = resp.text()?;
        tracing::debug!(
            model = %self.model,
            %status,
            latency_ms = started.elapsed().as_millis() as u64,
            "model response"
        );

        if !status.is_success() {
            return Err(AppError::Model(format!("status={status} body={text}")));
        }

        let reply = parse_model_reply(&text);
        if reply.is_empty() {
            return Err(AppError::Model("reply without text content".into()));
        }
        Ok(reply)
    }
}

pub fn from_config(cfg: &LlmConfig) -> AppResult<Box<dyn LanguageModel>> {
    Ok(match cfg.backend {
        LlmBackend::Offline => Box::new(OfflineModel),
        LlmBackend::Command => {
            let program = cfg
                .command
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| AppError::Config("llm.command is required for the command backend".into()))?;
            Box::new(CommandModel::new(program, &cfg.args))
        }
        LlmBackend::Http => Box::new(HttpModel::new(cfg)?),
    })
}

fn str_at<'a>(v: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut cur = v;
    for key in path {
        cur = match key.parse::<usize>() {
            Ok(i) => cur.get(i)?,
            Err(_) => cur.get(*key)?,
        };
    }
    cur.as_str()
}

/// Text of a model reply, whatever provider shape it comes in.
/// Bodies that are not JSON, or JSON of no known shape, are returned trimmed.
pub fn parse_model_reply(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(v) = serde_json::from_str::<Value>(trimmed) else {
        return trimmed.to_string();
    };
    if !v.is_object() {
        return trimmed.to_string();
    }

    const SHAPES: &[&[&str]] = &[
        &["outputText"],
        &["content", "0", "text"],
        &["output", "message", "content", "0", "text"],
        &["choices", "0", "message", "content"],
        &["generation"],
        &["completion"],
        &["text"],
    ];

    SHAPES
        .iter()
        .find_map(|p| str_at(&v, p))
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn fence_lang_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+\s*\n").expect("valid regex"))
}

fn field_name_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?is)\{[^{}]*"field"[^{}]*"name"[^{}]*\}"#).expect("valid regex"))
}

fn any_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{[^{}]+\}").expect("valid regex"))
}

fn loose_pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)field["\s]*:["\s]*["']([^"']+)["'][^}]*name["\s]*:["\s]*["']([^"']+)["']"#)
            .expect("valid regex")
    })
}

/// Pull a JSON object out of a model reply (code fences allowed).
pub fn extract_json_object(content: &str) -> Option<String> {
    let mut content = content.trim().to_string();
    if content.starts_with("```") {
        content = content.trim_matches('`').to_string();
        content = fence_lang_re().replace(&content, "").to_string();
    }

    if let Some(m) = field_name_object_re().find(&content) {
        return Some(m.as_str().trim().to_string());
    }
    if let Some(m) = any_object_re().find(&content) {
        return Some(m.as_str().trim().to_string());
    }
    loose_pair_re()
        .captures(&content)
        .map(|c| json!({ "field": &c[1], "name": &c[2] }).to_string())
}

/// `(field, name)` from an extracted object. Single-quoted objects are accepted.
pub fn parse_field_name(object: &str) -> Option<(String, String)> {
    let v: Value = serde_json::from_str(object)
        .or_else(|_| serde_json::from_str(&object.replace('\'', "\"")))
        .ok()?;
    let field = v.get("field").and_then(Value::as_str).unwrap_or("").trim();
    let name = v.get("name").and_then(Value::as_str).unwrap_or("").trim();
    Some((field.to_string(), name.to_string()))
}

pub fn employee_extraction_prompt(text: &str) -> String {
    format!(
        "You are a JSON extraction API for employee information. \
Return ONLY a JSON object with exactly two keys, \"field\" and \"name\", using double quotes.\n\
If the person is unclear, return {{\"field\": \"\", \"name\": \"\"}}.\n\n\
Allowed fields: \"email\", \"department\", \"phone\", \"position\", \"join_date\", \"name\" (general information).\n\n\
Input: \"What is the email of Alice Smith\"\nOutput: {{\"field\": \"email\", \"name\": \"Alice Smith\"}}\n\
Input: \"Tell me about Shakti\"\nOutput: {{\"field\": \"name\", \"name\": \"Shakti\"}}\n\n\
Now extract from this input: '{text}'"
    )
}

pub fn receptionist_prompt(text: &str) -> String {
    format!(
        "You are a professional human receptionist at a company. Respond naturally and professionally.\n\
Keep replies short: 1-2 sentences, unless the user explicitly asks for details.\n\
Never mention that you are an AI.\n\nUser query: {text}"
    )
}
