//! Outgoing SMS: a local outbox, or the Twilio REST API.

use crate::config::{SmsBackend, SmsConfig};
use crate::db::log::ttlog_quiet;
use crate::db::outbox::record_sms;
use crate::errors::{AppError, AppResult};
use crate::models::sms::Delivery;
use rusqlite::Connection;
use serde_json::Value;
use std::time::Duration;

pub trait SmsSender {
    /// Hand a message to the gateway. Returns how far it got.
    fn send(&mut self, to: &str, body: &str) -> AppResult<Delivery>;
}

/// Keeps messages in the `sms_outbox` table only.
#[derive(Debug, Default)]
pub struct OutboxSms;

impl SmsSender for OutboxSms {
    fn send(&mut self, to: &str, _body: &str) -> AppResult<Delivery> {
        tracing::info!(%to, "SMS queued in outbox");
        Ok(Delivery::Queued)
    }
}

#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub api_key_secret: Option<String>,
    pub from: String,
}

impl TwilioCredentials {
    /// Read credentials through `lookup` (normally `std::env::var`).
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let account_sid = get("TWILIO_ACCOUNT_SID");
        let auth_token = get("TWILIO_AUTH_TOKEN");
        let from = get("TWILIO_PHONE_NUMBER");
        let api_key_secret = get("TWILIO_API_KEY_SECRET");

        let mut missing = Vec::new();
        if account_sid.is_none() {
            missing.push("TWILIO_ACCOUNT_SID");
        }
        if from.is_none() {
            missing.push("TWILIO_PHONE_NUMBER");
        }

        let is_api_key = account_sid.as_deref().is_some_and(|s| s.starts_with("SK"));
        if is_api_key && api_key_secret.is_none() {
            missing.push("TWILIO_API_KEY_SECRET");
        }
        if !is_api_key && auth_token.is_none() {
            missing.push("TWILIO_AUTH_TOKEN");
        }

        if !missing.is_empty() {
            return Err(AppError::Sms(format!(
                "missing Twilio config: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            account_sid: account_sid.unwrap_or_default(),
            auth_token: auth_token.unwrap_or_default(),
            api_key_secret,
            from: from.unwrap_or_default(),
        })
    }

    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Basic-auth pair: API key SID + secret, or account SID + auth token.
    pub fn basic_auth(&self) -> (&str, &str) {
        match &self.api_key_secret {
            Some(secret) if self.account_sid.starts_with("SK") => {
                (self.account_sid.as_str(), secret.as_str())
            }
            _ => (self.account_sid.as_str(), self.auth_token.as_str()),
        }
    }
}

pub struct TwilioSms {
    http: reqwest::blocking::Client,
    creds: TwilioCredentials,
}

impl TwilioSms {
    pub fn new(creds: TwilioCredentials) -> AppResult<Self> {
        if !creds.from.starts_with('+') {
            tracing::warn!(from = %creds.from, "TWILIO_PHONE_NUMBER should be in E.164 format");
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { http, creds })
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.creds.account_sid
        )
    }
}

impl SmsSender for TwilioSms {
    fn send(&mut self, to: &str, body: &str) -> AppResult<Delivery> {
        let (user, secret) = self.creds.basic_auth();
        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(user, Some(secret))
            .form(&[("To", to), ("From", self.creds.from.as_str()), ("Body", body)])
            .send()?;

        let status = resp.status();
        let text = resp.text()?;
        let json: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            let code = json.get("code").and_then(Value::as_i64).unwrap_or_default();
            let message = json
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(text.as_str());
            if code == 21608 {
                tracing::warn!(%to, "Twilio trial account: recipient must be verified first");
            }
            return Err(AppError::Sms(format!("Twilio {status} ({code}): {message}")));
        }

        let sid = json.get("sid").and_then(Value::as_str).unwrap_or("?");
        tracing::info!(%to, %sid, "SMS sent");
        Ok(Delivery::Sent)
    }
}

pub fn from_config(cfg: &SmsConfig) -> AppResult<Box<dyn SmsSender>> {
    Ok(match cfg.backend {
        SmsBackend::Outbox => Box::new(OutboxSms),
        SmsBackend::Twilio => Box::new(TwilioSms::new(TwilioCredentials::from_env()?)?),
    })
}

/// Send and record a message. Never fails: delivery problems are logged and
/// recorded as `failed` so the conversation can go on.
pub fn deliver(sender: &mut dyn SmsSender, conn: &Connection, to: &str, body: &str) -> Delivery {
    let (status, error) = match sender.send(to, body) {
        Ok(d) => (d, String::new()),
        Err(e) => {
            tracing::warn!(%to, error = %e, "SMS delivery failed");
            (Delivery::Failed, e.to_string())
        }
    };

    if let Err(e) = record_sms(conn, to, body, status, &error) {
        tracing::warn!(%to, error = %e, "failed to record SMS in outbox");
    }
    let op = if status == Delivery::Failed { "sms_failed" } else { "sms" };
    ttlog_quiet(conn, op, to, body);

    status
}
