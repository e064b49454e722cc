use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    Queued,
    Sent,
    Failed,
}

impl Delivery {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Delivery::Queued => "queued",
            Delivery::Sent => "sent",
            Delivery::Failed => "failed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Delivery::Queued),
            "sent" => Some(Delivery::Sent),
            "failed" => Some(Delivery::Failed),
            _ => None,
        }
    }
}

/// A row of the `sms_outbox` table.
#[derive(Debug, Clone, Serialize)]
pub struct SmsMessage {
    pub id: i64,
    pub created_at: String,
    pub recipient: String,
    pub body: String,
    pub status: Delivery,
    pub error: String,
}
