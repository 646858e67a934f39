use crate::dto::lenient;
use crate::utils::{id, time};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ASSISTANT_FAILURE_TEXT: &str = "Sorry, something went wrong. Please try again.";

/// Author of a message. Replies that omit it are the assistant's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    #[serde(rename = "HR", alias = "hr", alias = "user")]
    Hr,
    #[default]
    #[serde(rename = "ASSISTANT", alias = "assistant")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    #[serde(default)]
    pub role: ChatRole,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(default, alias = "created_at", deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "jdId",
        alias = "jd_id",
        deserialize_with = "lenient::optional_id"
    )]
    pub scope: Option<i64>,
}

impl ChatMessage {
    /// Message authored on this client, stamped with a client id and the current time.
    pub fn local(role: ChatRole, message: impl Into<String>, scope: Option<i64>) -> Self {
        Self {
            id: id::next_client_id(),
            role,
            message: message.into(),
            created_at: Some(time::now()),
            scope,
        }
    }
}

/// Whether the server has acknowledged an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Delivery {
    /// Appended optimistically, not yet acknowledged.
    Local,
    Confirmed,
    /// Client-generated stand-in for a reply that failed.
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatEntry {
    pub message: ChatMessage,
    pub delivery: Delivery,
}

impl ChatEntry {
    pub fn confirmed(message: ChatMessage) -> Self {
        Self {
            message,
            delivery: Delivery::Confirmed,
        }
    }

    pub fn local(message: ChatMessage) -> Self {
        Self {
            message,
            delivery: Delivery::Local,
        }
    }

    pub fn failure_reply(scope: Option<i64>) -> Self {
        Self {
            message: ChatMessage::local(ChatRole::Assistant, ASSISTANT_FAILURE_TEXT, scope),
            delivery: Delivery::Synthetic,
        }
    }
}
