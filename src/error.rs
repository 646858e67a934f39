use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Request failed: {}", describe_request(.status, .message))]
    Request {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("Session expired")]
    AuthorizationExpired,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Request {
            status,
            message: Some(message.into()),
        }
    }

    /// Message the server attached to a failed response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Request { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Text shown to the user for this failure: the server's message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Whether the failure must surface as a notification. Validation errors, session expiry
    /// and cancellation never do.
    pub fn is_reportable(&self) -> bool {
        !matches!(
            self,
            Error::Validation(_) | Error::AuthorizationExpired | Error::Cancelled
        )
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Timeout(_))
            || matches!(self, Error::Reqwest(e) if e.is_connect() || e.is_timeout())
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

fn describe_request(status: &Option<u16>, message: &Option<String>) -> String {
    match (status, message.as_deref()) {
        (Some(status), Some(message)) => format!("{} {}", status, message),
        (Some(status), None) => format!("status {}", status),
        (None, Some(message)) => message.to_string(),
        (None, None) => "no response".to_string(),
    }
}

/// Field name → first error message, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            // struct-level errors are keyed by their code
            let keyed: Vec<_> = if field == "__all__" {
                errs.iter().map(|e| (e.code.to_string(), e)).collect()
            } else {
                errs.first().map(|e| (field.to_string(), e)).into_iter().collect()
            };
            for (key, err) in keyed {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.insert(key, message);
            }
        }
        out
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::Validation(errors.into())
    }
}
