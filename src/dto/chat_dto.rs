use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct SendMessagePayload {
    #[validate(custom(function = "not_blank"))]
    pub message: String,
    /// Always serialized; `null` addresses the global stream.
    pub jd_id: Option<i64>,
}

impl SendMessagePayload {
    pub fn new(message: impl Into<String>, scope: Option<i64>) -> Self {
        Self {
            message: message.into().trim().to_string(),
            jd_id: scope,
        }
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("required");
        err.message = Some("Message is required".into());
        return Err(err);
    }
    Ok(())
}
