use crate::dto::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "ADMIN")]
    Admin,
}

/// Credentials issued by the auth endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthTokens {
    #[serde(default, alias = "accessToken", deserialize_with = "lenient::optional_string")]
    pub access_token: Option<String>,
    #[serde(default, alias = "refreshToken", deserialize_with = "lenient::optional_string")]
    pub refresh_token: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::optional_string")]
    pub token_type: Option<String>,
    #[serde(default, alias = "expiresIn")]
    pub expires_in: Option<u64>,
}

impl AuthTokens {
    pub fn bearer(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
