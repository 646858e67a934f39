use bytes::Bytes;
use serde::Serialize;
use validator::{Validate, ValidationError};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// CV upload form. Sent as multipart, never serialized as JSON.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "file_present", skip_on_field_errors = false))]
pub struct UploadCandidatePayload {
    #[validate(length(min = 1, message = "Please select a domain"))]
    pub domain: String,
    #[validate(length(min = 1, message = "Please enter your email"))]
    pub email: String,
    pub file_name: String,
    #[validate(custom(function = "pdf_only"))]
    pub content_type: String,
    pub file: Bytes,
}

impl UploadCandidatePayload {
    pub fn pdf(
        file_name: impl Into<String>,
        file: impl Into<Bytes>,
        domain: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            email: email.into(),
            file_name: file_name.into(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            file: file.into(),
        }
    }
}

fn pdf_only(content_type: &str) -> Result<(), ValidationError> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    if essence.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
        return Ok(());
    }
    let mut err = ValidationError::new("pdf");
    err.message = Some("Only PDF files are accepted".into());
    Err(err)
}

/// Struct-level so the bytes never become an error param. The code names the field.
fn file_present(payload: &UploadCandidatePayload) -> Result<(), ValidationError> {
    if !payload.file.is_empty() {
        return Ok(());
    }
    let mut err = ValidationError::new("file");
    err.message = Some("Please select a CV file".into());
    Err(err)
}

/// Partial candidate update. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidatePayload {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Domain cannot be empty"))]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 80, message = "Experience looks wrong"))]
    pub exp_years: Option<u32>,
}

impl UpdateCandidatePayload {
    pub fn for_candidate(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}
