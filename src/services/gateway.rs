use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::dto::candidate_dto::{UpdateCandidatePayload, UploadCandidatePayload};
use crate::dto::chat_dto::SendMessagePayload;
use crate::dto::envelope;
use crate::dto::job_dto::CreateJobPayload;
use crate::error::{Error, Result};
use crate::models::auth::AuthTokens;
use crate::models::candidate::Candidate;
use crate::models::chat::ChatMessage;
use crate::models::job::JobDescription;
use crate::routes::{Navigator, Route};
use crate::services::session_store::SessionStore;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    Multipart(UploadCandidatePayload),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub bearer: Option<String>,
    /// Sent without a credential; a 401 is a plain failure rather than a session expiry.
    pub anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            bearer: None,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: UploadCandidatePayload) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: StatusCode, value: &JsonValue) -> Self {
        Self::new(status, value.to_string())
    }
}

/// Moves one request over the wire. Status handling belongs to [`RemoteGateway`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("recruitment-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        endpoint(&self.base_url, path)
    }
}

/// Resolves an API path under the base url, keeping any path prefix the base carries.
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| Error::Config(format!("Invalid request path {}: {}", path, e)))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = self.url(&request.path)?;
        let mut builder = self.client.request(request.method, url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(upload) => builder.multipart(upload_form(upload)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}

fn upload_form(upload: UploadCandidatePayload) -> Result<Form> {
    let file = Part::bytes(upload.file.to_vec())
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)?;
    Ok(Form::new()
        .part("file", file)
        .text("domain", upload.domain)
        .text("email", upload.email))
}

/// Typed access to the remote API. Every call goes through [`RemoteGateway::execute`], which
/// attaches the session credential and turns a 401 into a global session expiry.
#[derive(Clone)]
pub struct RemoteGateway {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    navigator: Navigator,
    base_url: Url,
    timeout: Duration,
}

impl RemoteGateway {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionStore,
        navigator: Navigator,
        base_url: Url,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
            base_url,
            timeout,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn execute(
        &self,
        mut request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<JsonValue> {
        if !request.anonymous {
            request.bearer = self.session.token();
        }
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let request_id = Uuid::new_v4();
        let method = request.method.clone();
        let path = request.path.clone();
        let anonymous = request.anonymous;
        tracing::debug!(%request_id, %method, %path, "Sending request");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%request_id, %method, %path, "Request cancelled");
                return Err(Error::Cancelled);
            }
            result = tokio::time::timeout(self.timeout, self.transport.send(request)) => match result {
                Ok(response) => response?,
                Err(_) => {
                    tracing::warn!(%request_id, %method, %path, timeout = ?self.timeout, "Request timed out");
                    return Err(Error::Timeout(self.timeout));
                }
            },
        };

        let status = response.status;
        if status == StatusCode::UNAUTHORIZED && !anonymous {
            tracing::warn!(%request_id, %method, %path, "Authorization expired, clearing session");
            self.session.clear();
            self.navigator.redirect(Route::Login);
            return Err(Error::AuthorizationExpired);
        }
        if !status.is_success() {
            let message = envelope::error_message(&response.body);
            tracing::debug!(%request_id, %method, %path, status = status.as_u16(), ?message, "Request failed");
            return Err(Error::Request {
                status: Some(status.as_u16()),
                message,
            });
        }

        tracing::debug!(%request_id, status = status.as_u16(), "Request succeeded");
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonValue::Null);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub async fn login(&self, payload: &LoginPayload, cancel: &CancellationToken) -> Result<AuthTokens> {
        let request = ApiRequest::post("/api/auth/login").json(payload)?.anonymous();
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    pub async fn register(
        &self,
        payload: &RegisterPayload,
        cancel: &CancellationToken,
    ) -> Result<AuthTokens> {
        let request = ApiRequest::post("/api/auth/register").json(payload)?.anonymous();
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    pub async fn list_candidates(&self, cancel: &CancellationToken) -> Result<Vec<Candidate>> {
        envelope::decode_list(self.execute(ApiRequest::get("/api/candidates"), cancel).await?)
    }

    pub async fn get_candidate(&self, id: i64, cancel: &CancellationToken) -> Result<Candidate> {
        let request = ApiRequest::get(format!("/api/candidates/{}", id));
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    pub async fn upload_candidate(
        &self,
        payload: UploadCandidatePayload,
        cancel: &CancellationToken,
    ) -> Result<Candidate> {
        let request = ApiRequest::post("/api/candidates/upload").multipart(payload);
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    pub async fn update_candidate(
        &self,
        payload: &UpdateCandidatePayload,
        cancel: &CancellationToken,
    ) -> Result<Candidate> {
        let request = ApiRequest::patch(format!("/api/candidates/{}", payload.id)).json(payload)?;
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    pub async fn delete_candidate(&self, id: i64, cancel: &CancellationToken) -> Result<()> {
        self.execute(ApiRequest::delete(format!("/api/candidates/{}", id)), cancel)
            .await?;
        Ok(())
    }

    /// Address of the stored CV, for embedding in a viewer.
    pub fn preview_url(&self, id: i64) -> Result<Url> {
        endpoint(&self.base_url, &format!("/api/candidates/{}/preview", id))
    }

    pub async fn list_jobs(&self, cancel: &CancellationToken) -> Result<Vec<JobDescription>> {
        envelope::decode_list(self.execute(ApiRequest::get("/api/jd"), cancel).await?)
    }

    pub async fn get_job(&self, id: i64, cancel: &CancellationToken) -> Result<JobDescription> {
        let request = ApiRequest::get(format!("/api/jd/{}", id));
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    /// Creates the job and returns it with its computed matches in one round trip.
    pub async fn create_and_match(
        &self,
        payload: &CreateJobPayload,
        cancel: &CancellationToken,
    ) -> Result<JobDescription> {
        let request = ApiRequest::post("/api/jd/match").json(payload)?;
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    pub async fn delete_job(&self, id: i64, cancel: &CancellationToken) -> Result<()> {
        self.execute(ApiRequest::delete(format!("/api/jd/{}", id)), cancel)
            .await?;
        Ok(())
    }

    pub async fn send_chat(
        &self,
        payload: &SendMessagePayload,
        cancel: &CancellationToken,
    ) -> Result<ChatMessage> {
        let request = ApiRequest::post("/api/chat").json(payload)?;
        envelope::decode_one(self.execute(request, cancel).await?)
    }

    pub async fn chat_history(
        &self,
        scope: Option<i64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChatMessage>> {
        let path = match scope {
            Some(jd_id) => format!("/api/chat/history/{}", jd_id),
            None => "/api/chat/history".to_string(),
        };
        envelope::decode_list(self.execute(ApiRequest::get(path), cancel).await?)
    }

    pub async fn clear_chat_history(&self, cancel: &CancellationToken) -> Result<()> {
        self.execute(ApiRequest::delete("/api/chat/history"), cancel)
            .await?;
        Ok(())
    }
}
