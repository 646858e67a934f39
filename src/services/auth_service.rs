use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::models::auth::AuthTokens;
use crate::services::gateway::RemoteGateway;
use crate::services::lifecycle::{ErrorSlot, OperationTracker};
use crate::services::notification_service::NotificationService;
use crate::utils::validation::validate;

/// Owns the session credential: login, registration and logout.
#[derive(Clone)]
pub struct AuthService {
    gateway: RemoteGateway,
    notifications: NotificationService,
    tracker: OperationTracker,
    error: ErrorSlot,
}

impl AuthService {
    pub fn new(gateway: RemoteGateway, notifications: NotificationService) -> Self {
        Self {
            gateway,
            notifications,
            tracker: OperationTracker::new(),
            error: ErrorSlot::default(),
        }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<()> {
        validate(&payload).map_err(Error::Validation)?;
        let op = self.tracker.begin();
        self.error.clear();

        let token = match self
            .gateway
            .login(&payload, op.token())
            .await
            .and_then(require_bearer)
        {
            Ok(token) => token,
            Err(e) => return Err(self.error.fail(&self.notifications, e, "Login failed")),
        };

        self.gateway.session().set(token);
        tracing::info!(email = %payload.email, "Logged in");
        self.notifications.success("Login successful!");
        Ok(())
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<()> {
        validate(&payload).map_err(Error::Validation)?;
        let op = self.tracker.begin();
        self.error.clear();

        let token = match self
            .gateway
            .register(&payload, op.token())
            .await
            .and_then(require_bearer)
        {
            Ok(token) => token,
            Err(e) => return Err(self.error.fail(&self.notifications, e, "Registration failed")),
        };

        self.gateway.session().set(token);
        tracing::info!(email = %payload.email, role = ?payload.role, "Account registered");
        self.notifications.success("Account created!");
        Ok(())
    }

    /// Drops the credential locally. No request is made.
    pub fn logout(&self) {
        if self.gateway.session().clear() {
            tracing::info!("Logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.gateway.session().is_present()
    }

    pub fn token(&self) -> Option<String> {
        self.gateway.session().token()
    }

    pub fn is_busy(&self) -> bool {
        self.tracker.is_busy()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn clear_error(&self) {
        self.error.clear();
    }

    pub fn cancel_pending(&self) {
        self.tracker.cancel_pending();
    }
}

fn require_bearer(tokens: AuthTokens) -> Result<String> {
    tokens
        .bearer()
        .map(str::to_string)
        .ok_or_else(|| Error::request(None, "No token received"))
}
