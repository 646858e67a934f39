pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::middleware::SessionGuard;
use crate::routes::Navigator;
use crate::services::{
    auth_service::AuthService,
    candidate_service::CandidateService,
    chat_service::ChatService,
    dialog_service::DialogService,
    gateway::{HttpTransport, RemoteGateway, Transport},
    job_service::JobService,
    notification_service::NotificationService,
    session_store::SessionStore,
};
use std::sync::Arc;

/// Every container wired to one gateway, one session and one notification queue.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub navigator: Navigator,
    pub gateway: RemoteGateway,
    pub notifications: NotificationService,
    pub dialogs: DialogService,
    pub auth: AuthService,
    pub candidates: CandidateService,
    pub jobs: JobService,
    pub chat: ChatService,
    pub guard: SessionGuard,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.api_base_url.clone())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let session = match &config.credential_file {
            Some(path) => SessionStore::persistent(path),
            None => SessionStore::new(),
        };
        Self::with_session(config, transport, session)
    }

    pub fn with_session(config: &Config, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        let navigator = Navigator::new();
        let notifications = NotificationService::new(config.notification_duration);
        let gateway = RemoteGateway::new(
            transport,
            session.clone(),
            navigator.clone(),
            config.api_base_url.clone(),
            config.request_timeout,
        );

        Self {
            auth: AuthService::new(gateway.clone(), notifications.clone()),
            candidates: CandidateService::new(gateway.clone(), notifications.clone()),
            jobs: JobService::new(gateway.clone(), notifications.clone()),
            chat: ChatService::new(gateway.clone(), notifications.clone()),
            guard: SessionGuard::new(session.clone(), navigator.clone()),
            dialogs: DialogService::new(),
            session,
            navigator,
            gateway,
            notifications,
        }
    }
}
