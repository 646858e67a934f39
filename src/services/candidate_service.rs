use crate::dto::candidate_dto::{UpdateCandidatePayload, UploadCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateFilters, FilterUpdate};
use crate::services::gateway::RemoteGateway;
use crate::services::lifecycle::{Cache, ErrorSlot, OperationTracker};
use crate::services::notification_service::NotificationService;
use crate::utils::validation::validate;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use url::Url;

#[derive(Default)]
struct CandidateState {
    cache: Cache<Candidate>,
    selected: Option<Candidate>,
    filters: CandidateFilters,
}

/// Candidate pool cache with filters, selection and CV upload.
#[derive(Clone)]
pub struct CandidateService {
    gateway: RemoteGateway,
    notifications: NotificationService,
    tracker: OperationTracker,
    state: Arc<RwLock<CandidateState>>,
    error: ErrorSlot,
}

impl CandidateService {
    pub fn new(gateway: RemoteGateway, notifications: NotificationService) -> Self {
        Self {
            gateway,
            notifications,
            tracker: OperationTracker::new(),
            state: Arc::new(RwLock::new(CandidateState::default())),
            error: ErrorSlot::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CandidateState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CandidateState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn list(&self) -> Vec<Candidate> {
        self.read().cache.items().to_vec()
    }

    pub fn get(&self, id: i64) -> Option<Candidate> {
        self.read().cache.get(id).cloned()
    }

    pub fn filters(&self) -> CandidateFilters {
        self.read().filters.clone()
    }

    pub fn set_filters(&self, update: FilterUpdate) {
        self.write().filters.merge(update);
    }

    /// Cache filtered by the stored filters.
    pub fn filtered(&self) -> Vec<Candidate> {
        let state = self.read();
        state.filters.apply(state.cache.items())
    }

    pub fn filtered_view(&self, filters: &CandidateFilters) -> Vec<Candidate> {
        filters.apply(self.read().cache.items())
    }

    pub fn selected(&self) -> Option<Candidate> {
        self.read().selected.clone()
    }

    pub fn select(&self, candidate: Option<Candidate>) {
        self.write().selected = candidate;
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

    pub fn preview_url(&self, id: i64) -> Result<Url> {
        self.gateway.preview_url(id)
    }

    pub async fn fetch_all(&self) -> Result<()> {
        let op = self.tracker.begin();
        match self.gateway.list_candidates(op.token()).await {
            Ok(candidates) => {
                let count = candidates.len();
                if self.write().cache.replace_all(op.epoch(), candidates) {
                    tracing::debug!(count, "Candidate list refreshed");
                } else {
                    tracing::debug!(epoch = op.epoch(), "Discarding superseded candidate list");
                }
                Ok(())
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to fetch candidates")),
        }
    }

    pub async fn upload(&self, payload: UploadCandidatePayload) -> Result<Candidate> {
        validate(&payload).map_err(Error::Validation)?;
        let op = self.tracker.begin();
        let file_name = payload.file_name.clone();

        match self.gateway.upload_candidate(payload, op.token()).await {
            Ok(candidate) => {
                tracing::info!(id = candidate.id, file = %file_name, "CV uploaded");
                self.write().cache.prepend(op.epoch(), candidate.clone());
                self.notifications.success("CV uploaded and processed!");
                Ok(candidate)
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to upload CV")),
        }
    }

    /// Partial update. The cached entry is replaced by the server's copy.
    pub async fn update(&self, payload: UpdateCandidatePayload) -> Result<Candidate> {
        validate(&payload).map_err(Error::Validation)?;
        let op = self.tracker.begin();

        match self.gateway.update_candidate(&payload, op.token()).await {
            Ok(candidate) => {
                let mut state = self.write();
                if !state.cache.replace(op.epoch(), candidate.clone()) {
                    tracing::debug!(id = candidate.id, "Updated candidate not cached");
                }
                if state.selected.as_ref().is_some_and(|s| s.id == candidate.id) {
                    state.selected = Some(candidate.clone());
                }
                drop(state);
                self.notifications.success("Candidate updated");
                Ok(candidate)
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to update candidate")),
        }
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        let op = self.tracker.begin();
        match self.gateway.delete_candidate(id, op.token()).await {
            Ok(()) => {
                let mut state = self.write();
                state.cache.remove(op.epoch(), id);
                if state.selected.as_ref().is_some_and(|s| s.id == id) {
                    state.selected = None;
                }
                drop(state);
                tracing::info!(id, "Candidate removed");
                self.notifications.success("Candidate removed");
                Ok(())
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to delete candidate")),
        }
    }

    /// Fetches one candidate and makes it the selection.
    pub async fn load_detail(&self, id: i64) -> Result<Candidate> {
        let op = self.tracker.begin();
        match self.gateway.get_candidate(id, op.token()).await {
            Ok(candidate) => {
                let mut state = self.write();
                state.cache.replace(op.epoch(), candidate.clone());
                state.selected = Some(candidate.clone());
                Ok(candidate)
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to load candidate")),
        }
    }
}
