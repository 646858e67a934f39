use crate::dto::job_dto::CreateJobPayload;
use crate::error::{Error, Result};
use crate::models::job::JobDescription;
use crate::services::gateway::RemoteGateway;
use crate::services::lifecycle::{Cache, ErrorSlot, OperationTracker};
use crate::services::notification_service::NotificationService;
use crate::utils::validation::validate;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct JobState {
    cache: Cache<JobDescription>,
    selected: Option<JobDescription>,
}

#[derive(Clone)]
pub struct JobService {
    gateway: RemoteGateway,
    notifications: NotificationService,
    tracker: OperationTracker,
    state: Arc<RwLock<JobState>>,
    error: ErrorSlot,
}

impl JobService {
    pub fn new(gateway: RemoteGateway, notifications: NotificationService) -> Self {
        Self {
            gateway,
            notifications,
            tracker: OperationTracker::new(),
            state: Arc::new(RwLock::new(JobState::default())),
            error: ErrorSlot::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, JobState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, JobState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn list(&self) -> Vec<JobDescription> {
        self.read().cache.items().to_vec()
    }

    pub fn get(&self, id: i64) -> Option<JobDescription> {
        self.read().cache.get(id).cloned()
    }

    pub fn selected(&self) -> Option<JobDescription> {
        self.read().selected.clone()
    }

    pub fn select(&self, job: Option<JobDescription>) {
        self.write().selected = job;
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

    pub async fn fetch_all(&self) -> Result<()> {
        let op = self.tracker.begin();
        match self.gateway.list_jobs(op.token()).await {
            Ok(jobs) => {
                let count = jobs.len();
                if self.write().cache.replace_all(op.epoch(), jobs) {
                    tracing::debug!(count, "Job list refreshed");
                } else {
                    tracing::debug!(epoch = op.epoch(), "Discarding superseded job list");
                }
                Ok(())
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to fetch jobs")),
        }
    }

    /// Creates the job; the returned record already carries its match results.
    pub async fn create_and_match(&self, payload: CreateJobPayload) -> Result<JobDescription> {
        validate(&payload).map_err(Error::Validation)?;
        let op = self.tracker.begin();

        match self.gateway.create_and_match(&payload, op.token()).await {
            Ok(job) => {
                tracing::info!(id = job.id, title = %job.title, matches = job.match_results.len(), "Job created");
                self.write().cache.prepend(op.epoch(), job.clone());
                self.notifications.success("Job created and candidates matched!");
                Ok(job)
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to create job")),
        }
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        let op = self.tracker.begin();
        match self.gateway.delete_job(id, op.token()).await {
            Ok(()) => {
                let mut state = self.write();
                state.cache.remove(op.epoch(), id);
                if state.selected.as_ref().is_some_and(|j| j.id == id) {
                    state.selected = None;
                }
                drop(state);
                tracing::info!(id, "Job deleted");
                self.notifications.success("Job deleted");
                Ok(())
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to delete job")),
        }
    }

    pub async fn load_detail(&self, id: i64) -> Result<JobDescription> {
        let op = self.tracker.begin();
        match self.gateway.get_job(id, op.token()).await {
            Ok(job) => {
                let mut state = self.write();
                state.cache.replace(op.epoch(), job.clone());
                state.selected = Some(job.clone());
                Ok(job)
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to load job")),
        }
    }
}
