use crate::dto::chat_dto::SendMessagePayload;
use crate::error::{Error, Result};
use crate::models::chat::{ChatEntry, ChatMessage, ChatRole, Delivery};
use crate::services::gateway::RemoteGateway;
use crate::services::lifecycle::{ErrorSlot, OperationTracker};
use crate::services::notification_service::NotificationService;
use crate::utils::validation::validate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One conversation. `written` holds the epoch of the write that produced each entry.
#[derive(Default)]
struct Stream {
    entries: Vec<ChatEntry>,
    written: Vec<u64>,
    snapshot_epoch: u64,
}

impl Stream {
    fn push(&mut self, epoch: u64, entry: ChatEntry) {
        self.entries.push(entry);
        self.written.push(epoch);
    }

    /// Installs server history, keeping entries written after the history was requested.
    fn apply_history(&mut self, epoch: u64, history: Vec<ChatMessage>) -> bool {
        if epoch <= self.snapshot_epoch {
            return false;
        }
        let known: HashSet<i64> = history.iter().map(|m| m.id).collect();
        let newer: Vec<(ChatEntry, u64)> = self
            .entries
            .drain(..)
            .zip(self.written.drain(..))
            .filter(|(entry, at)| *at > epoch && !known.contains(&entry.message.id))
            .collect();

        self.written = vec![epoch; history.len()];
        self.entries = history.into_iter().map(ChatEntry::confirmed).collect();
        for (entry, at) in newer {
            self.push(at, entry);
        }
        self.snapshot_epoch = epoch;
        true
    }

    fn clear(&mut self, epoch: u64) {
        self.entries.clear();
        self.written.clear();
        self.snapshot_epoch = self.snapshot_epoch.max(epoch);
    }
}

/// The unscoped stream and one stream per job id. They never share entries.
#[derive(Default)]
struct ChatState {
    global: Stream,
    scoped: HashMap<i64, Stream>,
}

impl ChatState {
    fn stream(&self, scope: Option<i64>) -> Option<&Stream> {
        match scope {
            None => Some(&self.global),
            Some(jd_id) => self.scoped.get(&jd_id),
        }
    }

    fn stream_mut(&mut self, scope: Option<i64>) -> &mut Stream {
        match scope {
            None => &mut self.global,
            Some(jd_id) => self.scoped.entry(jd_id).or_default(),
        }
    }
}

/// Assistant conversation with optimistic sends.
#[derive(Clone)]
pub struct ChatService {
    gateway: RemoteGateway,
    notifications: NotificationService,
    tracker: OperationTracker,
    // counts sends only
    typing: OperationTracker,
    state: Arc<RwLock<ChatState>>,
    error: ErrorSlot,
}

impl ChatService {
    pub fn new(gateway: RemoteGateway, notifications: NotificationService) -> Self {
        Self {
            gateway,
            notifications,
            tracker: OperationTracker::new(),
            typing: OperationTracker::new(),
            state: Arc::new(RwLock::new(ChatState::default())),
            error: ErrorSlot::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ChatState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ChatState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn messages(&self, scope: Option<i64>) -> Vec<ChatEntry> {
        self.read()
            .stream(scope)
            .map(|s| s.entries.clone())
            .unwrap_or_default()
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_busy()
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

    /// Replaces one stream with the server's history. Entries written after the request went out
    /// stay after it. History older than an applied history or clear is dropped.
    pub async fn fetch_history(&self, scope: Option<i64>) -> Result<()> {
        let op = self.tracker.begin();
        match self.gateway.chat_history(scope, op.token()).await {
            Ok(history) => {
                let mut state = self.write();
                let stream = state.stream_mut(scope);
                if stream.apply_history(op.epoch(), history) {
                    tracing::debug!(?scope, count = stream.entries.len(), "Chat history loaded");
                } else {
                    tracing::debug!(?scope, epoch = op.epoch(), "Discarding superseded chat history");
                }
                Ok(())
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to load history")),
        }
    }

    /// Appends the operator's message right away, then the assistant's reply. A failed reply
    /// becomes a synthetic assistant entry; the operator's message is never retracted.
    pub async fn send(&self, message: impl Into<String>, scope: Option<i64>) -> Result<ChatMessage> {
        let payload = SendMessagePayload::new(message, scope);
        validate(&payload).map_err(Error::Validation)?;
        let op = self.tracker.begin();
        let _typing = self.typing.begin();

        let local = ChatMessage::local(ChatRole::Hr, payload.message.clone(), scope);
        let local_id = local.id;
        {
            let mut state = self.write();
            let stream = state.stream_mut(scope);
            stream.push(op.epoch(), ChatEntry::local(local));
        }

        match self.gateway.send_chat(&payload, op.token()).await {
            Ok(reply) => {
                let mut state = self.write();
                let stream = state.stream_mut(scope);
                if let Some(entry) = stream
                    .entries
                    .iter_mut()
                    .find(|e| e.message.id == local_id && e.delivery == Delivery::Local)
                {
                    *entry = ChatEntry::confirmed(entry.message.clone());
                }
                stream.push(op.epoch(), ChatEntry::confirmed(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                if !matches!(e, Error::Cancelled) {
                    let mut state = self.write();
                    let stream = state.stream_mut(scope);
                    stream.push(op.epoch(), ChatEntry::failure_reply(scope));
                }
                Err(self.error.fail(&self.notifications, e, "Failed to send message"))
            }
        }
    }

    /// Clears the unscoped history on the server and locally. Job streams are kept.
    pub async fn clear(&self) -> Result<()> {
        let op = self.tracker.begin();
        match self.gateway.clear_chat_history(op.token()).await {
            Ok(()) => {
                let mut state = self.write();
                state.global.clear(op.epoch());
                drop(state);
                self.notifications.success("Chat history cleared");
                Ok(())
            }
            Err(e) => Err(self.error.fail(&self.notifications, e, "Failed to clear history")),
        }
    }
}
