use crate::models::dialog::{DialogKind, DialogPayload, DialogState};
use std::sync::{Arc, RwLock};

/// At most one dialog is open at a time; opening another replaces it.
#[derive(Clone, Default)]
pub struct DialogService {
    state: Arc<RwLock<DialogState>>,
}

impl DialogService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, kind: DialogKind, payload: Option<DialogPayload>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = state.kind() {
            tracing::debug!(?previous, next = ?kind, "Replacing open dialog");
        }
        *state = DialogState::Open { kind, payload };
    }

    pub fn close(&self) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = DialogState::Closed;
    }

    pub fn state(&self) -> DialogState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn active_kind(&self) -> Option<DialogKind> {
        self.state.read().unwrap_or_else(|e| e.into_inner()).kind()
    }

    pub fn payload(&self) -> Option<DialogPayload> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .payload()
            .cloned()
    }

    pub fn is_open(&self, kind: DialogKind) -> bool {
        self.active_kind() == Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::fixtures::candidate;

    #[test]
    fn opening_replaces_and_close_clears() {
        let dialogs = DialogService::new();
        dialogs.open(DialogKind::AddJob, None);
        dialogs.open(
            DialogKind::DeleteCandidate,
            Some(DialogPayload::Candidate(Box::new(candidate(3, "Ann", "tech", "QA")))),
        );

        assert!(dialogs.is_open(DialogKind::DeleteCandidate));
        assert!(!dialogs.is_open(DialogKind::AddJob));
        match dialogs.payload() {
            Some(DialogPayload::Candidate(c)) => assert_eq!(c.id, 3),
            other => panic!("unexpected payload {:?}", other),
        }

        dialogs.close();
        assert_eq!(dialogs.state(), DialogState::Closed);
        assert!(dialogs.payload().is_none());
    }

    #[test]
    fn close_when_closed_is_noop() {
        let dialogs = DialogService::new();
        dialogs.close();
        assert!(dialogs.state().is_closed());
        assert_eq!(dialogs.active_kind(), None);
    }
}
