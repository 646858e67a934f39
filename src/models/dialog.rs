use crate::models::candidate::Candidate;
use crate::models::job::JobDescription;
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogKind {
    AddCandidate,
    DeleteCandidate,
    #[serde(rename = "viewCV")]
    ViewCv,
    AddJob,
    DeleteJob,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DialogPayload {
    Candidate(Box<Candidate>),
    Job(Box<JobDescription>),
    Other(JsonValue),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        kind: DialogKind,
        payload: Option<DialogPayload>,
    },
}

impl DialogState {
    pub fn is_closed(&self) -> bool {
        matches!(self, DialogState::Closed)
    }

    pub fn kind(&self) -> Option<DialogKind> {
        match self {
            DialogState::Open { kind, .. } => Some(*kind),
            DialogState::Closed => None,
        }
    }

    pub fn payload(&self) -> Option<&DialogPayload> {
        match self {
            DialogState::Open { payload, .. } => payload.as_ref(),
            DialogState::Closed => None,
        }
    }
}
