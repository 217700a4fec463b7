//! Copied objects, in session and on the system clipboard.

use crate::object::BoardObject;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Envelope tag identifying clipboard payloads written by this editor.
pub const CLIPBOARD_TYPE: &str = "stratboard-objects";

/// Objects held by the in-session clipboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClipboardSnapshot {
    pub objects: Vec<Arc<BoardObject>>,
}

impl ClipboardSnapshot {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

/// Clipboard errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Invalid clipboard JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected clipboard content type: {0}")]
    WrongType(String),
}

/// Tagged JSON payload exchanged with the system clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub objects: Vec<BoardObject>,
}

impl ClipboardEnvelope {
    pub fn new(objects: Vec<BoardObject>) -> Self {
        Self {
            kind: CLIPBOARD_TYPE.to_string(),
            objects,
        }
    }

    /// Wrap the in-session clipboard for the system clipboard.
    pub fn from_snapshot(snapshot: &ClipboardSnapshot) -> Self {
        Self::new(snapshot.objects.iter().map(|obj| (**obj).clone()).collect())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse clipboard text, rejecting payloads from other applications.
    pub fn from_json(json: &str) -> Result<Self, ClipboardError> {
        let envelope: Self = serde_json::from_str(json)?;
        if envelope.kind != CLIPBOARD_TYPE {
            return Err(ClipboardError::WrongType(envelope.kind));
        }
        Ok(envelope)
    }
}
