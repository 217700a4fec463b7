//! Structured, localization-ready editor errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Error key: the board already holds the maximum number of objects.
pub const MAX_TOTAL_OBJECTS: &str = "error.maxTotalObjects";
/// Error key: the board already holds the maximum number of objects of one type.
pub const MAX_OBJECTS_OF_TYPE: &str = "error.maxObjectsOfType";

/// Value substituted into a localized error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorParam {
    Number(f64),
    Text(String),
}

impl From<usize> for ErrorParam {
    fn from(value: usize) -> Self {
        ErrorParam::Number(value as f64)
    }
}

impl From<u32> for ErrorParam {
    fn from(value: u32) -> Self {
        ErrorParam::Number(f64::from(value))
    }
}

impl From<&str> for ErrorParam {
    fn from(value: &str) -> Self {
        ErrorParam::Text(value.to_string())
    }
}

impl From<String> for ErrorParam {
    fn from(value: String) -> Self {
        ErrorParam::Text(value)
    }
}

/// An error surfaced to the user as data on the editor state.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{key}")]
pub struct EditorError {
    pub key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ErrorParam>,
}

impl EditorError {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: BTreeMap::new(),
        }
    }

    /// Attach a message parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ErrorParam>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&ErrorParam> {
        self.params.get(name)
    }
}
