//! The persisted form of a board.
//!
//! Groups are stored by object index rather than id, so a saved board does not
//! depend on the ids of the session that wrote it.

use super::{StorageError, StorageResult};
use crate::codec::{BoardCodec, CodecError};
use crate::config::EditorConfig;
use crate::group::ObjectGroup;
use crate::object::ObjectId;
use crate::state::{EditorState, GridSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A group as stored: indices into the board's object list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    pub object_indices: Vec<usize>,
}

/// A saved board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBoard {
    pub name: String,
    /// The board as produced by a [`BoardCodec`].
    pub serialized_board: String,
    #[serde(default)]
    pub groups: Vec<StoredGroup>,
    #[serde(default)]
    pub grid_settings: GridSettings,
}

impl StoredBoard {
    /// Capture the document and grid of a session.
    pub fn capture(state: &EditorState, codec: &dyn BoardCodec) -> Result<Self, CodecError> {
        let groups = state
            .groups
            .iter()
            .map(|group| StoredGroup {
                name: group.name.clone(),
                collapsed: group.collapsed,
                object_indices: group
                    .object_ids
                    .iter()
                    .filter_map(|&id| state.board.index_of(id))
                    .collect(),
            })
            .collect();

        Ok(Self {
            name: state.board.name.clone(),
            serialized_board: codec.encode(&state.board)?,
            groups,
            grid_settings: state.grid_settings,
        })
    }

    /// Rebuild a fresh session from this board.
    ///
    /// Indices outside the board are ignored. Group membership is then
    /// repaired by [`EditorState::with_document`]: an object claimed by an
    /// earlier group is not added to a later one, and groups left with fewer
    /// than two members are dropped. The session starts with one history entry and is
    /// not dirty.
    pub fn restore(
        &self,
        codec: &dyn BoardCodec,
        config: Arc<EditorConfig>,
    ) -> Result<EditorState, CodecError> {
        let board = codec.decode(&self.serialized_board)?;

        let groups: Vec<ObjectGroup> = self
            .groups
            .iter()
            .map(|stored| {
                let members: BTreeSet<ObjectId> = stored
                    .object_indices
                    .iter()
                    .filter_map(|&index| board.objects.get(index).map(|obj| obj.id))
                    .collect();
                let mut group = ObjectGroup::new(members, stored.name.clone());
                group.collapsed = stored.collapsed;
                group
            })
            .collect();

        let mut state = EditorState::with_document(board, groups, config);
        state.grid_settings = self.grid_settings;
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The text a backend persists for this board.
    pub(crate) fn encode_for(&self, key: &str) -> StorageResult<String> {
        self.to_json()
            .map_err(|e| StorageError::Serialization(format!("Failed to encode board '{}': {}", key, e)))
    }

    /// Parse text a backend persisted under `key`.
    pub(crate) fn decode_from(key: &str, json: &str) -> StorageResult<Self> {
        Self::from_json(json)
            .map_err(|e| StorageError::Serialization(format!("Board '{}' is unreadable: {}", key, e)))
    }
}
