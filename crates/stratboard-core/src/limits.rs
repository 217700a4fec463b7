//! Object count limits.

use crate::board::BoardData;
use crate::error::{EditorError, MAX_OBJECTS_OF_TYPE, MAX_TOTAL_OBJECTS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default cap on the number of objects on one board.
pub const DEFAULT_MAX_TOTAL_OBJECTS: usize = 50;

/// Global and per-type object caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectLimits {
    pub max_total: usize,
    /// Caps keyed by object type number. Types not listed are only bound by `max_total`.
    pub per_type: BTreeMap<u32, usize>,
}

impl Default for ObjectLimits {
    fn default() -> Self {
        Self {
            max_total: DEFAULT_MAX_TOTAL_OBJECTS,
            per_type: BTreeMap::new(),
        }
    }
}

impl ObjectLimits {
    /// Set the cap for one object type.
    pub fn with_type_limit(mut self, object_id: u32, max: usize) -> Self {
        self.per_type.insert(object_id, max);
        self
    }

    /// Check whether one more object of `object_id` fits on `board`.
    pub fn check_add(&self, board: &BoardData, object_id: u32) -> Result<(), EditorError> {
        self.check_add_many(board, [object_id])
    }

    /// Check whether all of `object_ids` fit on `board` at once.
    ///
    /// Counts are taken against the board as it would be after the add.
    pub fn check_add_many(
        &self,
        board: &BoardData,
        object_ids: impl IntoIterator<Item = u32>,
    ) -> Result<(), EditorError> {
        let mut incoming: BTreeMap<u32, usize> = BTreeMap::new();
        for object_id in object_ids {
            *incoming.entry(object_id).or_default() += 1;
        }
        let added: usize = incoming.values().sum();

        if board.len() + added > self.max_total {
            return Err(EditorError::new(MAX_TOTAL_OBJECTS).with_param("max", self.max_total));
        }

        for (&object_id, &count) in &incoming {
            if let Some(&max) = self.per_type.get(&object_id) {
                if board.count_of_type(object_id) + count > max {
                    return Err(EditorError::new(MAX_OBJECTS_OF_TYPE)
                        .with_param("max", max)
                        .with_param("objectId", object_id));
                }
            }
        }

        Ok(())
    }
}
