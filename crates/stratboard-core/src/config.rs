//! Editor configuration.

use crate::limits::ObjectLimits;
use serde::{Deserialize, Serialize};

/// Default board width in board units.
pub const DEFAULT_BOARD_WIDTH: u32 = 512;
/// Default board height in board units.
pub const DEFAULT_BOARD_HEIGHT: u32 = 384;
/// Maximum number of history entries to keep.
pub const MAX_HISTORY: usize = 50;
/// Offset applied to duplicated and pasted objects.
pub const PASTE_OFFSET: f64 = 10.0;
/// Smallest radius circular placement mode accepts.
pub const MIN_CIRCLE_RADIUS: f64 = 10.0;
/// Smallest radius produced by the circular alignment.
pub const MIN_ALIGNED_CIRCLE_RADIUS: f64 = 50.0;

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub max_history: usize,
    pub limits: ObjectLimits,
    pub paste_offset: f64,
    pub min_circle_radius: f64,
    pub min_aligned_circle_radius: f64,
    pub board_width: u32,
    pub board_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY,
            limits: ObjectLimits::default(),
            paste_offset: PASTE_OFFSET,
            min_circle_radius: MIN_CIRCLE_RADIUS,
            min_aligned_circle_radius: MIN_ALIGNED_CIRCLE_RADIUS,
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
