//! Editing session state.

use crate::board::BoardData;
use crate::circular::CircularMode;
use crate::clipboard::ClipboardSnapshot;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::group::{self, GroupId, ObjectGroup};
use crate::history::History;
use crate::object::{BoardObject, ObjectId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default grid spacing in board units.
pub const DEFAULT_GRID_SIZE: u32 = 16;

/// Snap grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    /// Snap moved objects to the grid.
    pub enabled: bool,
    pub size: u32,
    /// Draw the grid.
    pub visible: bool,
}

impl GridSettings {
    /// Snap a point to the nearest grid intersection when snapping is enabled.
    pub fn snap(&self, point: Point) -> Point {
        if !self.enabled || self.size == 0 {
            return point;
        }
        let size = f64::from(self.size);
        Point::new((point.x / size).round() * size, (point.y / size).round() * size)
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_GRID_SIZE,
            visible: true,
        }
    }
}

/// The complete state of one editing session.
///
/// Each revision is an immutable value: actions produce a new `EditorState`
/// and share every unchanged part with the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    /// The document being edited.
    pub board: Arc<BoardData>,
    /// Selected objects, in the order they were selected.
    pub selected_ids: Vec<ObjectId>,
    pub groups: Arc<Vec<ObjectGroup>>,
    pub history: History,
    /// Whether the document changed since it was created or loaded.
    pub is_dirty: bool,
    pub clipboard: Option<ClipboardSnapshot>,
    pub circular_mode: Option<CircularMode>,
    /// Group that selection is currently restricted to.
    pub focused_group_id: Option<GroupId>,
    pub grid_settings: GridSettings,
    /// Text object currently being edited.
    pub editing_text_id: Option<ObjectId>,
    pub last_error: Option<EditorError>,
    pub config: Arc<EditorConfig>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Arc::new(EditorConfig::default()))
    }
}

impl EditorState {
    /// Create a session with an empty board.
    pub fn new(config: Arc<EditorConfig>) -> Self {
        let board = BoardData::new(config.board_width, config.board_height);
        Self::with_document(board, Vec::new(), config)
    }

    /// Create a session for an existing document.
    ///
    /// Group members that are not on the board are dropped, an object listed
    /// in several groups keeps only its first, and groups left with fewer than
    /// two members are dissolved.
    pub fn with_document(board: BoardData, groups: Vec<ObjectGroup>, config: Arc<EditorConfig>) -> Self {
        let mut groups = groups;
        group::normalize(&mut groups, |id| board.contains(id));

        let board = Arc::new(board);
        let groups = Arc::new(groups);
        let history = History::new(Arc::clone(&board), Arc::clone(&groups), config.max_history);

        Self {
            board,
            selected_ids: Vec::new(),
            groups,
            history,
            is_dirty: false,
            clipboard: None,
            circular_mode: None,
            focused_group_id: None,
            grid_settings: GridSettings::default(),
            editing_text_id: None,
            last_error: None,
            config,
        }
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Selected objects in selection order.
    pub fn selected_objects(&self) -> impl Iterator<Item = &BoardObject> {
        self.selected_ids.iter().filter_map(|&id| self.board.get(id))
    }

    pub fn group(&self, id: GroupId) -> Option<&ObjectGroup> {
        group::find(&self.groups, id)
    }

    /// The group an object belongs to, if any.
    pub fn group_of(&self, id: ObjectId) -> Option<&ObjectGroup> {
        group::group_of(&self.groups, id)
    }

    pub fn focused_group(&self) -> Option<&ObjectGroup> {
        self.focused_group_id.and_then(|id| self.group(id))
    }

    /// Whether `id` may be selected under the current focus.
    pub fn is_selectable(&self, id: ObjectId) -> bool {
        self.board.contains(id) && self.focused_group().is_none_or(|g| g.contains(id))
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        for id in &self.selected_ids {
            assert!(self.board.contains(*id), "selected id {id} not on board");
        }
        let mut owned = std::collections::HashSet::new();
        for group in self.groups.iter() {
            assert!(group.is_valid(), "group {} has {} members", group.id, group.len());
            for id in &group.object_ids {
                assert!(self.board.contains(*id), "group member {id} not on board");
                assert!(owned.insert(*id), "object {id} is in more than one group");
            }
        }
        if let Some(mode) = &self.circular_mode {
            for id in &mode.participating_ids {
                assert!(self.board.contains(*id), "circle participant {id} not on board");
            }
        }
        if let Some(id) = self.editing_text_id {
            assert!(self.board.contains(id));
        }
        if let Some(id) = self.focused_group_id {
            assert!(self.group(id).is_some());
        }
        assert!(self.history.index() < self.history.len());
        assert!(self.history.len() <= self.config.max_history.max(1));
    }
}
