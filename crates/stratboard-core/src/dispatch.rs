//! Action dispatch.
//!
//! [`dispatch`] is a pure function from a state revision and an action to the
//! next revision. The previous revision is never modified: every document
//! part lives behind an `Arc` and is copied on first write.

use crate::action::{Action, LayerDirection};
use crate::align::{self, AlignMode};
use crate::board::BoardData;
use crate::circular::CircularMode;
use crate::clipboard::ClipboardSnapshot;
use crate::error::EditorError;
use crate::group::{self, GroupId, ObjectGroup};
use crate::history::HistoryEntry;
use crate::object::{BoardObject, ObjectId, ObjectPatch};
use crate::state::EditorState;
use kurbo::{Point, Vec2};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Produce the state that results from applying `action` to `state`.
pub fn dispatch(state: &EditorState, action: Action) -> EditorState {
    let mut next = state.clone();
    next.apply(action);
    next
}

impl EditorState {
    fn apply(&mut self, action: Action) {
        match action {
            Action::Select { id, additive } => self.select(id, additive),
            Action::SelectMany(ids) => self.select_many(&ids),
            Action::SelectAll => {
                self.selected_ids = self
                    .board
                    .ids()
                    .filter(|&id| self.is_selectable(id))
                    .collect();
            }
            Action::SelectGroup(id) => self.select_group(id),
            Action::Deselect => self.selected_ids.clear(),
            Action::SetFocusedGroup(id) => self.set_focused_group(id),

            Action::AddObject(object) => self.add_object(object),
            Action::UpdateObject { id, patch } => self.update_objects(&[id], &patch),
            Action::UpdateBatch { ids, patch } => self.update_objects(&ids, &patch),
            Action::Move { ids, delta } => self.move_objects(&ids, delta),
            Action::Delete(ids) => self.delete(&ids),
            Action::Duplicate(ids) => self.duplicate(&ids),
            Action::Copy(ids) => self.copy(&ids),
            Action::Paste => {
                if let Some(clipboard) = &self.clipboard {
                    let objects = clipboard.objects.iter().map(|obj| (**obj).clone()).collect();
                    self.paste(objects);
                }
            }
            Action::PasteObjects(objects) => self.paste(objects),
            Action::Align { ids, mode } => self.align(&ids, mode),
            Action::ReorderLayer { id, direction } => self.reorder_layer(id, direction),
            Action::UpdateBoardMeta { name, background_id } => {
                self.update_board_meta(name, background_id)
            }

            Action::Group { ids, name } => self.group_objects(&ids, name),
            Action::Ungroup(id) => self.ungroup(id),
            Action::RenameGroup { id, name } => self.rename_group(id, &name),
            Action::ToggleGroupCollapsed(id) => {
                if self.group(id).is_some() {
                    group::toggle_collapsed(self.groups_mut(), id);
                    self.is_dirty = true;
                }
            }
            Action::RemoveFromGroup { group_id, object_id } => {
                self.remove_from_group(group_id, object_id)
            }
            Action::ReorderGroup { id, direction } => self.reorder_group(id, direction),

            Action::Commit(description) => {
                self.commit(&description);
            }
            Action::Undo => {
                if let Some(entry) = self.history.undo() {
                    log::debug!("Undo to '{}'", entry.description);
                    self.restore(entry);
                }
            }
            Action::Redo => {
                if let Some(entry) = self.history.redo() {
                    log::debug!("Redo to '{}'", entry.description);
                    self.restore(entry);
                }
            }
            Action::JumpToHistory(index) => {
                if let Some(entry) = self.history.jump_to(index) {
                    log::debug!("Jump to history entry {} '{}'", index, entry.description);
                    self.restore(entry);
                }
            }
            Action::ClearHistory => {
                self.history.clear(
                    Arc::clone(&self.board),
                    Arc::clone(&self.groups),
                    CLEARED_HISTORY,
                );
            }

            Action::LoadBoard { board, groups } => {
                log::info!("Loading board '{}' ({} objects)", board.name, board.len());
                self.replace_document(board, groups);
            }
            Action::ResetBoard => {
                log::info!("Resetting board");
                let board = BoardData::new(self.config.board_width, self.config.board_height);
                self.replace_document(board, Vec::new());
            }

            Action::SetGrid(grid) => self.grid_settings = grid,
            Action::EnterCircularMode { center, radius, ids } => {
                self.circular_mode =
                    CircularMode::enter(&self.board, center, radius, &ids, self.config.min_circle_radius);
            }
            Action::UpdateCircularCenter(center) => {
                self.with_circular_mode(|mode, board, _| mode.update_center(board, center));
            }
            Action::UpdateCircularRadius(radius) => {
                self.with_circular_mode(|mode, board, min_radius| mode.update_radius(board, radius, min_radius));
            }
            Action::MoveOnCircle { id, angle } => {
                if self.circular_mode.as_ref().is_some_and(|m| m.contains(id)) {
                    self.with_circular_mode(|mode, board, _| mode.move_object(board, id, angle));
                }
            }
            Action::ExitCircularMode => self.circular_mode = None,
            Action::StartTextEdit(id) => {
                if self.is_selectable(id) && self.board.get(id).is_some_and(|obj| obj.text.is_some()) {
                    self.editing_text_id = Some(id);
                    self.selected_ids = vec![id];
                }
            }
            Action::EndTextEdit => {
                if self.editing_text_id.take().is_some() {
                    self.commit(EDIT_TEXT);
                }
            }
            Action::SetError(error) => self.last_error = Some(error),
            Action::ClearError => self.last_error = None,
        }
    }

    fn board_mut(&mut self) -> &mut BoardData {
        Arc::make_mut(&mut self.board)
    }

    fn groups_mut(&mut self) -> &mut Vec<ObjectGroup> {
        Arc::make_mut(&mut self.groups)
    }

    fn commit(&mut self, description: &str) -> bool {
        self.history.commit(&self.board, &self.groups, description)
    }

    /// Snapshot a structural edit. The document only turns dirty if the snapshot is new.
    fn finish_edit(&mut self, description: &str) {
        if self.commit(description) {
            self.is_dirty = true;
        }
    }

    /// Run a circular-mode operation against the board. The closure returns whether it changed anything.
    fn with_circular_mode(&mut self, f: impl FnOnce(&mut CircularMode, &mut BoardData, f64) -> bool) {
        let Some(mut mode) = self.circular_mode.take() else {
            return;
        };
        let min_radius = self.config.min_circle_radius;
        if f(&mut mode, Arc::make_mut(&mut self.board), min_radius) {
            self.is_dirty = true;
        }
        self.circular_mode = Some(mode);
    }

    /// Drop every reference to objects and groups that no longer exist.
    fn prune_references(&mut self) {
        let board = Arc::clone(&self.board);

        self.selected_ids.retain(|&id| board.contains(id));

        let stale_groups = self
            .groups
            .iter()
            .any(|g| g.object_ids.iter().any(|&id| !board.contains(id)));
        if stale_groups {
            let dissolved = group::prune(self.groups_mut(), |id| board.contains(id));
            if !dissolved.is_empty() {
                log::debug!("Dissolved {} groups", dissolved.len());
            }
        }

        if self.focused_group_id.is_some_and(|id| self.group(id).is_none()) {
            self.focused_group_id = None;
        }
        let circle_alive = self
            .circular_mode
            .as_mut()
            .is_none_or(|mode| mode.retain_existing(&board));
        if !circle_alive {
            self.circular_mode = None;
        }
        if self.editing_text_id.is_some_and(|id| !board.contains(id)) {
            self.editing_text_id = None;
        }
    }

    /// Restore a history entry as the live document.
    fn restore(&mut self, entry: Arc<HistoryEntry>) {
        self.board = Arc::clone(&entry.board);
        self.groups = Arc::clone(&entry.groups);
        self.selected_ids.clear();
        self.is_dirty = true;
        self.prune_references();

        let min_radius = self.config.min_circle_radius;
        self.circular_mode = self
            .circular_mode
            .as_ref()
            .and_then(|mode| mode.recompute(&self.board, min_radius));
    }

    fn replace_document(&mut self, board: BoardData, groups: Vec<ObjectGroup>) {
        let mut fresh = EditorState::with_document(board, groups, Arc::clone(&self.config));
        fresh.grid_settings = self.grid_settings;
        fresh.clipboard = self.clipboard.take();
        *self = fresh;
    }

    fn select(&mut self, id: ObjectId, additive: bool) {
        if !self.is_selectable(id) {
            return;
        }
        if !additive {
            self.selected_ids = vec![id];
        } else if let Some(pos) = self.selected_ids.iter().position(|&s| s == id) {
            self.selected_ids.remove(pos);
        } else {
            self.selected_ids.push(id);
        }
    }

    fn select_many(&mut self, ids: &[ObjectId]) {
        self.selected_ids = self
            .board
            .existing_ids(ids)
            .into_iter()
            .filter(|&id| self.is_selectable(id))
            .collect();
    }

    fn select_group(&mut self, id: GroupId) {
        let Some(target) = self.group(id) else {
            return;
        };
        let members: Vec<ObjectId> = self
            .board
            .ids()
            .filter(|&obj| target.contains(obj))
            .collect();
        self.selected_ids = members
            .into_iter()
            .filter(|&obj| self.is_selectable(obj))
            .collect();
    }

    fn set_focused_group(&mut self, id: Option<GroupId>) {
        let Some(id) = id else {
            self.focused_group_id = None;
            return;
        };
        let Some(target) = self.group(id) else {
            return;
        };
        if target.collapsed {
            group::expand(self.groups_mut(), id);
            self.is_dirty = true;
        }
        self.focused_group_id = Some(id);
        let selected = std::mem::take(&mut self.selected_ids);
        self.selected_ids = selected
            .into_iter()
            .filter(|&obj| self.is_selectable(obj))
            .collect();
    }

    /// Reject an add with a structured error, leaving the document untouched.
    fn reject(&mut self, error: EditorError) {
        log::warn!("Add rejected: {}", error);
        self.last_error = Some(error);
    }

    /// Put new objects on top, select exactly them and commit.
    fn insert_new(&mut self, objects: Vec<BoardObject>, description: &str) {
        if self.focused_group_id.take().is_some() {
            log::debug!("Leaving group focus for new objects");
        }
        self.selected_ids = objects.iter().map(|obj| obj.id).collect();
        self.board_mut().insert_front(objects);
        self.last_error = None;
        self.finish_edit(description);
    }

    fn add_object(&mut self, object: BoardObject) {
        if let Err(error) = self.config.limits.check_add(&self.board, object.object_id) {
            self.reject(error);
            return;
        }
        let object = BoardObject {
            id: Uuid::new_v4(),
            ..object
        };
        self.insert_new(vec![object], ADD_OBJECT);
    }

    fn update_objects(&mut self, ids: &[ObjectId], patch: &ObjectPatch) {
        let targets: Vec<ObjectId> = ids
            .iter()
            .copied()
            .filter(|&id| self.board.get(id).is_some_and(|obj| patch.changes(obj)))
            .collect();
        if targets.is_empty() {
            return;
        }
        let board = self.board_mut();
        let mut moved = Vec::new();
        for id in targets {
            if let Some(obj) = board.get_mut(id) {
                let before = obj.position;
                patch.apply(obj);
                if obj.position != before {
                    moved.push(id);
                }
            }
        }
        self.sync_circle_angles(&moved);
        self.is_dirty = true;
    }

    fn move_objects(&mut self, ids: &[ObjectId], delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        let targets: Vec<ObjectId> = self
            .board
            .existing_ids(ids)
            .into_iter()
            .filter(|&id| self.board.get(id).is_some_and(|obj| !obj.is_locked()))
            .collect();
        if targets.is_empty() {
            return;
        }

        let board = Arc::make_mut(&mut self.board);
        for &id in &targets {
            if let Some(obj) = board.get_mut(id) {
                obj.position += delta;
            }
        }

        self.sync_circle_angles(&targets);
        self.is_dirty = true;
    }

    /// Participants moved off the circle keep the angle of their new position.
    fn sync_circle_angles(&mut self, moved: &[ObjectId]) {
        let Some(mode) = &mut self.circular_mode else {
            return;
        };
        for &id in moved {
            if let Some(obj) = self.board.get(id).filter(|_| mode.contains(id)) {
                let angle = align::angle_around(mode.center, obj.position);
                mode.object_angles.insert(id, angle);
            }
        }
    }

    fn delete(&mut self, ids: &[ObjectId]) {
        let doomed: HashSet<ObjectId> = self.board.existing_ids(ids).into_iter().collect();
        if doomed.is_empty() {
            return;
        }
        let removed = self.board_mut().remove(&doomed);
        log::debug!("Deleted {} objects", removed);
        self.prune_references();
        self.finish_edit(DELETE_OBJECTS);
    }

    /// Objects named by `ids`, in board order.
    fn objects_in_board_order(&self, ids: &[ObjectId]) -> Vec<Arc<BoardObject>> {
        let wanted: HashSet<ObjectId> = ids.iter().copied().collect();
        self.board
            .objects
            .iter()
            .filter(|obj| wanted.contains(&obj.id))
            .cloned()
            .collect()
    }

    fn offset_copies(&self, sources: &[BoardObject]) -> (Vec<BoardObject>, HashMap<ObjectId, ObjectId>) {
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let mut id_map = HashMap::new();
        let copies = sources
            .iter()
            .map(|obj| {
                let mut copy = obj.duplicate();
                copy.position += offset;
                id_map.insert(obj.id, copy.id);
                copy
            })
            .collect();
        (copies, id_map)
    }

    fn duplicate(&mut self, ids: &[ObjectId]) {
        let sources: Vec<BoardObject> = self
            .objects_in_board_order(ids)
            .iter()
            .map(|obj| (**obj).clone())
            .collect();
        if sources.is_empty() {
            return;
        }
        if let Err(error) = self
            .config
            .limits
            .check_add_many(&self.board, sources.iter().map(|obj| obj.object_id))
        {
            self.reject(error);
            return;
        }

        let (copies, id_map) = self.offset_copies(&sources);

        // Groups copied whole come along as new groups.
        let copied_groups: Vec<ObjectGroup> = self
            .groups
            .iter()
            .filter(|g| g.object_ids.iter().all(|id| id_map.contains_key(id)))
            .map(|g| ObjectGroup {
                id: Uuid::new_v4(),
                name: g.name.clone(),
                collapsed: g.collapsed,
                object_ids: g.object_ids.iter().map(|id| id_map[id]).collect(),
            })
            .collect();
        if !copied_groups.is_empty() {
            self.groups_mut().extend(copied_groups);
        }

        self.insert_new(copies, DUPLICATE_OBJECTS);
    }

    fn copy(&mut self, ids: &[ObjectId]) {
        let objects = self.objects_in_board_order(ids);
        if objects.is_empty() {
            return;
        }
        log::debug!("Copied {} objects", objects.len());
        self.clipboard = Some(ClipboardSnapshot { objects });
    }

    fn paste(&mut self, objects: Vec<BoardObject>) {
        if objects.is_empty() {
            return;
        }
        if let Err(error) = self
            .config
            .limits
            .check_add_many(&self.board, objects.iter().map(|obj| obj.object_id))
        {
            self.reject(error);
            return;
        }
        let (copies, _) = self.offset_copies(&objects);
        self.insert_new(copies, PASTE_OBJECTS);
    }

    fn align(&mut self, ids: &[ObjectId], mode: AlignMode) {
        let ids = self.board.existing_ids(ids);
        let points: Vec<(ObjectId, Point)> = ids
            .iter()
            .filter_map(|&id| self.board.get(id).map(|obj| (id, obj.position)))
            .collect();
        let Some(alignment) = align::align(&points, mode, self.config.min_aligned_circle_radius) else {
            return;
        };

        let board = self.board_mut();
        for (id, position) in alignment.positions {
            if let Some(obj) = board.get_mut(id) {
                obj.position = position;
            }
        }

        if let Some((center, radius)) = alignment.circle {
            self.circular_mode =
                CircularMode::enter(&self.board, center, radius, &ids, self.config.min_circle_radius);
        }
        self.finish_edit(mode.description());
    }

    fn reorder_layer(&mut self, id: ObjectId, direction: LayerDirection) {
        if !self.board.contains(id) {
            return;
        }
        let mut board = (*self.board).clone();
        let changed = match direction {
            LayerDirection::ToFront => board.bring_to_front(id),
            LayerDirection::ToBack => board.send_to_back(id),
            LayerDirection::Forward => board.bring_forward(id),
            LayerDirection::Backward => board.send_backward(id),
        };
        if changed {
            self.board = Arc::new(board);
            self.finish_edit(REORDER_LAYER);
        }
    }

    fn reorder_group(&mut self, id: GroupId, direction: LayerDirection) {
        let Some(target) = self.group(id) else {
            return;
        };
        let members: HashSet<ObjectId> = target.object_ids.iter().copied().collect();

        let mut board = (*self.board).clone();
        let (block, first) = board.take_block(&members);
        let target = match direction {
            LayerDirection::ToFront => 0,
            LayerDirection::ToBack => board.len(),
            LayerDirection::Forward => first.saturating_sub(1),
            LayerDirection::Backward => first + 1,
        };
        board.put_block(target, block);

        if board != *self.board {
            self.board = Arc::new(board);
            self.finish_edit(REORDER_GROUP);
        }
    }

    fn update_board_meta(&mut self, name: Option<String>, background_id: Option<u32>) {
        let name_changed = name.as_ref().is_some_and(|n| *n != self.board.name);
        let background_changed = background_id.is_some_and(|b| b != self.board.background_id);
        if !name_changed && !background_changed {
            return;
        }
        let board = self.board_mut();
        if let Some(name) = name {
            board.name = name;
        }
        if let Some(background_id) = background_id {
            board.background_id = background_id;
        }
        self.finish_edit(UPDATE_BOARD);
    }

    fn group_objects(&mut self, ids: &[ObjectId], name: Option<String>) {
        let ids = self.board.existing_ids(ids);
        if ids.len() < group::MIN_GROUP_SIZE {
            return;
        }
        if group::create(self.groups_mut(), &ids, name).is_some() {
            self.prune_references();
            self.finish_edit(GROUP_OBJECTS);
        }
    }

    fn ungroup(&mut self, id: GroupId) {
        if self.group(id).is_none() {
            return;
        }
        group::ungroup(self.groups_mut(), id);
        if self.focused_group_id == Some(id) {
            self.focused_group_id = None;
        }
        self.finish_edit(UNGROUP);
    }

    fn rename_group(&mut self, id: GroupId, name: &str) {
        let trimmed = name.trim();
        let Some(target) = self.group(id) else {
            return;
        };
        if target.name.as_deref().unwrap_or("") == trimmed {
            return;
        }
        group::rename(self.groups_mut(), id, trimmed);
        self.finish_edit(RENAME_GROUP);
    }

    fn remove_from_group(&mut self, group_id: GroupId, object_id: ObjectId) {
        if !self.group(group_id).is_some_and(|g| g.contains(object_id)) {
            return;
        }
        group::remove_member(self.groups_mut(), group_id, object_id);
        if self.focused_group_id == Some(group_id) && self.group(group_id).is_none() {
            self.focused_group_id = None;
        }
        self.finish_edit(REMOVE_FROM_GROUP);
    }
}

const CLEARED_HISTORY: &str = "History cleared";
const EDIT_TEXT: &str = "Edit text";
const ADD_OBJECT: &str = "Add object";
const DELETE_OBJECTS: &str = "Delete objects";
const DUPLICATE_OBJECTS: &str = "Duplicate objects";
const PASTE_OBJECTS: &str = "Paste objects";
const REORDER_LAYER: &str = "Reorder layer";
const REORDER_GROUP: &str = "Reorder group";
const UPDATE_BOARD: &str = "Update board";
const GROUP_OBJECTS: &str = "Group objects";
const UNGROUP: &str = "Ungroup";
const RENAME_GROUP: &str = "Rename group";
const REMOVE_FROM_GROUP: &str = "Remove from group";
