//! Editing actions.

use crate::align::AlignMode;
use crate::board::BoardData;
use crate::error::EditorError;
use crate::group::{GroupId, ObjectGroup};
use crate::object::{BoardObject, ObjectId, ObjectPatch};
use crate::state::GridSettings;
use kurbo::{Point, Vec2};

/// Direction for layer reordering. Index 0 of the board is the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerDirection {
    ToFront,
    ToBack,
    Forward,
    Backward,
}

/// Everything that can change an [`EditorState`](crate::EditorState).
///
/// Structural edits commit a history entry themselves. Continuous edits
/// (`UpdateObject`, `UpdateBatch`, `Move`, circle drags, grid changes) do not;
/// follow them with [`Action::Commit`] once the gesture ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Selection
    /// Select one object. Additive selection toggles membership instead of replacing.
    Select { id: ObjectId, additive: bool },
    /// Replace the selection (marquee).
    SelectMany(Vec<ObjectId>),
    SelectAll,
    /// Select every member of a group.
    SelectGroup(GroupId),
    Deselect,
    /// Restrict selection to one group, or lift the restriction.
    SetFocusedGroup(Option<GroupId>),

    // Object edits
    /// Add an object. It receives a fresh id.
    AddObject(BoardObject),
    UpdateObject { id: ObjectId, patch: ObjectPatch },
    /// Apply one patch to many objects at once.
    UpdateBatch { ids: Vec<ObjectId>, patch: ObjectPatch },
    /// Translate objects by a delta. Locked objects stay put.
    Move { ids: Vec<ObjectId>, delta: Vec2 },
    Delete(Vec<ObjectId>),
    Duplicate(Vec<ObjectId>),
    Copy(Vec<ObjectId>),
    /// Paste the in-session clipboard.
    Paste,
    /// Paste objects read from the system clipboard.
    PasteObjects(Vec<BoardObject>),
    Align { ids: Vec<ObjectId>, mode: AlignMode },
    ReorderLayer { id: ObjectId, direction: LayerDirection },
    UpdateBoardMeta { name: Option<String>, background_id: Option<u32> },

    // Groups
    Group { ids: Vec<ObjectId>, name: Option<String> },
    Ungroup(GroupId),
    RenameGroup { id: GroupId, name: String },
    ToggleGroupCollapsed(GroupId),
    RemoveFromGroup { group_id: GroupId, object_id: ObjectId },
    /// Move all members of a group through the layers as one block.
    ReorderGroup { id: GroupId, direction: LayerDirection },

    // History
    Commit(String),
    Undo,
    Redo,
    JumpToHistory(usize),
    ClearHistory,

    // Document lifecycle
    LoadBoard { board: BoardData, groups: Vec<ObjectGroup> },
    ResetBoard,

    // Session
    SetGrid(GridSettings),
    EnterCircularMode { center: Point, radius: f64, ids: Vec<ObjectId> },
    UpdateCircularCenter(Point),
    UpdateCircularRadius(f64),
    /// Slide one participant to a new angle (radians) on the circle.
    MoveOnCircle { id: ObjectId, angle: f64 },
    ExitCircularMode,
    StartTextEdit(ObjectId),
    EndTextEdit,
    SetError(EditorError),
    ClearError,
}
