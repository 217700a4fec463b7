//! StratBoard Core Library
//!
//! Document model and editing engine for the StratBoard diagram editor:
//! boards of typed objects, groups, snapshot undo/redo, alignment, circular
//! placement and persistence. Rendering and input live elsewhere; this crate
//! only turns [`Action`]s into new [`EditorState`] revisions.

pub mod action;
pub mod align;
pub mod board;
pub mod circular;
pub mod clipboard;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod group;
pub mod history;
pub mod limits;
pub mod object;
pub mod state;
pub mod storage;
pub mod store;

pub use action::{Action, LayerDirection};
pub use align::AlignMode;
pub use board::BoardData;
pub use circular::CircularMode;
pub use clipboard::{ClipboardEnvelope, ClipboardSnapshot};
pub use codec::{BoardCodec, CodecError, JsonBoardCodec};
pub use config::EditorConfig;
pub use dispatch::dispatch;
pub use error::EditorError;
pub use group::{GroupId, ObjectGroup};
pub use history::{History, HistoryEntry};
pub use limits::ObjectLimits;
pub use object::{BoardColor, BoardObject, ObjectFlags, ObjectId, ObjectPatch};
pub use state::{EditorState, GridSettings};
pub use store::{Store, SubscriptionId};
