//! Debounced auto-save.
//!
//! The editor reports each dirty revision with [`AutoSaveManager::note_change`].
//! Once no change has arrived for the debounce window, [`should_save`]
//! turns true and the host calls [`maybe_save`].
//!
//! [`should_save`]: AutoSaveManager::should_save
//! [`maybe_save`]: AutoSaveManager::maybe_save

use super::{Storage, StorageError, StorageResult, StoredBoard};
use crate::codec::{BoardCodec, JsonBoardCodec};
use crate::config::EditorConfig;
use crate::state::EditorState;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Quiet period after the last change before a save is due.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Key boards are saved under when no other key was chosen.
pub const DEFAULT_BOARD_KEY: &str = "board";

/// Key holding a copy of the most recently saved board.
pub const LAST_BOARD_KEY: &str = "__last_board__";

/// Saves the live board to a [`Storage`] backend after edits settle.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    codec: Box<dyn BoardCodec>,
    debounce: Duration,
    last_change: Option<Instant>,
    dirty: bool,
    board_key: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_codec(storage, Box::new(JsonBoardCodec))
    }

    pub fn with_codec(storage: Arc<S>, codec: Box<dyn BoardCodec>) -> Self {
        Self {
            storage,
            codec,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            last_change: None,
            dirty: false,
            board_key: None,
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record that the board changed. Restarts the debounce window.
    pub fn note_change(&mut self) {
        self.dirty = true;
        self.last_change = Some(Instant::now());
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_board_key(&mut self, key: Option<String>) {
        self.board_key = key;
    }

    pub fn board_key(&self) -> &str {
        self.board_key.as_deref().unwrap_or(DEFAULT_BOARD_KEY)
    }

    /// Whether there are unsaved changes and the debounce window has passed.
    pub fn should_save(&self) -> bool {
        self.dirty
            && self
                .last_change
                .is_none_or(|changed| changed.elapsed() >= self.debounce)
    }

    /// Save if a save is due. Returns whether one was performed.
    pub async fn maybe_save(&mut self, state: &EditorState) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(state).await?;
        Ok(true)
    }

    /// Save immediately under the current key, and as the last board.
    pub async fn save(&mut self, state: &EditorState) -> StorageResult<()> {
        let stored = StoredBoard::capture(state, self.codec.as_ref())?;
        let key = self.board_key().to_string();

        self.storage.save(&key, &stored).await?;
        self.storage.save(LAST_BOARD_KEY, &stored).await?;

        self.dirty = false;
        log::info!("Auto-saved board '{}' under '{}'", stored.name, key);
        Ok(())
    }

    /// Load a board and make its key current.
    pub async fn load(&mut self, key: &str, config: Arc<EditorConfig>) -> StorageResult<EditorState> {
        let stored = self.storage.load(key).await?;
        let state = stored.restore(self.codec.as_ref(), config)?;
        self.board_key = Some(key.to_string());
        self.dirty = false;
        Ok(state)
    }

    /// Load the most recently saved board, if there is a readable one.
    pub async fn load_last(&mut self, config: Arc<EditorConfig>) -> Option<EditorState> {
        let stored = match self.storage.load(LAST_BOARD_KEY).await {
            Ok(stored) => stored,
            Err(StorageError::NotFound(_)) => return None,
            Err(e) => {
                log::warn!("Failed to load last board: {}", e);
                return None;
            }
        };
        match stored.restore(self.codec.as_ref(), config) {
            Ok(state) => {
                self.dirty = false;
                Some(state)
            }
            Err(e) => {
                log::warn!("Discarding unreadable last board: {}", e);
                None
            }
        }
    }

    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        self.storage.delete(key).await
    }

    /// Saved board keys, without the last-board copy.
    pub async fn list_boards(&self) -> StorageResult<Vec<String>> {
        let mut keys = self.storage.list().await?;
        keys.retain(|key| key != LAST_BOARD_KEY);
        Ok(keys)
    }

    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.storage.exists(key).await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Auto-save into the platform data directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_autosave_manager() -> StorageResult<AutoSaveManager<super::FileStorage>> {
    let storage = super::FileStorage::default_location()?;
    Ok(AutoSaveManager::new(Arc::new(storage)))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::dispatch::dispatch;
    use crate::object::BoardObject;
    use crate::storage::{block_on, MemoryStorage};
    use kurbo::Point;

    fn edited_state() -> EditorState {
        let state = EditorState::default();
        let state = dispatch(&state, Action::AddObject(BoardObject::new(3, Point::new(5.0, 5.0))));
        dispatch(
            &state,
            Action::UpdateBoardMeta {
                name: Some("Trash pull".to_string()),
                background_id: None,
            },
        )
    }

    #[test]
    fn test_new_manager_is_clean() {
        let manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
        assert_eq!(manager.board_key(), DEFAULT_BOARD_KEY);
    }

    #[test]
    fn test_debounce_window() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        manager.set_debounce(Duration::from_secs(3600));
        manager.note_change();
        assert!(manager.is_dirty());
        assert!(!manager.should_save());

        manager.set_debounce(Duration::ZERO);
        assert!(manager.should_save());
    }

    #[test]
    fn test_maybe_save_waits_for_debounce() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        manager.set_debounce(Duration::from_secs(3600));
        manager.note_change();
        assert!(!block_on(manager.maybe_save(&edited_state())).unwrap());
        assert!(!block_on(manager.exists(DEFAULT_BOARD_KEY)).unwrap());

        manager.set_debounce(Duration::ZERO);
        assert!(block_on(manager.maybe_save(&edited_state())).unwrap());
        assert!(!manager.is_dirty());
        assert!(block_on(manager.exists(DEFAULT_BOARD_KEY)).unwrap());
    }

    #[test]
    fn test_save_and_load_last() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(Arc::clone(&storage));
        manager.set_board_key(Some("trash".to_string()));
        manager.note_change();

        let state = edited_state();
        block_on(manager.save(&state)).unwrap();
        assert!(!manager.is_dirty());

        let mut manager2 = AutoSaveManager::new(storage);
        let config = Arc::new(EditorConfig::default());
        let loaded = block_on(manager2.load_last(Arc::clone(&config))).unwrap();
        assert_eq!(*loaded.board, *state.board);
        assert!(!loaded.is_dirty);

        let loaded = block_on(manager2.load("trash", config)).unwrap();
        assert_eq!(loaded.board.name, "Trash pull");
        assert_eq!(manager2.board_key(), "trash");
    }

    #[test]
    fn test_load_last_without_save() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(block_on(manager.load_last(Arc::new(EditorConfig::default()))).is_none());
    }

    #[test]
    fn test_load_last_skips_unreadable_board() {
        let storage = Arc::new(MemoryStorage::new());
        let broken = StoredBoard {
            name: String::new(),
            serialized_board: "garbage".to_string(),
            groups: Vec::new(),
            grid_settings: Default::default(),
        };
        block_on(storage.save(LAST_BOARD_KEY, &broken)).unwrap();
        let mut manager = AutoSaveManager::new(storage);
        assert!(block_on(manager.load_last(Arc::new(EditorConfig::default()))).is_none());
    }

    #[test]
    fn test_list_excludes_last_board() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        block_on(manager.save(&edited_state())).unwrap();
        let keys = block_on(manager.list_boards()).unwrap();
        assert_eq!(keys, vec![DEFAULT_BOARD_KEY.to_string()]);
    }
}
