//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult, StoredBoard};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Keeps saved boards in memory, for tests and sessions that should not touch disk.
///
/// Boards are held in their encoded JSON form, so what comes back from
/// [`Storage::load`] went through the same encoding a file backend uses.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved boards, the last-board copy included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Every write replaces a whole entry, so a panicking writer cannot leave
    // a half-updated board behind and a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.boards.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.boards.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, board: &StoredBoard) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let encoded = board.encode_for(&key);
        Box::pin(async move {
            let encoded = encoded?;
            self.write().insert(key, encoded);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<StoredBoard>> {
        let key = key.to_string();
        Box::pin(async move {
            let boards = self.read();
            let json = boards.get(&key).ok_or_else(|| StorageError::NotFound(key.clone()))?;
            StoredBoard::decode_from(&key, json)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            self.write().remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move { Ok(self.read().keys().cloned().collect()) })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.read().contains_key(&key)) })
    }
}
