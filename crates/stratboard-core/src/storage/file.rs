//! File-based storage for native platforms.
//!
//! Each board is one JSON file. Keys are escaped into file names reversibly,
//! so [`Storage::list`] hands back exactly the keys boards were saved under.

use super::{BoxFuture, Storage, StorageError, StorageResult, StoredBoard};
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// Stores each board as a JSON file in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Use `base_path` for board files, creating it if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path)
            .map_err(|e| StorageError::Io(format!("Failed to create storage directory: {}", e)))?;
        Ok(Self { base_path })
    }

    /// Storage under the platform data directory, e.g. `~/.local/share/stratboard/boards/`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("stratboard").join("boards"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn board_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::Other("Board key is empty".to_string()));
        }
        Ok(self.base_path.join(format!("{}.{}", escape_key(key), EXTENSION)))
    }
}

/// Escape a board key into a portable file stem. ASCII letters, digits, `-`
/// and `_` pass through; every other byte becomes `%XX`.
fn escape_key(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(char::from(byte));
        } else {
            let _ = write!(stem, "%{:02X}", byte);
        }
    }
    stem
}

/// Inverse of [`escape_key`]. `None` for stems this backend did not write.
fn unescape_key(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut rest = stem;
    while let Some(c) = rest.chars().next() {
        if c == '%' {
            let hex = rest.get(1..3).filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &rest[3..];
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            bytes.push(c as u8);
            rest = &rest[1..];
        } else {
            return None;
        }
    }
    String::from_utf8(bytes).ok().filter(|key| !key.is_empty())
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io(format!("Failed to {} {}: {}", action, path.display(), e))
}

impl Storage for FileStorage {
    fn save(&self, key: &str, board: &StoredBoard) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(key);
        let json = board.encode_for(key);
        Box::pin(async move {
            let path = path?;
            let json = json?;
            // Write beside the target and swap it in, so an interrupted save
            // leaves the previous board intact.
            let staging = path.with_extension(format!("{}.tmp", EXTENSION));
            fs::write(&staging, json).map_err(|e| io_error("write", &staging, e))?;
            fs::rename(&staging, &path).map_err(|e| io_error("replace", &path, e))?;
            log::info!("Saved board to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<StoredBoard>> {
        let path = self.board_path(key);
        let key = key.to_string();
        Box::pin(async move {
            let path = path?;
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound(key)),
                Err(e) => return Err(io_error("read", &path, e)),
            };
            StoredBoard::decode_from(&key, &json)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(key);
        Box::pin(async move {
            let path = path?;
            match fs::remove_file(&path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(io_error("delete", &path, e)),
                _ => Ok(()),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = match fs::read_dir(&self.base_path) {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(io_error("read", &self.base_path, e)),
            };

            let mut keys: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).and_then(unescape_key))
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.board_path(key);
        Box::pin(async move { Ok(path?.is_file()) })
    }
}
