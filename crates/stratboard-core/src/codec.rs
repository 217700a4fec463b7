//! Board encoding.
//!
//! Persistence stores boards as opaque strings produced by a [`BoardCodec`].
//! [`JsonBoardCodec`] is the reference implementation.

use crate::board::{BoardData, BOARD_VERSION};
use thiserror::Error;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to encode board: {0}")]
    Encode(String),
    #[error("Failed to decode board: {0}")]
    Decode(String),
    #[error("Unsupported board version {found}")]
    UnsupportedVersion { found: u32 },
}

/// Converts boards to and from their serialized form.
pub trait BoardCodec: Send + Sync {
    fn encode(&self, board: &BoardData) -> Result<String, CodecError>;

    fn decode(&self, data: &str) -> Result<BoardData, CodecError>;
}

/// Plain JSON, as written by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBoardCodec;

impl BoardCodec for JsonBoardCodec {
    fn encode(&self, board: &BoardData) -> Result<String, CodecError> {
        serde_json::to_string(board).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, data: &str) -> Result<BoardData, CodecError> {
        let board: BoardData =
            serde_json::from_str(data).map_err(|e| CodecError::Decode(e.to_string()))?;
        if board.version > BOARD_VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: board.version,
            });
        }
        Ok(board)
    }
}
