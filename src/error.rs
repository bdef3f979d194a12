use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data directory available; pass --data-dir or --ephemeral")]
    NoDataDir,

    #[error("storage path is not a file: {0}")]
    StoragePath(PathBuf),

    #[error("invalid memory board {rows}x{cols}: needs an even, non-zero number of cards")]
    InvalidBoard { rows: u16, cols: u16 },

    #[error("random source unavailable: {0}")]
    Random(String),

    #[error("chat relay is not open")]
    RelayClosed,
}

impl From<getrandom::Error> for DeskError {
    fn from(err: getrandom::Error) -> Self {
        DeskError::Random(err.to_string())
    }
}

pub type Result<T, E = DeskError> = std::result::Result<T, E>;
