use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Board, BoardError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
}

/// Read a file, reporting a missing file as [`StorageError::NotFound`].
pub(crate) fn read_file(path: &Path) -> Result<String, StorageError> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

/// Parse a board from TOML and check its identity invariants.
///
/// ```toml
/// [[columns]]
/// id = "todo"
/// title = "To do"
///
/// [[columns.cards]]
/// id = "card:1"
/// description = "Write docs"
/// ```
pub fn parse_board(toml_str: &str) -> Result<Board, StorageError> {
    let board: Board = toml::from_str(toml_str)?;
    board.validate()?;
    Ok(board)
}

/// Load the initial board from a TOML file. The board is never written back.
pub fn load_board(path: &Path) -> Result<Board, StorageError> {
    let content = read_file(path)?;
    parse_board(&content)
}

/// Serialize a board to TOML in the same shape [`load_board`] reads.
pub fn board_to_toml(board: &Board) -> Result<String, StorageError> {
    Ok(toml::to_string_pretty(board)?)
}
