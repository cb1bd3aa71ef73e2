use std::path::PathBuf;

/// Errors raised when a move cannot be applied to a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Errors raised when reading a board from its text form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("expected 6 rows, found {0}")]
    RowCount(usize),

    #[error("row {row} has {width} cells (expected 7)")]
    RowWidth { row: usize, width: usize },

    #[error("unknown cell '{ch}' at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, ch: char },

    #[error("piece at row {row}, column {col} has an empty cell beneath it")]
    FloatingPiece { row: usize, col: usize },
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("unknown algorithm '{0}' (expected NO_PRUNING, ALPHA_BETA or EXPECTIMINIMAX)")]
    UnknownAlgorithm(String),

    #[error("unknown scoring mode '{0}' (expected LITE or FULL)")]
    UnknownScoringMode(String),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors returned by the move selector before any search work starts.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("no playable column: the board is full")]
    NoLegalMoves,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that stop a match between two agents.
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("{agent} had no move on a board with playable columns")]
    NoAction { agent: String },

    #[error("illegal move: {0}")]
    Move(#[from] MoveError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
