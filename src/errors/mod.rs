use anyhow::Context as _;
use thiserror::Error;

/// Precondition violations raised by the capture engine.
///
/// Tolerated invalid actions (a catch without a passer, an unknown player id)
/// never produce one of these; they are ignored instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("a line needs exactly {expected} players, got {actual}")]
    LineSize { expected: usize, actual: usize },

    #[error("player {0} was selected more than once")]
    DuplicatePlayer(String),

    #[error("player {0} is not on the roster")]
    UnknownPlayer(String),

    #[error("{operation} is not available while {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: String,
    },

    #[error("invalid point: {0}")]
    InvalidPoint(String),

    #[error("match {match_id} score {recorded:?} does not match archived points {counted:?}")]
    InconsistentScore {
        match_id: String,
        recorded: (u32, u32),
        counted: (u32, u32),
    },
}

/// Add context to storage errors
pub fn storage_context(operation: &str, key: &str) -> String {
    format!("Failed to {} record: {}", operation, key)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Wrap result with parse context
pub fn with_parse_context<T, E>(result: Result<T, E>, data_type: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(parse_context(data_type))
}
