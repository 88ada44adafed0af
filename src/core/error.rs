//! Error taxonomy for engine operations and persistence.
//!
//! ## ErrorCode
//!
//! The fixed, ordinal result codes every command returns. Codes up to and
//! including [`ErrorCode::QuitRequested`] are continuable: the caller keeps
//! its session. Everything after it aborts the session.
//!
//! ## EngineError
//!
//! Rich error raised by engine operations. Every variant maps onto exactly
//! one [`ErrorCode`] via [`EngineError::code`]. Engine operations detect
//! these before mutating anything, so receiving one means no state changed.
//!
//! ## PersistError
//!
//! Load/save failures. Kept apart from the command taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordinal result code returned by every command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ErrorCode {
    None = 0,
    UnableToParse,
    PowerNotFound,
    CardNotFound,
    DuplicateTechnology,
    InsufficientFunds,
    GroupNotFound,
    SaveRequested,
    QuitRequested,
    AbortRequested,
    CardDeletionFailed,
    GameCreationFailed,
}

impl ErrorCode {
    /// Raw ordinal.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// True if the session may continue after this code.
    #[must_use]
    pub fn is_continuable(self) -> bool {
        self <= ErrorCode::QuitRequested
    }

    /// True if the session must abort without saving.
    #[must_use]
    pub fn is_abortable(self) -> bool {
        !self.is_continuable()
    }

    /// True for the success code.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, ErrorCode::None)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self, self.raw())
    }
}

/// Failure of an engine operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unable to parse: {0}")]
    UnableToParse(String),

    #[error("power not found: {0}")]
    PowerNotFound(String),

    #[error("card not found: {0}")]
    CardNotFound(String),

    #[error("insufficient copies of {card}: wanted {wanted}, held {held}")]
    InsufficientCopies {
        card: String,
        wanted: u32,
        held: u32,
    },

    #[error("technology not found: {0}")]
    TechnologyNotFound(String),

    #[error("technology already owned: {0}")]
    DuplicateTechnology(String),

    #[error("insufficient funds: cost {cost}, offered {offered}")]
    InsufficientFunds { cost: i64, offered: i64 },

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("card already exists: {0}")]
    DuplicateCard(String),

    #[error("card deletion failed: {0}")]
    CardDeletionFailed(String),

    #[error("game creation failed: {0}")]
    GameCreationFailed(String),
}

impl EngineError {
    /// Map onto the command taxonomy.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::UnableToParse(_) | EngineError::DuplicateCard(_) => {
                ErrorCode::UnableToParse
            }
            EngineError::PowerNotFound(_) => ErrorCode::PowerNotFound,
            EngineError::CardNotFound(_)
            | EngineError::InsufficientCopies { .. }
            | EngineError::TechnologyNotFound(_) => ErrorCode::CardNotFound,
            EngineError::DuplicateTechnology(_) => ErrorCode::DuplicateTechnology,
            EngineError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            EngineError::GroupNotFound(_) => ErrorCode::GroupNotFound,
            EngineError::CardDeletionFailed(_) => ErrorCode::CardDeletionFailed,
            EngineError::GameCreationFailed(_) => ErrorCode::GameCreationFailed,
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failure to load or save a game document.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported {entity} version {found} (newest known is {supported})")]
    UnsupportedVersion {
        entity: &'static str,
        found: u32,
        supported: u32,
    },

    #[error("corrupted data: {0}")]
    Corrupt(String),
}
