//! Unified application error type.
//! All modules (db, core, auth, cli) return AppError so that every failure
//! can be classified into the same small taxonomy before reaching the user.

use std::io;
use thiserror::Error;

/// Coarse classification used by handlers to decide how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input, caller-correctable.
    Validation,
    /// Entity not in the state required by the transition.
    StateConflict,
    /// Missing session or role. Terminal for the request.
    Authorization,
    /// Unknown id lookup. Terminal for the request.
    NotFound,
    /// Persistence, filesystem or configuration failure.
    Internal,
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Validation
    // ---------------------------
    #[error("Timestamp is missing")]
    EmptyInput,

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Timestamp {0} lies too far in the future")]
    TooFarInFuture(String),

    #[error("{0}")]
    EditWindowExpired(String),

    #[error("Unknown contract type: {0}")]
    UnknownContractType(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // State conflicts
    // ---------------------------
    #[error("Key item {0} is not available")]
    ItemNotAvailable(String),

    #[error("Assignment {0} is not active")]
    AssignmentNotActive(i64),

    #[error("Key item {0} is not marked as lost")]
    ItemNotLost(String),

    #[error("{entity} {id} already exists")]
    AlreadyExists { entity: &'static str, id: String },

    // ---------------------------
    // Authorization
    // ---------------------------
    #[error("No active session")]
    Unauthenticated,

    #[error("Missing required role '{0}'")]
    Forbidden(String),

    // ---------------------------
    // Lookups
    // ---------------------------
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    // ---------------------------
    // Config / export
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::EmptyInput
            | AppError::MalformedTimestamp(_)
            | AppError::TooFarInFuture(_)
            | AppError::EditWindowExpired(_)
            | AppError::UnknownContractType(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidInput(_) => ErrorKind::Validation,

            AppError::ItemNotAvailable(_)
            | AppError::AssignmentNotActive(_)
            | AppError::ItemNotLost(_)
            | AppError::AlreadyExists { .. } => ErrorKind::StateConflict,

            AppError::Unauthenticated | AppError::Forbidden(_) => ErrorKind::Authorization,

            AppError::NotFound { .. } => ErrorKind::NotFound,

            AppError::Io(_)
            | AppError::Db(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Export(_) => ErrorKind::Internal,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
