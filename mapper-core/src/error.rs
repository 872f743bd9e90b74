//! Error types for mapping operations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What a failed lookup was searching by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Uuid,
    Name,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Uuid => write!(f, "UUID"),
            LookupKind::Name => write!(f, "Name"),
        }
    }
}

/// Errors that can occur while loading, querying or persisting mappings
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: LookupKind, key: String },

    #[error("Mappings file {path:?} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist mappings to {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

impl MapperError {
    pub(crate) fn uuid_not_found(key: &str) -> Self {
        MapperError::NotFound {
            kind: LookupKind::Uuid,
            key: key.to_string(),
        }
    }

    pub(crate) fn name_not_found(key: &str) -> Self {
        MapperError::NotFound {
            kind: LookupKind::Name,
            key: key.to_string(),
        }
    }

    /// Returns the lookup kind if this is a not-found error
    pub fn not_found_kind(&self) -> Option<LookupKind> {
        match self {
            MapperError::NotFound { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
