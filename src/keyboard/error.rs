use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceKind {
    NotFound,
    PermissionDenied,
    Io,
}

impl From<io::ErrorKind> for PersistenceKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => PersistenceKind::NotFound,
            io::ErrorKind::PermissionDenied => PersistenceKind::PermissionDenied,
            _ => PersistenceKind::Io,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardError {
    UnknownKey(String),
    EmptyHistory,
    Persistence {
        path: PathBuf,
        kind: PersistenceKind,
        message: String,
    },
    Decode(String),
}

impl KeyboardError {
    pub fn persistence(path: &Path, err: &io::Error) -> Self {
        KeyboardError::Persistence {
            path: path.to_path_buf(),
            kind: err.kind().into(),
            message: err.to_string(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        KeyboardError::Decode(msg.into())
    }
}

impl fmt::Display for KeyboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyboardError::UnknownKey(key) => {
                write!(f, "Unknown key: {}", key)
            }
            KeyboardError::EmptyHistory => {
                write!(f, "History empty")
            }
            KeyboardError::Persistence { path, kind, message } => {
                let what = match kind {
                    PersistenceKind::NotFound => "file not found",
                    PersistenceKind::PermissionDenied => "permission denied",
                    PersistenceKind::Io => "I/O error",
                };
                write!(f, "{} for {}: {}", what, path.display(), message)
            }
            KeyboardError::Decode(msg) => {
                write!(f, "Failed to decode state: {}", msg)
            }
        }
    }
}

impl std::error::Error for KeyboardError {}
