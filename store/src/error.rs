use std::fmt;

/// Represents errors that can occur in the local store.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialization(String),
    InvalidDraft(String),
    DuplicateEmail(String),
    InvalidCredentials,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::InvalidDraft(msg) => write!(f, "Invalid booking: {}", msg),
            StoreError::DuplicateEmail(email) => {
                write!(f, "Email already in use: {}", email)
            }
            StoreError::InvalidCredentials => write!(f, "Invalid email or password"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
