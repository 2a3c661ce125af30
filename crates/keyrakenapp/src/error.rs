use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyrakenError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous selection: {count} items match {filter}, use --multiple or narrow the filter")]
    AmbiguousSelection { count: usize, filter: String },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Nothing to update: supply --new_attributes and/or --new_secret")]
    NoOpUpdate,

    #[error("Keyring collection '{0}' is locked. Attempt unlock with --unlock.")]
    CollectionLocked(String),

    #[error("Unlock of collection '{0}' was cancelled, collection is still locked")]
    UnlockCancelled(String),

    #[error("No secret provided")]
    NoSecretProvided,

    #[error("Backend error: {0}")]
    Backend(String),
}

impl KeyrakenError {
    /// Process exit code for this error. 2 is reserved for clap usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            KeyrakenError::NotFound(_) => 1,
            KeyrakenError::CollectionLocked(_) => 3,
            KeyrakenError::AmbiguousSelection { .. } => 4,
            KeyrakenError::InvalidFilter(_) => 5,
            KeyrakenError::InvalidInput(_) => 6,
            KeyrakenError::NoOpUpdate => 7,
            KeyrakenError::UnlockCancelled(_) => 8,
            KeyrakenError::NoSecretProvided => 9,
            KeyrakenError::Backend(_) => 10,
        }
    }
}

impl From<serde_json::Error> for KeyrakenError {
    fn from(err: serde_json::Error) -> Self {
        KeyrakenError::InvalidInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KeyrakenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        let errors = [
            KeyrakenError::NotFound("x".into()),
            KeyrakenError::AmbiguousSelection {
                count: 2,
                filter: "{}".into(),
            },
            KeyrakenError::InvalidFilter("x".into()),
            KeyrakenError::InvalidInput("x".into()),
            KeyrakenError::NoOpUpdate,
            KeyrakenError::CollectionLocked("login".into()),
            KeyrakenError::UnlockCancelled("login".into()),
            KeyrakenError::NoSecretProvided,
            KeyrakenError::Backend("x".into()),
        ];
        let codes: HashSet<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
        assert!(!codes.contains(&2));
    }

    #[test]
    fn locked_message_names_collection() {
        let err = KeyrakenError::CollectionLocked("work".into());
        assert!(err.to_string().contains("'work'"));
        assert!(err.to_string().contains("--unlock"));
    }
}
