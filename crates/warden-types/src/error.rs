use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardenError {
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Backend did not become ready after {attempts} attempts")]
    NotReady { attempts: u32 },

    #[error("Recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WardenError {
    /// Fatal errors end the supervision session and are surfaced to the user.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WardenError::Launch(_) | WardenError::NotReady { .. } | WardenError::RecoveryFailed(_)
        )
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(e: serde_json::Error) -> Self {
        WardenError::Serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for WardenError {
    fn from(e: toml::ser::Error) -> Self {
        WardenError::Serialization(e.to_string())
    }
}

pub type WardenResult<T> = Result<T, WardenError>;
