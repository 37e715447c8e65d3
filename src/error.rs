use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
