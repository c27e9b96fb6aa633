use thiserror::Error;

pub type Result<T> = std::result::Result<T, TopUpError>;

#[derive(Error, Debug)]
pub enum TopUpError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("Invalid flow event: {0}")]
    InvalidEvent(String),
}
