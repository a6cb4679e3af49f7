use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Invalid view config: {0}")]
    InvalidViewConfig(String),

    #[error("Tried to register two view configs with the same name `{0}`")]
    DuplicateViewConfig(String),

    #[error("View config not found for name `{0}`")]
    UnknownViewConfig(String),

    #[error("View config for `{expected}` reports native class name `{found}`")]
    ViewConfigMismatch { expected: String, found: String },

    #[error("log_level must be one of: debug, info, warn, error, nope (got `{0}`)")]
    InvalidLogLevel(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
