use thiserror::Error;

#[derive(Error, Debug)]
pub enum BriefError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
