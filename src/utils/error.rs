use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Corrupt read: {message}")]
    CorruptRead { message: String },

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<WireError>,
    },

    #[error("Config file error: {0}")]
    ConfigFileError(#[from] toml::de::Error),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl WireError {
    pub fn corrupt(message: impl Into<String>) -> Self {
        WireError::CorruptRead {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
