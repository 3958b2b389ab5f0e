use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The air-quality request did not complete successfully.
    #[error("Network error: {0}")]
    Network(String),

    /// No coordinates could be obtained in time.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Reject a numeric input that is negative or not a finite number.
    pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{field} must be a finite number, got {value}"
            )));
        }
        if value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "{field} must not be negative, got {value}"
            )));
        }
        Ok(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
