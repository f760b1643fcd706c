use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Telemetry error: {0}")]
    TelemetryError(anyhow::Error),
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(anyhow::Error::new(err))
    }
}

impl CoreError {
    /// Build a configuration error from a plain message.
    pub fn config(msg: impl Into<String>) -> Self {
        CoreError::ConfigError(anyhow::anyhow!(msg.into()))
    }
}
