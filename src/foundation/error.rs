/// Convenience result type used across reelsmith.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration or input (missing directories, empty image pool, bad identifiers).
    #[error("configuration error: {0}")]
    Config(String),

    /// Probing, decoding or transcoding a media file failed.
    #[error("media error: {0}")]
    Media(String),

    /// The speech synthesis backend failed or is unavailable.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Encoding or writing the final video failed.
    #[error("render error: {0}")]
    Render(String),

    /// Releasing handles or deleting scratch files failed.
    #[error("cleanup error: {0}")]
    Cleanup(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// How the pipeline treats a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Abort before producing any output.
    Configuration,
    /// Log a warning and continue with a reduced feature set.
    Degraded,
    /// Abort; no valid output is guaranteed.
    Fatal,
}

impl ReelError {
    /// Build a [`ReelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ReelError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`ReelError::Synthesis`] value.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Cleanup`] value.
    pub fn cleanup(msg: impl Into<String>) -> Self {
        Self::Cleanup(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Classify this error for the propagation policy.
    ///
    /// Media, synthesis and cleanup failures are recoverable at the stage that owns them;
    /// render and wrapped IO failures are not.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) | Self::Serde(_) => ErrorClass::Configuration,
            Self::Media(_) | Self::Synthesis(_) | Self::Cleanup(_) => ErrorClass::Degraded,
            Self::Render(_) | Self::Other(_) => ErrorClass::Fatal,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
