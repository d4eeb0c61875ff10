/// Convenience result type used across cogcanvas.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Top-level error taxonomy for the parameter channel.
///
/// None of these reach the viewer: session entry points degrade to defaults and only log them.
#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    /// Invalid caller-provided or host-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The host context could not be reached (detached link or closed channel).
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    /// A correlated request got no matching response in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A correlated request was abandoned by its caller.
    #[error("request cancelled: {0}")]
    Cancelled(String),

    /// A named params resource does not exist in the current mode.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The host answered with a message that does not fit the protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanvasError {
    /// Build a [`CanvasError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanvasError::TransportUnavailable`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportUnavailable(msg.into())
    }

    /// Build a [`CanvasError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`CanvasError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Build a [`CanvasError::ResourceNotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::ResourceNotFound(msg.into())
    }

    /// Build a [`CanvasError::Protocol`] value.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`CanvasError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for the error kinds that mean "the host did not answer".
    pub fn is_unanswered(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Cancelled(_))
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
