use std::str::FromStr;

use thiserror::Error;

/// Error types for the consumer's collaborators.
///
/// Everything here is fatal to the consumption loop: receive and delete
/// failures propagate out of [`Consumer::run`](crate::consumer::Consumer::run)
/// instead of being retried.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// Error that occurs during AWS SQS client initialization.
    #[error("failed to initialize AWS SQS client: {0}")]
    InitializationError(String),

    /// A configuration value could not be interpreted.
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    /// The `ReceiveMessage` call failed.
    ///
    /// This covers an unreachable queue, bad credentials, a missing queue URL
    /// and malformed responses alike.
    #[error("failed to receive message: {0}")]
    ReceiveError(String),

    /// The `DeleteMessage` call failed.
    #[error("failed to delete message: {0}")]
    DeleteError(String),

    /// A handled message carried no receipt handle, so it cannot be deleted.
    #[error("message {message_id} has no receipt handle")]
    MissingReceiptHandle { message_id: String },

    /// The health server could not bind or stopped with an I/O error.
    #[error("health server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Failure reported by a [`MessageHandler`](crate::consumer::MessageHandler).
///
/// Handler failures are never fatal. The consumer logs them and leaves the
/// message in the queue for redelivery.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The message body could not be understood by the handler.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The message was understood but processing it failed.
    #[error("processing failed: {0}")]
    Processing(String),

    #[error("{0}")]
    Generic(#[from] GenericError),
}

/// Generic error type for handling unexpected errors.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GenericError(String);

impl GenericError {
    /// Creates a new `GenericError` with the provided message.
    pub fn new(message: impl Into<String>) -> Self {
        GenericError(message.into())
    }
}

impl FromStr for GenericError {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GenericError::new(s))
    }
}

impl From<String> for GenericError {
    fn from(s: String) -> Self {
        GenericError::new(s)
    }
}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        HandlerError::Generic(GenericError::new(s))
    }
}

impl From<&str> for HandlerError {
    fn from(s: &str) -> Self {
        HandlerError::Generic(GenericError::new(s))
    }
}
