use thiserror::Error;

/// Failures raised by a [`SocialRepository`](super::repository::SocialRepository).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// Failures of a single remote call made through a gateway.
///
/// Aborting a superseded call is not represented here: an aborted task never
/// produces a result at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Authentication required")]
    Unauthorized,
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether the same call could succeed if the user tried again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Unauthorized | Self::Decode(_) => false,
        }
    }
}

/// Local, synchronous refusals. None of these reach the network.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("Please log in to continue")]
    AuthRequired,
    #[error("Comment cannot be empty")]
    EmptyContent,
    #[error("Please wait for the previous comment to be submitted")]
    SubmissionInProgress,
    #[error("Please wait before submitting the same comment again")]
    DuplicateContent,
    #[error("Please wait for the previous action to complete")]
    DeletionInProgress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        let server = GatewayError::Status {
            status: 503,
            message: "down".into(),
        };
        let client = GatewayError::Status {
            status: 400,
            message: "bad".into(),
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(GatewayError::Timeout.is_retryable());
        assert!(!GatewayError::Unauthorized.is_retryable());
    }

    #[test]
    fn rejection_messages_are_user_facing() {
        assert_eq!(Rejection::EmptyContent.to_string(), "Comment cannot be empty");
        assert_eq!(
            Rejection::DuplicateContent.to_string(),
            "Please wait before submitting the same comment again"
        );
    }
}
