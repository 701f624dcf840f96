// src/submit/sender.rs
use super::record::SubmissionRecord;

/// Errors that can occur when submitting an observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    Timeout,
    Http { status: u16 },
    Network(String),
    Serialize(String),
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Timeout => write!(f, "request timed out"),
            SendError::Http { status } => write!(f, "HTTP {} from station endpoint", status),
            SendError::Network(msg) => write!(f, "network error: {}", msg),
            SendError::Serialize(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SendError {}

/// Trait for delivering a submission record (abstracts HTTP client).
///
/// `Ok` means the endpoint acknowledged the record with a success status;
/// anything else is a failure and the caller keeps its state.
#[async_trait::async_trait]
pub trait ObservationSender: Send + Sync {
    async fn submit(&self, record: &SubmissionRecord) -> Result<u16, SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_error_messages() {
        assert_eq!(SendError::Timeout.to_string(), "request timed out");
        assert_eq!(
            SendError::Http { status: 401 }.to_string(),
            "HTTP 401 from station endpoint"
        );
        assert_eq!(
            SendError::Network("conn reset".into()).to_string(),
            "network error: conn reset"
        );
    }
}
