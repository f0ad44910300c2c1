use thiserror::Error;

/// Errors surfaced by the engine to its caller.
///
/// Cache failures are deliberately absent: the gateway downgrades every
/// one of them to a miss or a logged no-op write. An empty or
/// unparseable time window is not an error either; each aggregator has
/// its own fallback rule for that.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Missing or invalid credentials; the message is shown verbatim.
    #[error("Authentication error: {0}")]
    Auth(String),
    /// The current-semester lookup failed; fatal for this request.
    #[error("Semester lookup failed: {0}")]
    SemesterLookup(String),
    /// An upstream data port failed; presented with a generic
    /// retry-later message, no automatic retry.
    #[error("Data fetch failed: {0}")]
    DataFetch(String),
}

impl EngineError {
    /// Human-readable fallback the chat layer can present when the
    /// underlying data could not be fetched.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Auth(message) => message.clone(),
            EngineError::SemesterLookup(_) | EngineError::DataFetch(_) => {
                "Xin lỗi, không thể lấy thông tin từ hệ thống. Vui lòng thử lại sau.".to_string()
            }
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_message_is_verbatim() {
        let error = EngineError::Auth("Sai mật khẩu".to_string());
        assert_eq!(error.user_message(), "Sai mật khẩu");
    }

    #[test]
    fn test_data_fetch_message_is_generic() {
        let error = EngineError::DataFetch("connection reset".to_string());
        assert!(!error.user_message().contains("connection reset"));
    }
}
