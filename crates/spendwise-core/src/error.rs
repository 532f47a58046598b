use spendwise_domain::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid input `{input}`: {reason}")]
    InvalidInput { input: String, reason: String },
    #[error("Budget not configured for user {0}")]
    NotConfigured(UserId),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Notifier error: {0}")]
    Notifier(String),
}

impl CoreError {
    pub fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// A user's summed expenses left the representable range.
    pub fn total_overflow(user: UserId) -> Self {
        CoreError::Storage(format!("expense total for user {user} overflows"))
    }

    /// The rejected text, for callers that echo it back to the user.
    pub fn rejected_input(&self) -> Option<&str> {
        match self {
            CoreError::InvalidInput { input, .. } => Some(input),
            _ => None,
        }
    }
}
