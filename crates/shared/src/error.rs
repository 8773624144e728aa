use serde::{Deserialize, Serialize};

/// Error body returned by the collection server on non-success responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Human-readable message, falling back to the bare status code when the
    /// server did not supply one.
    pub fn message_or_status(&self, status: u16) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => format!("HTTP {status}"),
        }
    }
}
