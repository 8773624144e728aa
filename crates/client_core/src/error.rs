use thiserror::Error;

/// Failure of a single call to the collection API.
///
/// `Clone` so the controller can keep the latest one as view state and hand
/// copies to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {message}")]
    Transport { message: String },
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid response from server: {message}")]
    Decode { message: String },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16(), format!("HTTP {}", status.as_u16()))
        } else {
            Self::transport(err.to_string())
        }
    }
}

