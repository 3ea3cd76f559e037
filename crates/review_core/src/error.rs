use thiserror::Error;

/// The three failure classes a reviewer can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Transport,
    Rejected,
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("network failure: {0}")]
    Transport(String),
    #[error("store rejected request with status {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },
    #[error("malformed store response: {0}")]
    MalformedResponse(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a dedup pass is already running")]
    RunInFlight,
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl ReviewError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ReviewError::Transport(_) | ReviewError::MalformedResponse(_) => ErrorClass::Transport,
            ReviewError::Rejected { .. } => ErrorClass::Rejected,
            ReviewError::InvalidInput(_) | ReviewError::RunInFlight => ErrorClass::InvalidInput,
        }
    }

    /// True when the failure was decided locally and nothing reached the store.
    pub fn is_local(&self) -> bool {
        self.class() == ErrorClass::InvalidInput
    }
}

impl From<reqwest::Error> for ReviewError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ReviewError::Rejected {
                status: status.as_u16(),
                detail: None,
            }
        } else if err.is_decode() {
            ReviewError::MalformedResponse(err.to_string())
        } else {
            ReviewError::Transport(err.to_string())
        }
    }
}
