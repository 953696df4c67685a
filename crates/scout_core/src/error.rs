use thiserror::Error;

/// Classified outcome of a request that did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Superseded or explicitly cancelled. Never shown to the user.
    #[error("cancelled")]
    Cancelled,
    /// The call's watchdog expired.
    #[error("timeout")]
    Timeout,
    /// Connection-level failure, or a response body that could not be read.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("http status {status}")]
    Remote { status: u16, detail: Option<String> },
}

impl RequestError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RequestError::Cancelled)
    }

    /// Message for the presentation layer; `None` for cancellations.
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            RequestError::Cancelled => return None,
            RequestError::Timeout => {
                "The request took too long and was stopped. Please try again.".to_string()
            }
            RequestError::Transport(_) => {
                "Network connection error, please check your connection.".to_string()
            }
            RequestError::Remote {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.trim().to_string(),
            RequestError::Remote { status, .. } => status_message(*status),
        };
        Some(message)
    }
}

fn status_message(status: u16) -> String {
    match status {
        404 => "The requested GitHub project was not found, please check the name.".to_string(),
        403 => "API access is rate limited, please try again later.".to_string(),
        408 => "The service is responding slowly, please try again later.".to_string(),
        500..=599 => "Internal server error, please try again later.".to_string(),
        other => format!("Request failed with HTTP {other}."),
    }
}
