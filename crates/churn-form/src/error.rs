use std::fmt;

/// Why a prediction cycle failed. The page shows the same message for all of
/// them; the variant only reaches the logs.
#[derive(Debug)]
pub enum PredictError {
    /// The request never produced a response (connect, timeout, read).
    Transport(String),
    /// The endpoint answered outside 2xx.
    Status { status: u16, body: String },
    /// 2xx, but the body is not a prediction.
    MalformedBody(String),
}

impl PredictError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Transport(_) => "transport",
            PredictError::Status { .. } => "status",
            PredictError::MalformedBody(_) => "malformed_body",
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::Transport(message) => write!(f, "request failed: {message}"),
            PredictError::Status { status, body } => {
                write!(f, "prediction endpoint returned status {status}: {body}")
            }
            PredictError::MalformedBody(message) => {
                write!(f, "unexpected prediction body: {message}")
            }
        }
    }
}

impl std::error::Error for PredictError {}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        PredictError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::MalformedBody(err.to_string())
    }
}
