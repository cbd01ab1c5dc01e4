use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The daemon could not be reached or the HTTP exchange failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The daemon answered with a JSON-RPC error object.
    #[error("aria2: {message}")]
    Remote { code: i64, message: String },

    /// The result payload did not have the shape expected for the method.
    #[error("malformed response to {method}: {reason}")]
    MalformedResponse { method: String, reason: String },

    /// A mutation acknowledged a different GID than the one requested.
    #[error("{method} acknowledged GID {actual}, expected {expected}")]
    ProtocolMismatch {
        method: String,
        expected: String,
        actual: String,
    },

    /// The daemon returned something other than "OK" for an option change.
    #[error("{0}")]
    Rejected(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A multi-item command failed after the daemon had accepted some items.
    /// `completed` holds the GIDs it confirmed before `source`.
    #[error("{source}")]
    Interrupted {
        completed: Vec<String>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn code(&self) -> i32 {
        match self {
            Error::Transport(_) => -1,
            Error::Remote { .. } => -2,
            Error::MalformedResponse { .. } => -3,
            Error::ProtocolMismatch { .. } => -4,
            Error::Rejected(_) => -5,
            Error::InvalidInput(_) => -6,
            Error::Io(_) => -7,
            Error::Serialization(_) => -8,
            Error::Interrupted { source, .. } => source.code(),
        }
    }

    /// Only transport failures may succeed on a second attempt; everything
    /// else is a definite answer from the daemon or a client-side bug.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Items already applied on the daemon before the failure, if any.
    pub fn completed(&self) -> &[String] {
        match self {
            Error::Interrupted { completed, .. } => completed,
            _ => &[],
        }
    }

    /// Attach the GIDs confirmed so far to `source`. With nothing confirmed
    /// the error is returned as is.
    pub(crate) fn interrupted(completed: Vec<String>, source: Error) -> Self {
        if completed.is_empty() {
            source
        } else {
            Error::Interrupted {
                completed,
                source: Box::new(source),
            }
        }
    }

    pub(crate) fn malformed(method: &str, reason: impl ToString) -> Self {
        Error::MalformedResponse {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Transport(format!("request timed out: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
