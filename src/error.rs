use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("expected exactly one matching record, got {got}")]
    ExpectedOneResult { got: usize },
    #[error("expected {expected} identifiers in response, got {got}")]
    CountMismatch { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("request timed out")]
    Timeout {
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: reqwest::StatusCode },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON payload: {message}")]
    Json { message: String },
    #[error("response envelope carries neither result nor error")]
    EmptyEnvelope,
    #[error("response id {got} does not echo request id {sent}")]
    IdMismatch { sent: u64, got: String },
    #[error("unexpected result shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },
    #[error("missing field in API response: {field}")]
    MissingField { field: &'static str },
}

/// Server-reported application error from the JSON-RPC `error` member.
#[derive(Debug, Error)]
#[error("Zabbix API error {code}: {message}")]
pub struct ApiError {
    pub code: i64,
    pub message: String,
    pub data: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication rejected by server")]
    Rejected {
        #[source]
        source: ApiError,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { source };
        }
        if source.is_status() {
            if let Some(status) = source.status() {
                return Self::HttpStatus { status };
            }
        }
        Self::Request { source }
    }
}

impl Error {
    /// Server error code, when the failure is an API-level rejection.
    #[must_use]
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api(err) => Some(err.code),
            _ => None,
        }
    }
}
