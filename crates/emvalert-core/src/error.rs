use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, AlertError>;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{endpoint} responded with status {status}")]
    UpstreamStatus { endpoint: String, status: u16 },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("post batch stopped after {delivered} delivered: {source}")]
    PartialDelivery {
        delivered: usize,
        #[source]
        source: Box<AlertError>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
}

impl AlertError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::UpstreamStatus { .. } => "UPSTREAM_STATUS",
            Self::Auth(_) => "AUTH_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::PartialDelivery { source, .. } => source.code(),
        }
    }

    /// Marks a batch failure that happened after `delivered` posts already went out.
    pub fn after_delivered(self, delivered: usize) -> Self {
        if delivered == 0 {
            return self;
        }
        Self::PartialDelivery {
            delivered,
            source: Box::new(self),
        }
    }

    /// How many posts of the failed batch were delivered before the error.
    pub fn delivered(&self) -> usize {
        match self {
            Self::PartialDelivery { delivered, .. } => *delivered,
            _ => 0,
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
        }
    }
}
