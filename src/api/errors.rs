use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Error type reported by the API in the `error.type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    NoProbesFound,
    ValidationError,
    ApiError,
    /// Any type this client does not classify.
    Other(String),
}

impl From<String> for ApiErrorKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "no_probes_found" => ApiErrorKind::NoProbesFound,
            "validation_error" => ApiErrorKind::ValidationError,
            "api_error" => ApiErrorKind::ApiError,
            _ => ApiErrorKind::Other(kind),
        }
    }
}

impl<'de> Deserialize<'de> for ApiErrorKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(ApiErrorKind::from)
    }
}

/// Wire shape of a non-2xx response body.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ApiErrorKind,
    /// Per-field validation messages
    #[serde(default)]
    pub params: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Connection failure, timeout or unreadable body.
    #[error("err: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no suitable probes found - please choose a different location")]
    NoProbes,
    #[error("invalid parameters - please check the help for more information")]
    Validation { params: BTreeMap<String, String> },
    /// Any other API error. The server message is kept for debugging only.
    #[error("err: internal server error - please try again later")]
    ApiInternal { kind: ApiErrorKind, message: String },
    /// A non-2xx response whose body is not an API error.
    #[error("err: invalid error format returned ({status}) - please report this bug")]
    InvalidErrorBody {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
    /// A response body that is not valid UTF-8.
    #[error("err: invalid response encoding returned - please report this bug")]
    Encoding(#[from] std::string::FromUtf8Error),
    /// A 2xx response whose body does not match the expected shape.
    #[error("err: invalid response format returned - please report this bug")]
    Decode(#[source] serde_json::Error),
}

impl ApiClientError {
    /// Whether the command help should be shown alongside the message.
    pub fn show_help(&self) -> bool {
        matches!(
            self,
            ApiClientError::NoProbes | ApiClientError::Validation { .. }
        )
    }

    /// Classifies the body of a non-2xx response.
    pub fn from_error_body(status: StatusCode, body: &str) -> Self {
        let body = match serde_json::from_str::<ErrorBody>(body) {
            Ok(body) => body,
            Err(source) => return ApiClientError::InvalidErrorBody { status, source },
        };

        let ApiError {
            message,
            kind,
            params,
        } = body.error;
        match kind {
            ApiErrorKind::NoProbesFound => ApiClientError::NoProbes,
            ApiErrorKind::ValidationError => ApiClientError::Validation {
                params: params.unwrap_or_default(),
            },
            kind => ApiClientError::ApiInternal { kind, message },
        }
    }
}
