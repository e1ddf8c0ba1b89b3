use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Unauthorized: invalid team token")]
    Unauthorized,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error("Server misconfigured: {0} missing")]
    ServerMisconfigured(&'static str),

    /// 上游返回了非 2xx 状态；原样转发状态码
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    UpstreamBody(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl RelayError {
    pub fn invalid_json() -> Self {
        Self::BadRequest("invalid JSON".into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { status, .. } => *status,
            Self::ServerMisconfigured(_)
            | Self::Network(_)
            | Self::UpstreamBody(_)
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
