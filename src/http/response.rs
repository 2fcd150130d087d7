//! Response helpers and the client-facing error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::accounts::RecordError;
use crate::security::Channel;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}

/// Errors surfaced to clients. Never propagates past the handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Registration body was not a JSON object.
    #[error("{source}")]
    MalformedInput {
        channel: Channel,
        #[source]
        source: RecordError,
    },
}

impl ApiError {
    pub fn malformed(channel: Channel, source: RecordError) -> Self {
        ApiError::MalformedInput { channel, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::MalformedInput { channel, source } => (
                status,
                channel.secure_header(),
                Json(ErrorBody::new("malformed_input", source.to_string())),
            )
                .into_response(),
        }
    }
}
