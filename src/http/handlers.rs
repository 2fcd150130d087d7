//! Axum request handlers for the two training endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::response::{ApiError, ErrorBody};
use super::state::AppState;
use crate::accounts::{SessionToken, UserRecord};
use crate::observability::metrics;

/// Endpoint labels for logs and metrics.
pub const USER_ENDPOINT: &str = "user";
pub const TOKEN_ENDPOINT: &str = "token";

const ACCOUNT_EXPOSED: &str = "The user's account information was stolen by anyone on your Wi-Fi!";
const CREDENTIALS_EXPOSED: &str =
    "The user's login credentials were stolen by everyone on your Wi-Fi!";

/// Query parameters of the token endpoint. Missing values are empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /igoat/user`: echo the submitted record with a fresh `id`.
///
/// The body is read as raw bytes so any content type is accepted, as long as
/// it decodes to a JSON object. The body crossed the wire before it is
/// decoded, so the detector sees every request. A rejected body does not
/// consume an id.
pub async fn register_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    metrics::record_request(USER_ENDPOINT, state.channel);

    state
        .detector
        .on_request(state.channel, USER_ENDPOINT, ACCOUNT_EXPOSED);

    let mut record = UserRecord::from_slice(&body).map_err(|e| {
        tracing::debug!(channel = %state.channel, error = %e, "Rejected registration body");
        metrics::record_malformed(state.channel);
        ApiError::malformed(state.channel, e)
    })?;

    let id = state.counter.increment_and_get();
    record.assign_id(id);

    tracing::debug!(channel = %state.channel, id, "User record created");

    Ok((
        StatusCode::OK,
        state.channel.secure_header(),
        [(CONTENT_TYPE, "application/json")],
        record.to_pretty_json(),
    )
        .into_response())
}

/// `GET /igoat/token`: issue a session cookie for any username and password.
///
/// There is no credential check and no failure path: a missing or unparseable
/// query string is treated as empty credentials.
pub async fn issue_token(
    State(state): State<AppState>,
    query: Result<Query<Credentials>, QueryRejection>,
) -> Response {
    metrics::record_request(TOKEN_ENDPOINT, state.channel);

    let credentials = query.map(|Query(c)| c).unwrap_or_default();

    state
        .detector
        .on_request(state.channel, TOKEN_ENDPOINT, CREDENTIALS_EXPOSED);

    let token = SessionToken::new(state.counter.increment_and_get());

    tracing::debug!(
        channel = %state.channel,
        username = %credentials.username,
        password_supplied = !credentials.password.is_empty(),
        token = %token,
        "Session token issued without verification"
    );

    (
        StatusCode::OK,
        state.channel.secure_header(),
        [(SET_COOKIE, token.cookie())],
    )
        .into_response()
}

/// Catch-all 404 handler.
pub async fn not_found(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        state.channel.secure_header(),
        Json(ErrorBody::new(
            "not_found",
            "the requested resource does not exist",
        )),
    )
}
