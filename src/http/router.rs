//! Axum router construction.
//!
//! Both listeners are served by routers built here from the same [`Route`]
//! table; only the [`AppState`] channel differs.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::{handlers, state::AppState};
use crate::config::GoatConfig;

/// The fixed set of routes served on both listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `POST /igoat/user`
    RegisterUser,
    /// `GET /igoat/token`
    IssueToken,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::RegisterUser, Route::IssueToken];

    pub fn path(self) -> &'static str {
        match self {
            Route::RegisterUser => "/igoat/user",
            Route::IssueToken => "/igoat/token",
        }
    }

    fn handler(self) -> MethodRouter<AppState> {
        match self {
            Route::RegisterUser => post(handlers::register_user),
            Route::IssueToken => get(handlers::issue_token),
        }
    }
}

/// Build the application [`Router`] for one listener.
///
/// `limits.max_body_bytes` is the only body cap: axum's own extractor
/// default is switched off so it cannot undercut the configured value.
#[allow(deprecated)]
pub fn build(state: AppState, config: &GoatConfig) -> Router {
    let mut router = Router::new();
    for route in Route::ALL {
        router = router.route(route.path(), route.handler());
    }

    router
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(config.timeouts.request()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
