//! Session check applied in front of every `/api` route.
//!
//! Establishing a session (login redirect, identity provider callback,
//! logout) happens elsewhere; this layer only answers "is this request
//! authorized?" and rejects it with 401 before any store access if not.

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use planner_core::protocol::{Message, UNAUTHORIZED};

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "planner_session";

pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, headers: &HeaderMap) -> bool;
}

/// Used when no tokens are configured.
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self, _headers: &HeaderMap) -> bool {
        true
    }
}

/// Accepts `Authorization: Bearer <token>` or a `planner_session=<token>`
/// cookie matching one of the configured tokens.
pub struct TokenAuthorizer {
    tokens: HashSet<String>,
}

impl TokenAuthorizer {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        TokenAuthorizer {
            tokens: tokens.into_iter().filter(|t| !t.is_empty()).collect(),
        }
    }
}

impl Authorizer for TokenAuthorizer {
    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        bearer_token(headers)
            .into_iter()
            .chain(session_cookie(headers))
            .any(|token| self.tokens.contains(token))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn session_cookie(headers: &HeaderMap) -> impl Iterator<Item = &str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// Middleware: 401 `{message: "Unauthorized"}` unless the authorizer accepts.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.authorizer.is_authorized(request.headers()) {
        tracing::debug!(method = %request.method(), uri = %request.uri(), "rejected unauthenticated request");
        return (StatusCode::UNAUTHORIZED, Json(Message::new(UNAUTHORIZED))).into_response();
    }

    next.run(request).await
}
