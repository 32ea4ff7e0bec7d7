pub mod day_notes;
pub mod notes;
pub mod tasks;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use planner_core::date_key::DateKey;
use planner_core::error::PlannerError;
use planner_core::protocol::Message;

/// Convert errors to HTTP responses with a `{message}` body.
///
/// `PlannerError`s keep their meaning (400/401/404); anything else is a 500.
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<PlannerError>() {
            Some(PlannerError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(PlannerError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(PlannerError::Authentication) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(Message::new(self.0.to_string()));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Parse a `{date}` path segment.
pub(crate) fn parse_date(raw: &str) -> Result<DateKey, AppError> {
    Ok(DateKey::decode(raw)?)
}

/// Turn a JSON body rejection into a 400 with a `{message}` body.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(PlannerError::Validation(rejection.body_text()).into()),
    }
}
