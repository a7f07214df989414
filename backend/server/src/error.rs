use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use mealdb::{MealId, QueryError};
use thiserror::Error;
use tracing::warn;

use crate::{
    controls::ControlsLoadError,
    render::{describe, render_detail, render_detail_error, render_message, render_unavailable},
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Filters could not be loaded: {0}")]
    ControlsUnavailable(#[source] ControlsLoadError),

    #[error("Could not load the meal: {0}")]
    Query(#[from] QueryError),

    #[error("Meal {0} not found")]
    NotFound(MealId),

    #[error("Session expired, reload the page")]
    UnknownSession,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!("{self:?}");

        let (status, body) = match &self {
            AppError::ControlsUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, render_unavailable())
            }
            AppError::Query(error) => (
                StatusCode::BAD_GATEWAY,
                render_detail_error(&format!("Could not load the meal. {}", describe(error))),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, render_detail(None)),
            AppError::UnknownSession => (StatusCode::BAD_REQUEST, render_message("error", &self.to_string())),
        };

        (status, Html(body)).into_response()
    }
}
