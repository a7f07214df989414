use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};
use mealdb::MealId;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    controls::load_controls,
    error::AppError,
    reconcile::resolve,
    render::{ListOutcome, render_detail, render_list, render_page},
    selection::FilterSelection,
    state::AppState,
};

const SCRIPT: &str = include_str!("../static/app.js");
const STYLE: &str = include_str!("../static/style.css");

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let controls = load_controls(state.source.as_ref())
        .await
        .map_err(AppError::ControlsUnavailable)?;

    let (session, live) = {
        let mut sessions = state.sessions();
        (sessions.create(), sessions.live())
    };

    info!(
        "Session {session} started with {} areas, {} categories ({live} live)",
        controls.areas.len(),
        controls.categories.len()
    );

    Ok(Html(render_page(session, &controls)))
}

#[derive(Deserialize)]
pub struct MealsQuery {
    session: u64,

    #[serde(default)]
    area: String,

    #[serde(default)]
    category: String,
}

pub async fn meals_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MealsQuery>,
) -> Result<Response, AppError> {
    let selection = FilterSelection::new(&query.area, &query.category);

    let cycle = state
        .sessions()
        .get_mut(query.session)
        .ok_or(AppError::UnknownSession)?
        .begin(&selection);

    let Some(cycle) = cycle else {
        debug!("Session {} reselected {selection:?}, skipping", query.session);
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let result = resolve(state.source.as_ref(), &selection).await;
    if let Err(error) = &result {
        warn!("Resolving {selection:?} failed: {error:?}");
    }

    let outcome = ListOutcome::resolved(selection, result);
    let applied = state
        .sessions()
        .get_mut(query.session)
        .and_then(|session| session.finish(cycle, outcome));

    let Some(outcome) = applied else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let status = match outcome {
        ListOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };

    Ok((status, Html(render_list(&outcome))).into_response())
}

pub async fn meal_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = MealId::new(id);

    let meal = state.source.lookup(&id).await?;
    let meal = meal.ok_or(AppError::NotFound(id))?;

    Ok(Html(render_detail(Some(&meal))))
}

pub async fn script_handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/javascript; charset=utf-8")], SCRIPT)
}

pub async fn style_handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLE)
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
