//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(CategoriesOut { categories: state.catalog.categories() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_rules(
  State(state): State<Arc<AppState>>,
  Query(q): Query<RulesQuery>,
) -> impl IntoResponse {
  let hits = search_rules(&state.catalog, q.category.as_deref(), q.q.as_deref());
  let rules: Vec<_> = hits.iter().map(|r| (**r).clone()).collect();
  Json(RulesOut { count: rules.len(), rules })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_rule(
  State(state): State<Arc<AppState>>,
  Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let rule = state.catalog.get(&name).ok_or_else(|| ApiError::UnknownRule(name.clone()))?;
  Ok(Json((**rule).clone()))
}

#[instrument(level = "info", skip(state, body), fields(mode = ?body.mode, category = %body.category))]
pub async fn http_post_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<impl IntoResponse, ApiError> {
  let id = state.create_session(body.mode, body.category).await?;
  let out = state.with_session(id, |s| to_out(Some(id), s)).await?;
  info!(target: "quiz", %id, status = ?out.status, deck_len = out.deck_len, "HTTP session started");
  Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  let out = state.with_session(id, |s| to_out(Some(id), s)).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, action), fields(?action))]
pub async fn http_post_action(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(action): Json<QuizAction>,
) -> Result<impl IntoResponse, ApiError> {
  let (session, outcome) = state
    .with_session(id, |s| {
      let outcome = apply_action(s, action);
      (to_out(Some(id), s), outcome)
    })
    .await?;
  Ok(Json(ActionOut { session, outcome: outcome.into() }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  state.remove_session(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
