//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! generation pipeline. Each handler is instrumented and logs parameters and
//! basic result info.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, instrument};

use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

/// Catalog summary so the client can render its pickers.
#[instrument(level = "info", skip(state))]
pub async fn http_get_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let length_classes = state
    .catalog
    .length_classes
    .iter()
    .map(|lc| LengthClassSummary {
      key: lc.key.clone(),
      label: lc.label.clone(),
      character_range: lc.character_range.clone(),
      question_counts: lc.possible_counts.clone(),
    })
    .collect();
  let categories = state.catalog.categories().iter().map(|c| c.to_string()).collect();
  Json(CatalogOut { length_classes, categories, levels: state.catalog.levels() })
}

/// The one generation endpoint. Malformed bodies are the only 400s; every
/// pipeline failure downstream of here is a 200 with `success:false`.
#[instrument(level = "info", skip(state, body))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
  let Json(req) = match body {
    Ok(json) => json,
    Err(rejection) => {
      return (
        StatusCode::BAD_REQUEST,
        Json(GenerateResponse::bad_request(format!("invalid request body: {}", rejection))),
      )
        .into_response();
    }
  };

  if req.is_custom() && req.prompt.as_deref().map(str::trim).unwrap_or("").is_empty() {
    return (
      StatusCode::BAD_REQUEST,
      Json(GenerateResponse::bad_request("custom requests require a non-empty prompt")),
    )
      .into_response();
  }

  let res = state.generate(&req).await;
  info!(
    target: "generator",
    success = res.success,
    fallback = res.message.is_some(),
    "HTTP generate served"
  );
  Json(res).into_response()
}
