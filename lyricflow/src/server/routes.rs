//! HTTP routes.

use super::pages;
use crate::app::{Application, SongQuery};
use crate::errors::LyricflowError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Form and JSON body for an analysis request.
///
/// Missing fields deserialize as empty so that query validation reports them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    /// Song name.
    pub song: String,
    /// Artist name.
    pub artist: String,
}

impl From<AnalyzeRequest> for SongQuery {
    fn from(req: AnalyzeRequest) -> Self {
        SongQuery::new(req.song, req.artist)
    }
}

/// Builds the application router.
pub fn router(app: Arc<Application>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze_form))
        .route("/api/analyze", post(analyze_json))
        .route("/health", get(health))
        .with_state(app)
}

async fn index() -> Html<String> {
    Html(pages::index_page(&SongQuery::default(), None))
}

async fn analyze_form(
    State(app): State<Arc<Application>>,
    Form(req): Form<AnalyzeRequest>,
) -> Html<String> {
    let query = SongQuery::from(req);
    let view = app.analyze_for_display(&query).await;
    Html(pages::index_page(&query, Some(&view)))
}

async fn analyze_json(
    State(app): State<Arc<Application>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let query = match body {
        Ok(Json(req)) => SongQuery::from(req),
        Err(rejection) => {
            let err = LyricflowError::InvalidQuery(rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, &err);
        }
    };
    match app.analyze(&query).await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(err) => {
            let status = match err {
                LyricflowError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
                LyricflowError::Provider(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(status, &err)
        }
    }
}

fn error_response(status: StatusCode, err: &LyricflowError) -> Response {
    tracing::warn!(error = %err, status = status.as_u16(), "API analysis failed");
    (
        status,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

async fn health() -> &'static str {
    "ok"
}
