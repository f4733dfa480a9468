use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::domain::RecordKind;
use super::payload::{decode_candidate, DecodedCandidate};
use super::repository::{RecordId, RecordRepository, RepositoryError};
use super::service::{RecordService, RecordServiceError};
use crate::validation::{Issue, IssueKind, PageQuery, RequestRejection};

/// Handler state for the routes of a single record kind.
pub(crate) struct KindRoute<R> {
    pub(crate) service: Arc<RecordService<R>>,
    pub(crate) kind: RecordKind,
}

impl<R> Clone for KindRoute<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            kind: self.kind,
        }
    }
}

/// Router exposing create, read, list and dry-run validation for every record kind.
pub fn record_router<R>(service: Arc<RecordService<R>>) -> Router
where
    R: RecordRepository + 'static,
{
    RecordKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            let collection = kind.collection();
            let routes = Router::new()
                .route(
                    &format!("/api/v1/{collection}"),
                    post(create_handler::<R>).get(list_handler::<R>),
                )
                .route(
                    &format!("/api/v1/{collection}/:record_id"),
                    get(fetch_handler::<R>),
                )
                .route(
                    &format!("/api/v1/validation/{collection}"),
                    post(dry_run_handler::<R>),
                )
                .with_state(KindRoute {
                    service: Arc::clone(&service),
                    kind,
                });
            router.merge(routes)
        })
}

pub(crate) async fn create_handler<R>(
    State(route): State<KindRoute<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: RecordRepository + 'static,
{
    let decoded = match decode_body(route.kind, body) {
        Ok(decoded) => decoded,
        Err(response) => return response,
    };

    // Existence lookups run inline on this worker; see `RecordService`.
    match route.service.create_decoded(decoded) {
        Ok(accepted) => (StatusCode::CREATED, Json(accepted)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(route): State<KindRoute<R>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response
where
    R: RecordRepository + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return extractor_rejection("query", rejection.status(), rejection.body_text())
        }
    };

    match route.service.list(route.kind, query) {
        Ok(records) => (StatusCode::OK, Json(json!({ "records": records }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(route): State<KindRoute<R>>,
    record_id: Result<Path<Uuid>, PathRejection>,
) -> Response
where
    R: RecordRepository + 'static,
{
    let Path(record_id) = match record_id {
        Ok(record_id) => record_id,
        Err(rejection) => {
            return extractor_rejection("recordId", rejection.status(), rejection.body_text())
        }
    };

    match route.service.get(route.kind, RecordId(record_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Report what a write would produce without storing anything.
pub(crate) async fn dry_run_handler<R>(
    State(route): State<KindRoute<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: RecordRepository + 'static,
{
    let decoded = match decode_body(route.kind, body) {
        Ok(decoded) => decoded,
        Err(response) => return response,
    };

    let result = route.service.screen(decoded);
    let payload = json!({
        "accepted": !result.has_errors(),
        "issues": result.issues(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

fn decode_body(
    kind: RecordKind,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<DecodedCandidate, Response> {
    let Json(body) = body.map_err(|rejection| {
        extractor_rejection("body", rejection.status(), rejection.body_text())
    })?;
    decode_candidate(kind, body).map_err(IntoResponse::into_response)
}

/// Extractor failures keep their HTTP status but use the issue-list body.
fn extractor_rejection(field: &str, status: StatusCode, message: String) -> Response {
    let rejection = RequestRejection::new(vec![Issue::error(IssueKind::Shape, field, message)]);
    (status, Json(rejection)).into_response()
}

fn error_response(error: RecordServiceError) -> Response {
    match error {
        RecordServiceError::Rejected(rejection) => rejection.into_response(),
        RecordServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({
                "error": "record already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        RecordServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "error": "record not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
