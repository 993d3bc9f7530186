use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::approval::DecisionOutcome;
use super::waitlist::WaitlistRequest;
use super::{LeasingError, LeasingService};
use crate::workflows::records::{ApplicationId, CrmStore, LeaseId, PropertyId, StoreError};

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub outcome: DecisionOutcome,
}

/// Router builder exposing staff decisions and lease actions.
pub fn leasing_router<S>(service: Arc<LeasingService<S>>) -> Router
where
    S: CrmStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications/:application_id/decision",
            post(decision_handler::<S>),
        )
        .route("/api/v1/leases/:lease_id/end", post(end_handler::<S>))
        .route("/api/v1/leases/:lease_id/renew", post(renew_handler::<S>))
        .route(
            "/api/v1/properties/:property_id/waitlist",
            post(waitlist_handler::<S>),
        )
        .with_state(service)
}

pub(crate) fn leasing_error_response(error: LeasingError) -> Response {
    let status = match &error {
        LeasingError::AlreadyDecided { .. }
        | LeasingError::ActiveLeaseExists { .. }
        | LeasingError::LeaseNotActive { .. }
        | LeasingError::PropertyNotLeased { .. } => StatusCode::CONFLICT,
        LeasingError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        LeasingError::Store(StoreError::Rejected { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        LeasingError::RolledBack { .. } => StatusCode::SERVICE_UNAVAILABLE,
        LeasingError::LeaseTerm(_)
        | LeasingError::Store(_)
        | LeasingError::Inconsistent { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        LeasingError::Inconsistent { records, .. } => json!({
            "error": error.to_string(),
            "unrestored": records,
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn decision_handler<S>(
    State(service): State<Arc<LeasingService<S>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    S: CrmStore + 'static,
{
    let id = ApplicationId(application_id);
    match service.decide(&id, request.outcome, Utc::now()).await {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error) => leasing_error_response(error),
    }
}

pub(crate) async fn end_handler<S>(
    State(service): State<Arc<LeasingService<S>>>,
    Path(lease_id): Path<String>,
) -> Response
where
    S: CrmStore + 'static,
{
    match service.end_lease(&LeaseId(lease_id)).await {
        Ok(transition) => (StatusCode::OK, axum::Json(transition)).into_response(),
        Err(error) => leasing_error_response(error),
    }
}

pub(crate) async fn renew_handler<S>(
    State(service): State<Arc<LeasingService<S>>>,
    Path(lease_id): Path<String>,
) -> Response
where
    S: CrmStore + 'static,
{
    match service.renew_lease(&LeaseId(lease_id)).await {
        Ok(transition) => (StatusCode::OK, axum::Json(transition)).into_response(),
        Err(error) => leasing_error_response(error),
    }
}

pub(crate) async fn waitlist_handler<S>(
    State(service): State<Arc<LeasingService<S>>>,
    Path(property_id): Path<String>,
    axum::Json(request): axum::Json<WaitlistRequest>,
) -> Response
where
    S: CrmStore + 'static,
{
    match service
        .join_waitlist(&PropertyId(property_id), request)
        .await
    {
        Ok(client) => (StatusCode::CREATED, axum::Json(client)).into_response(),
        Err(error) => leasing_error_response(error),
    }
}
