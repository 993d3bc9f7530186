use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::documents::DocumentCategory;
use super::draft::{DraftField, EntryUpdate, GroupKind};
use super::service::{ApplicationIntakeService, IntakeError};
use super::sessions::{SessionId, WizardSessions};
use super::wizard::WizardError;
use crate::workflows::records::{CrmStore, PropertyId, StoreError};
use crate::workflows::uploads::{FileStorage, PendingFile};

/// Header carrying the original file name on document uploads.
pub const FILE_NAME_HEADER: &str = "x-file-name";

pub struct IntakeState<S, F> {
    pub service: Arc<ApplicationIntakeService<S, F>>,
    pub sessions: Arc<WizardSessions>,
}

impl<S, F> Clone for IntakeState<S, F> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub property_id: PropertyId,
}

/// Router builder exposing the applicant wizard over HTTP.
pub fn intake_router<S, F>(
    service: Arc<ApplicationIntakeService<S, F>>,
    sessions: Arc<WizardSessions>,
) -> Router
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    Router::new()
        .route("/api/v1/wizard", post(start_handler::<S, F>))
        .route(
            "/api/v1/wizard/:session_id",
            get(view_handler::<S, F>).delete(close_handler::<S, F>),
        )
        .route("/api/v1/wizard/:session_id/fields", post(field_handler::<S, F>))
        .route("/api/v1/wizard/:session_id/advance", post(advance_handler::<S, F>))
        .route("/api/v1/wizard/:session_id/retreat", post(retreat_handler::<S, F>))
        .route(
            "/api/v1/wizard/:session_id/groups/:group",
            post(add_entry_handler::<S, F>),
        )
        .route(
            "/api/v1/wizard/:session_id/groups/:group/:index",
            delete(remove_entry_handler::<S, F>),
        )
        .route(
            "/api/v1/wizard/:session_id/entries/:index",
            post(update_entry_handler::<S, F>),
        )
        .route(
            "/api/v1/wizard/:session_id/documents/:category",
            post(attach_handler::<S, F>),
        )
        .route(
            "/api/v1/wizard/:session_id/documents/:category/:index",
            delete(detach_handler::<S, F>),
        )
        .route("/api/v1/wizard/:session_id/submit", post(submit_handler::<S, F>))
        .with_state(IntakeState { service, sessions })
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn unknown_session(session_id: &SessionId) -> Response {
    error_body(
        StatusCode::NOT_FOUND,
        format!("wizard session {session_id} not found"),
    )
}

pub(crate) fn wizard_error_response(error: WizardError) -> Response {
    match error {
        WizardError::Invalid { step, errors } => {
            let payload = json!({
                "error": format!("{} has invalid fields", step.title()),
                "step": step,
                "validation_errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        WizardError::UnknownEntry { .. } | WizardError::UnknownDocument { .. } => {
            error_body(StatusCode::NOT_FOUND, error.to_string())
        }
        WizardError::Submitting => error_body(StatusCode::CONFLICT, error.to_string()),
    }
}

pub(crate) fn intake_error_response(error: IntakeError) -> Response {
    match error {
        IntakeError::Wizard(error) => wizard_error_response(error),
        IntakeError::MissingDocuments { ref missing } => {
            let categories: Vec<_> = missing.iter().map(|item| item.category).collect();
            let payload = json!({
                "error": error.to_string(),
                "missing": categories,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        IntakeError::UploadFailed { ref failures } => {
            let details: Vec<_> = failures
                .iter()
                .map(|failure| {
                    json!({
                        "category": failure.category,
                        "error": failure.error.to_string(),
                    })
                })
                .collect();
            let payload = json!({
                "error": error.to_string(),
                "failures": details,
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        IntakeError::PropertyUnavailable { .. } | IntakeError::NotOnReviewStep { .. } => {
            error_body(StatusCode::CONFLICT, error.to_string())
        }
        IntakeError::Store(StoreError::NotFound { .. }) => {
            error_body(StatusCode::NOT_FOUND, error.to_string())
        }
        IntakeError::Store(StoreError::Rejected { .. }) => {
            error_body(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        IntakeError::Store(_) | IntakeError::Interrupted(_) => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}

pub(crate) async fn start_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    axum::Json(request): axum::Json<StartRequest>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    match state.service.start(&request.property_id).await {
        Ok(wizard) => {
            let view = wizard.view();
            let session_id = state.sessions.open(wizard).await;
            let payload = json!({ "session_id": session_id, "wizard": view });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => intake_error_response(error),
    }
}

pub(crate) async fn view_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let wizard = session.lock().await;
    (StatusCode::OK, axum::Json(wizard.view())).into_response()
}

/// Abandon a wizard and drop its buffered documents.
pub(crate) async fn close_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    if state.sessions.close(&session_id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        unknown_session(&session_id)
    }
}

pub(crate) async fn field_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path(session_id): Path<SessionId>,
    axum::Json(field): axum::Json<DraftField>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.set_field(field) {
        Ok(()) => (StatusCode::OK, axum::Json(wizard.view())).into_response(),
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn advance_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.advance() {
        Ok(_) => (StatusCode::OK, axum::Json(wizard.view())).into_response(),
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn retreat_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.retreat() {
        Ok(_) => (StatusCode::OK, axum::Json(wizard.view())).into_response(),
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn add_entry_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path((session_id, group)): Path<(SessionId, GroupKind)>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.add_entry(group) {
        Ok(index) => {
            let payload = json!({ "index": index, "wizard": wizard.view() });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn remove_entry_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path((session_id, group, index)): Path<(SessionId, GroupKind, usize)>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.remove_entry(group, index) {
        Ok(()) => (StatusCode::OK, axum::Json(wizard.view())).into_response(),
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn update_entry_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path((session_id, index)): Path<(SessionId, usize)>,
    axum::Json(update): axum::Json<EntryUpdate>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.update_entry(index, update) {
        Ok(()) => (StatusCode::OK, axum::Json(wizard.view())).into_response(),
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn attach_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path((session_id, category)): Path<(SessionId, DocumentCategory)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(file_name) = headers
        .get(FILE_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return error_body(
            StatusCode::BAD_REQUEST,
            format!("{FILE_NAME_HEADER} header is required"),
        );
    };
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");
    let file = PendingFile::new(file_name, content_type, body.to_vec());

    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.attach_document(category, file) {
        Ok(()) => (StatusCode::CREATED, axum::Json(wizard.view())).into_response(),
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn detach_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path((session_id, category, index)): Path<(SessionId, DocumentCategory, usize)>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    match wizard.detach_document(category, index) {
        Ok(_) => (StatusCode::OK, axum::Json(wizard.view())).into_response(),
        Err(error) => wizard_error_response(error),
    }
}

pub(crate) async fn submit_handler<S, F>(
    State(state): State<IntakeState<S, F>>,
    Path(session_id): Path<SessionId>,
) -> Response
where
    S: CrmStore + 'static,
    F: FileStorage + 'static,
{
    let Some(session) = state.sessions.get(&session_id).await else {
        return unknown_session(&session_id);
    };
    let mut wizard = session.lock().await;
    let submitted = state.service.submit(&mut wizard).await;
    match submitted {
        Ok(outcome) => {
            drop(wizard);
            state.sessions.close(&session_id).await;
            (StatusCode::CREATED, axum::Json(outcome)).into_response()
        }
        Err(error) => intake_error_response(error),
    }
}
