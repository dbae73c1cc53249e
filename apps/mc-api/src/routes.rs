use axum::{
	Json, Router,
	extract::{
		Path, Query, Request, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::{HeaderMap, StatusCode},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, patch, post},
};
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;
use mc_domain::feed::SyncBatch;
use mc_service::{
	EventPage, GlobalSearchRequest, GlobalSearchResponse, IngestActivityPayload,
	ListEventsRequest, TaskItem, TaskPatch, TasksInRangeRequest, UpdateTaskRequest,
	UpsertDocumentRequest,
};

pub const ACTIVITY_SECRET_HEADER: &str = "x-activity-secret";
pub const SYNC_SECRET_HEADER: &str = "x-sync-secret";

/// Write routes check their shared secret in a route layer, so a refused request is never parsed
/// and never reaches the store.
pub fn router(state: AppState) -> Router {
	let activity_auth = middleware::from_fn_with_state(state.clone(), require_activity_secret);
	let sync_auth = middleware::from_fn_with_state(state.clone(), require_sync_secret);

	Router::new()
		.route("/health", get(health))
		.route(
			"/api/activity",
			post(log_activity).route_layer(activity_auth).get(list_activity),
		)
		.route("/api/scheduled-tasks", get(tasks_in_range))
		.route("/api/scheduled-tasks/sync", post(sync_tasks).route_layer(sync_auth.clone()))
		.route("/api/scheduled-tasks/{id}", patch(update_task))
		.route("/api/documents", post(upsert_document).route_layer(sync_auth))
		.route("/api/search", get(search))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn require_activity_secret(
	State(state): State<AppState>,
	req: Request,
	next: Next,
) -> Result<Response, ApiError> {
	state.service.authorize_activity(header_value(req.headers(), ACTIVITY_SECRET_HEADER))?;

	Ok(next.run(req).await)
}

async fn require_sync_secret(
	State(state): State<AppState>,
	req: Request,
	next: Next,
) -> Result<Response, ApiError> {
	state.service.authorize_sync(header_value(req.headers(), SYNC_SECRET_HEADER))?;

	Ok(next.run(req).await)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers.get(name).and_then(|value| value.to_str().ok())
}

#[derive(Debug, Serialize)]
struct IdResponse {
	ok: bool,
	id: Uuid,
}

#[derive(Debug, Serialize)]
struct SyncResponse {
	ok: bool,
	count: usize,
	ids: Vec<Uuid>,
}

async fn log_activity(
	State(state): State<AppState>,
	payload: Result<Json<IngestActivityPayload>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.log_event(payload.into_request()).await?;

	Ok(Json(IdResponse { ok: true, id: response.id }))
}

async fn list_activity(
	State(state): State<AppState>,
	query: Result<Query<ListEventsRequest>, QueryRejection>,
) -> Result<Json<EventPage>, ApiError> {
	let Query(req) = query?;
	let page = state.service.list_events(req).await?;

	Ok(Json(page))
}

async fn sync_tasks(
	State(state): State<AppState>,
	payload: Result<Json<SyncBatch>, JsonRejection>,
) -> Result<Json<SyncResponse>, ApiError> {
	let Json(batch) = payload?;
	let report = state.service.sync_scheduled_tasks(batch.tasks).await?;

	Ok(Json(SyncResponse { ok: true, count: report.count, ids: report.ids }))
}

async fn tasks_in_range(
	State(state): State<AppState>,
	query: Result<Query<TasksInRangeRequest>, QueryRejection>,
) -> Result<Json<Vec<TaskItem>>, ApiError> {
	let Query(req) = query?;
	let tasks = state.service.tasks_in_range(req).await?;

	Ok(Json(tasks))
}

async fn update_task(
	State(state): State<AppState>,
	id: Result<Path<Uuid>, PathRejection>,
	payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
	let Path(id) = id?;
	let Json(patch) = payload?;
	let id = state.service.update_scheduled_task(UpdateTaskRequest { id, patch }).await?;

	Ok(Json(IdResponse { ok: true, id }))
}

async fn upsert_document(
	State(state): State<AppState>,
	payload: Result<Json<UpsertDocumentRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError> {
	let Json(req) = payload?;
	let id = state.service.upsert_document(req).await?;

	Ok(Json(IdResponse { ok: true, id }))
}

async fn search(
	State(state): State<AppState>,
	query: Result<Query<GlobalSearchRequest>, QueryRejection>,
) -> Result<Json<GlobalSearchResponse>, ApiError> {
	let Query(req) = query?;
	let response = state.service.global_search(req).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}

	fn invalid_request(message: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
	}
}
impl From<mc_service::Error> for ApiError {
	fn from(err: mc_service::Error) -> Self {
		match err {
			mc_service::Error::Unauthorized { message } =>
				Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message),
			mc_service::Error::InvalidRequest { message } => Self::invalid_request(message),
			mc_service::Error::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			mc_service::Error::Storage { message } => {
				tracing::error!(error = %message, "Request failed in storage.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", "Internal error.")
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::invalid_request(rejection.body_text())
	}
}
impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::invalid_request(rejection.body_text())
	}
}
impl From<PathRejection> for ApiError {
	fn from(rejection: PathRejection) -> Self {
		Self::invalid_request(rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
