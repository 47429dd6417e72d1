use axum::{
	Form, Json, Router,
	body::Bytes,
	extract::{FromRequest, Query, Request, State},
	http::{
		HeaderMap, StatusCode,
		header::{CONTENT_TYPE, SET_COOKIE},
	},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use aisle_domain::{SearchQuery, ViewedHandles, clamp_limit};
use aisle_service::{Error as ServiceError, ExpandedProduct, IndexInfo, SearchResult};

use crate::{cookie, state::AppState};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/search", get(search))
		.route("/api/search/suggestions", get(suggestions))
		.route("/api/recently-viewed", get(list_history).post(record_view))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/index", get(index_info)).with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
	q: Option<String>,
	page: Option<String>,
	#[serde(rename = "perPage")]
	per_page: Option<String>,
	suggest: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
	#[serde(flatten)]
	result: SearchResult,
	#[serde(skip_serializing_if = "Option::is_none")]
	suggestions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestionParams {
	q: Option<String>,
}

#[derive(Debug, Serialize)]
struct SuggestionsResponse {
	suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RecordViewBody {
	handle: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecordViewResponse {
	ok: bool,
	handles: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryParams {
	limit: Option<String>,
	expand: Option<String>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
	handles: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	products: Option<Vec<ExpandedProduct>>,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
	let query =
		SearchQuery::from_raw(params.q.as_deref(), params.page.as_deref(), params.per_page.as_deref());
	let result = state.service.search(&query).await?;
	let suggestions = if params.suggest.is_some() && result.found == 0 && !query.is_empty() {
		Some(state.service.suggest(&query.text).await)
	} else {
		None
	};

	Ok(Json(SearchResponse { result, suggestions }))
}

async fn suggestions(
	State(state): State<AppState>,
	Query(params): Query<SuggestionParams>,
) -> Json<SuggestionsResponse> {
	let suggestions = state.service.suggest(params.q.as_deref().unwrap_or_default()).await;

	Json(SuggestionsResponse { suggestions })
}

async fn record_view(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
	let current = read_history(&state, request.headers());
	let body = read_record_view_body(request).await;
	let handle = body.handle.unwrap_or_default();
	let mut handles =
		state.service.record_view(current, &handle).map_err(ApiError::with_ok_flag)?;
	let set_cookie =
		state.service.history_cookie(&mut handles).map_err(ApiError::with_ok_flag)?;
	let body = RecordViewResponse { ok: true, handles: handles.into_vec() };

	Ok(([(SET_COOKIE, set_cookie)], Json(body)).into_response())
}

async fn list_history(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
	let current = read_history(&state, &headers);
	let handles = state.service.list_history(current.as_ref(), clamp_limit(params.limit.as_deref()));

	if params.expand.is_none() || handles.is_empty() {
		return Ok(Json(HistoryResponse { handles: handles.into_vec(), products: None }));
	}

	let products = match state.service.expand_history(&handles).await {
		Ok(products) => Some(products),
		Err(err @ ServiceError::Configuration { .. }) => return Err(err.into()),
		Err(err) => {
			tracing::warn!(error = %err, "History expansion failed; returning handles only.");

			None
		},
	};

	Ok(Json(HistoryResponse { handles: handles.into_vec(), products }))
}

async fn index_info(State(state): State<AppState>) -> Result<Json<IndexInfo>, ApiError> {
	let response = state.service.index_info().await?;

	Ok(Json(response))
}

fn read_history(state: &AppState, headers: &HeaderMap) -> Option<ViewedHandles> {
	let token = cookie::read(headers, &state.service.cfg.history.cookie_name);

	state.service.decode_history(token.as_deref())
}

/// Accepts either a JSON object or a urlencoded form. An unreadable body carries no handle.
async fn read_record_view_body(request: Request) -> RecordViewBody {
	let is_form = request
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.trim_start().starts_with(FORM_CONTENT_TYPE));

	if is_form {
		return match Form::<RecordViewBody>::from_request(request, &()).await {
			Ok(Form(body)) => body,
			Err(_) => RecordViewBody::default(),
		};
	}

	match Bytes::from_request(request, &()).await {
		Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
		Err(_) => RecordViewBody::default(),
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	#[serde(skip_serializing_if = "Option::is_none")]
	ok: Option<bool>,
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
	ok: Option<bool>,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into(), ok: None }
	}

	/// Mutation endpoints report failures alongside `"ok": false`.
	fn with_ok_flag(err: ServiceError) -> Self {
		Self { ok: Some(false), ..Self::from(err) }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Validation { message, .. } => Self::new(StatusCode::BAD_REQUEST, message),
			ServiceError::Configuration { message } => {
				tracing::error!(%message, "Request failed on missing configuration.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
			},
			ServiceError::SearchFailed => {
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, ServiceError::SearchFailed.to_string())
			},
			err @ ServiceError::Upstream { .. } => {
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
			},
			ServiceError::Internal { message } => {
				tracing::error!(%message, "Request failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error.")
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { ok: self.ok, error: self.message };

		(self.status, Json(body)).into_response()
	}
}
