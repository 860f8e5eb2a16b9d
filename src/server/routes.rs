use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use crate::auth::Session;
use crate::model::WorkflowTask;
use crate::query::{DashboardView, DateWindow, QueryEngine};
use crate::server::AppState;
use crate::storage::{HrStore, TableData};
use crate::upload::{self, UploadFormat};
use crate::Error;

pub type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct DashboardParams {
    pub from: Option<NaiveDate>,
    pub days: Option<u32>,
}

#[derive(Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct FormatParams {
    pub format: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ColumnsResponse {
    pub table: String,
    pub columns: Vec<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub table: String,
    pub format: &'static str,
    pub inserted: usize,
}

/// Map a store error onto a status code and JSON body
pub fn api_error(err: &Error) -> ApiError {
    let (status, kind) = match err {
        Error::UnknownTable(_) => (StatusCode::NOT_FOUND, "unknown_table"),
        Error::SchemaMismatch { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "schema_mismatch"),
        Error::ReferentialViolation { .. } => (StatusCode::CONFLICT, "referential_violation"),
        Error::ConstraintViolation { .. } => (StatusCode::CONFLICT, "constraint_violation"),
        Error::Upload(_) | Error::Csv(_) | Error::Json(_) => (StatusCode::BAD_REQUEST, "invalid_upload"),
        Error::InvalidValue(_) => (StatusCode::BAD_REQUEST, "invalid_value"),
        Error::StorageUnavailable(_) | Error::Storage(_) | Error::Io(_) => {
            tracing::error!("request failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "storage")
        }
    };

    let details = match err {
        Error::SchemaMismatch { expected, .. } => Some(serde_json::json!({
            "expected": expected,
            "missing": err.missing_columns(),
            "unexpected": err.unexpected_columns(),
        })),
        _ => None,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            kind: kind.to_string(),
            details,
        }),
    )
}

fn unauthorized(message: &str) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
            kind: "unauthorized".to_string(),
            details: None,
        }),
    )
}

/// Open the store on a blocking worker and run `f` against it
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&HrStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let path = state.database_path.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let store = HrStore::open(&path)?;
        f(&store)
    })
    .await
    .map_err(|e| {
        tracing::error!("store worker panicked: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "internal error".to_string(),
                kind: "internal".to_string(),
                details: None,
            }),
        )
    })?;
    outcome.map_err(|e| api_error(&e))
}

/// The live session behind an `Authorization: Bearer <token>` header
pub struct AuthSession(pub Session);

impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| unauthorized("missing bearer token"))?;

        state
            .sessions
            .authenticate(token)
            .map(AuthSession)
            .ok_or_else(|| unauthorized("session expired or unknown"))
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Session> {
    state
        .sessions
        .login(&request.username, &request.password)
        .map(Json)
        .ok_or_else(|| unauthorized("invalid username or password"))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
) -> StatusCode {
    state.sessions.logout(&session.token);
    StatusCode::NO_CONTENT
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    _session: AuthSession,
    Query(params): Query<DashboardParams>,
) -> ApiResult<DashboardView> {
    let start = params
        .from
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let window = DateWindow::starting(start, params.days.unwrap_or(state.window_days))
        .map_err(|e| api_error(&e))?;

    let view = with_store(&state, move |store| QueryEngine::new(store).dashboard(window)).await?;
    Ok(Json(view))
}

pub async fn list_tables(
    State(state): State<Arc<AppState>>,
    _session: AuthSession,
) -> ApiResult<Vec<String>> {
    let tables = with_store(&state, |store| QueryEngine::new(store).list_tables()).await?;
    Ok(Json(tables))
}

pub async fn get_table(
    State(state): State<Arc<AppState>>,
    _session: AuthSession,
    Path(name): Path<String>,
    Query(params): Query<LimitParams>,
) -> ApiResult<TableData> {
    let limit = params.limit.unwrap_or(state.row_limit);
    let data = with_store(&state, move |store| QueryEngine::new(store).table_rows(&name, limit)).await?;
    Ok(Json(data))
}

pub async fn get_columns(
    State(state): State<Arc<AppState>>,
    _session: AuthSession,
    Path(name): Path<String>,
) -> ApiResult<ColumnsResponse> {
    let response = with_store(&state, move |store| {
        let columns = QueryEngine::new(store).table_columns(&name)?;
        Ok(ColumnsResponse { table: name, columns })
    })
    .await?;
    Ok(Json(response))
}

/// Bulk insert a CSV or JSON body. The format comes from `?format=` or the
/// `Content-Type` header.
pub async fn upload_rows(
    State(state): State<Arc<AppState>>,
    AuthSession(session): AuthSession,
    Path(name): Path<String>,
    Query(params): Query<FormatParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let declared = params.format.or_else(|| {
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
    });
    let format = match declared {
        Some(format) => UploadFormat::from_str(&format).map_err(|e| api_error(&e))?,
        None => {
            return Err(api_error(&Error::Upload(
                "upload format not given; pass ?format=csv|json".to_string(),
            )))
        }
    };

    tracing::info!("{} uploading {} bytes of {} into {}", session.username, body.len(), format.as_str(), name);
    let response = with_store(&state, move |store| {
        let engine = QueryEngine::new(store);
        // Unknown tables are rejected before the body is parsed
        let expected = engine.table_columns(&name)?;
        let rows = upload::parse(format, &body)?;
        let inserted = engine.bulk_insert(&name, &rows, &expected)?;
        Ok(UploadResponse {
            table: name,
            format: format.as_str(),
            inserted,
        })
    })
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    _session: AuthSession,
    Query(params): Query<StatusParams>,
) -> ApiResult<Vec<WorkflowTask>> {
    let tasks = with_store(&state, move |store| {
        QueryEngine::new(store).workflow_tasks(params.status.as_deref())
    })
    .await?;
    Ok(Json(tasks))
}
