//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::auth::{self, Caller};
use crate::db;
use crate::errors::{ErrorKind, LedgerError};
use crate::leaders::{self, ClientSpending, DateWindow, ProfessionEarnings};
use crate::transfer;
use crate::types::{Contract, Job, Money, Profile};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the full application router.
pub fn router(state: Arc<ApiState>) -> Router {
    let party_routes = Router::new()
        .route("/contracts/:id", get(get_contract))
        .route("/contracts", get(get_contracts))
        .route("/jobs/unpaid", get(get_unpaid_jobs))
        .route("/jobs/:id/pay", post(pay_for_job))
        .route("/balances/deposit/:user_id", post(deposit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_caller,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/admin/best-profession", get(best_profession))
        .route("/admin/best-clients", get(best_clients))
        .merge(party_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub sum: Money,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
}

/// A report body, or a message explaining that the window was empty.
#[derive(Serialize)]
#[serde(untagged)]
pub enum Report<T> {
    Found(T),
    Empty { message: &'static str },
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::InputData => {
                warn!(error = %self, "Rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        message: self.to_string(),
                    }),
                )
                    .into_response()
            }
            ErrorKind::ServerSide => {
                error!(error = %self, "Unexpected server side error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        message: "Unexpected server side error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /contracts/:id`
///
/// 404 unless the caller is the client or contractor of the contract.
pub async fn get_contract(
    State(state): State<Arc<ApiState>>,
    Caller(caller): Caller,
    Path(id): Path<i64>,
) -> Result<Response, LedgerError> {
    Ok(match db::contract_for_party(&state.pool, id, caller.id).await? {
        Some(contract) => Json(contract).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// `GET /contracts`
///
/// The caller's contracts, excluding terminated ones.
pub async fn get_contracts(
    State(state): State<Arc<ApiState>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<Contract>>, LedgerError> {
    Ok(Json(db::contracts_for_party(&state.pool, caller.id).await?))
}

/// `GET /jobs/unpaid`
pub async fn get_unpaid_jobs(
    State(state): State<Arc<ApiState>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<Job>>, LedgerError> {
    Ok(Json(db::unpaid_jobs_for_party(&state.pool, caller.id).await?))
}

/// `POST /jobs/:id/pay`
pub async fn pay_for_job(
    State(state): State<Arc<ApiState>>,
    Caller(caller): Caller,
    Path(id): Path<i64>,
) -> Result<Json<Job>, LedgerError> {
    // Only the id is passed on; balances are re-read inside the transaction.
    Ok(Json(transfer::settle_job(&state.pool, id, caller.id).await?))
}

/// `POST /balances/deposit/:user_id` with body `{"sum": <amount>}`
pub async fn deposit(
    State(state): State<Arc<ApiState>>,
    Caller(caller): Caller,
    Path(user_id): Path<i64>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> Result<Json<Profile>, LedgerError> {
    let Json(request) = payload.map_err(|e| LedgerError::InvalidInput(e.body_text()))?;
    let contractor =
        transfer::deposit_to_contractor(&state.pool, caller.id, user_id, request.sum).await?;
    Ok(Json(contractor))
}

/// `GET /admin/best-profession?start=..&end=..`
pub async fn best_profession(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report<ProfessionEarnings>>, LedgerError> {
    let window = DateWindow::parse(query.start.as_deref(), query.end.as_deref())?;
    let report = match leaders::best_profession(&state.pool, &window).await? {
        Some(top) => Report::Found(top),
        None => Report::Empty {
            message: "No earnings recorded in sent period",
        },
    };
    Ok(Json(report))
}

/// `GET /admin/best-clients?start=..&end=..&limit=..`
pub async fn best_clients(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report<Vec<ClientSpending>>>, LedgerError> {
    let window = DateWindow::parse(query.start.as_deref(), query.end.as_deref())?;
    let limit = leaders::coerce_limit(query.limit.as_deref());
    let clients = leaders::best_clients(&state.pool, &window, limit).await?;
    let report = if clients.is_empty() {
        Report::Empty {
            message: "No payments recorded in sent period",
        }
    } else {
        Report::Found(clients)
    };
    Ok(Json(report))
}
