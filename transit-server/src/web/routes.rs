//! HTTP route handlers.

use std::path::Path;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::direct::{DEFAULT_RADIUS_M, DirectRoute, InvalidInput, plan_direct_route};
use crate::mbta::{summarize_alerts, summarize_predictions};
use crate::planner::TripPlan;
use crate::remote::{FetchError, Transport};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// When `static_dir` is given its contents are served under `/static`.
pub fn create_router<T: Transport + 'static>(
    state: AppState<T>,
    static_dir: Option<&Path>,
) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/normalize", get(normalize::<T>))
        .route("/plan", get(plan::<T>))
        .route("/route-between-stops", get(route_between_stops::<T>))
        .route("/plan-direct", get(plan_direct))
        .route("/alerts", get(alerts::<T>))
        .route("/routes", get(routes::<T>))
        .route("/stops", get(stops::<T>))
        .route("/predictions", get(predictions::<T>))
        .fallback(not_found);

    let router = match static_dir {
        Some(dir) => router.nest_service("/static", ServeDir::new(dir)),
        None => router,
    };

    router.with_state(state)
}

/// Health check endpoint.
async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Resolve a free-text stop name.
async fn normalize<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<NormalizeRequest>,
) -> Json<NormalizeResponse> {
    let normalized = state.planner.normalize(&req.name);
    Json(NormalizeResponse {
        ok: true,
        input: req.name,
        normalized,
    })
}

/// Plan between two stops, with rider-facing text.
async fn plan<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<PlanRequest>,
) -> Json<TripPlan> {
    Json(state.planner.plan(&req.origin, &req.destination))
}

/// Legs between two stops.
async fn route_between_stops<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<PlanRequest>,
) -> Json<RouteResponse> {
    Json(state.planner.plan(&req.origin, &req.destination).into())
}

/// Direct walk between two coordinates.
async fn plan_direct(Query(req): Query<PlanDirectRequest>) -> Result<Json<DirectRoute>, AppError> {
    let route = plan_direct_route(
        parse_coordinate(req.origin_lat.as_deref()),
        parse_coordinate(req.origin_lng.as_deref()),
        parse_coordinate(req.dest_lat.as_deref()),
        parse_coordinate(req.dest_lng.as_deref()),
        req.radius_m.unwrap_or(DEFAULT_RADIUS_M),
    )?;
    Ok(Json(route))
}

/// Current service alerts with a ranked summary.
async fn alerts<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<AlertsRequest>,
) -> Result<Json<AlertsResponse>, AppError> {
    let data = state
        .mbta
        .alerts(req.route.as_deref(), req.active_only.unwrap_or(true))
        .await?;
    let summary = summarize_alerts(&data);
    Ok(Json(AlertsResponse::new(req.route, summary, data)))
}

/// Subway routes.
async fn routes<T: Transport>(
    State(state): State<AppState<T>>,
) -> Result<Json<DataResponse>, AppError> {
    let data = state.mbta.routes().await?;
    Ok(Json(DataResponse { ok: true, data }))
}

/// Subway stops matching a name.
async fn stops<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Json<DataResponse>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "name must not be empty".to_string(),
        });
    }
    let data = state.mbta.find_stops(&req.name).await?;
    Ok(Json(DataResponse { ok: true, data }))
}

/// Upcoming arrivals at a stop, with a minutes-away summary.
async fn predictions<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<PredictionsRequest>,
) -> Result<Json<PredictionsResponse>, AppError> {
    let data = state
        .mbta
        .predictions(&req.stop, req.route.as_deref())
        .await?;
    let text = summarize_predictions(&data, &req.stop, Utc::now());
    Ok(Json(PredictionsResponse {
        ok: true,
        stop: req.stop,
        text,
        data,
    }))
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "no such endpoint".to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<InvalidInput> for AppError {
    fn from(e: InvalidInput) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e.root() {
            FetchError::Config(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse {
            ok: false,
            error: message,
        });
        (status, body).into_response()
    }
}
