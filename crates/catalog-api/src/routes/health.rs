//! `/health`, `/health/ready`.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 준비 상태 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "healthy" | "unhealthy"
    pub status: String,
    pub version: String,
    pub uptime_secs: i64,
    /// RFC 3339
    pub timestamp: String,
    pub store: StoreStatus,
}

/// 저장소 백엔드 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreStatus {
    /// "postgres" | "memory"
    pub backend: String,
    pub reachable: bool,
}

impl StoreStatus {
    async fn probe(state: &AppState) -> Self {
        let backend = if state.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        };

        Self {
            backend: backend.to_string(),
            reachable: state.is_store_healthy().await,
        }
    }
}

/// 프로세스 생존 확인.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "프로세스 응답 가능", body = String)),
    tag = "health"
)]
pub async fn health_check() -> &'static str {
    "OK"
}

/// 저장소까지 포함한 준비 상태 확인.
///
/// 저장소에 닿지 못하면 503을 반환합니다.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "요청 처리 가능", body = HealthResponse),
        (status = 503, description = "저장소 접근 불가", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_ready(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = StoreStatus::probe(&state).await;

    let (code, status) = if store.reachable {
        (StatusCode::OK, "healthy")
    } else {
        tracing::warn!(backend = %store.backend, "Store unreachable, reporting not ready");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: state.version.clone(),
            uptime_secs: state.uptime_secs(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            store,
        }),
    )
}

pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(health_ready))
}
