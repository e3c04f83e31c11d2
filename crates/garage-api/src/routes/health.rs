//! 헬스 체크 endpoint.
//!
//! 서버 상태 확인을 위한 헬스 체크 엔드포인트를 제공합니다.
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// 데이터베이스 연결 상태 ("up" | "down")
    pub database: String,
}

/// GET /health - liveness 체크
///
/// 프로세스가 살아있는지만 확인합니다. 의존 서비스는 검사하지 않습니다.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "서버 동작 중")),
    tag = "health"
)]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /health/ready - readiness 체크
///
/// 데이터베이스 연결을 포함한 상세 상태를 반환합니다.
/// DB가 내려가 있으면 503을 반환합니다.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "서비스 준비됨", body = HealthResponse),
        (status = 503, description = "의존 서비스 연결 불가", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn readiness(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_healthy = state.is_db_healthy().await;

    let response = HealthResponse {
        status: if db_healthy { "healthy" } else { "degraded" }.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth {
            database: if db_healthy { "up" } else { "down" }.to_string(),
        },
    };

    let status = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health))
        .route("/ready", get(readiness))
}
