//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness / readiness)
//! - `/api/auth` - 회원가입, 로그인
//! - `/api/cars` - 매물 CRUD (JWT 보호)

pub mod auth;
pub mod cars;
pub mod health;

pub use auth::{auth_router, LoginRequest, MessageResponse, SignupRequest, TokenResponse};
pub use cars::{cars_router, ListCarsQuery};
pub use health::{health_router, ComponentHealth, HealthResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
/// `/api/cars` 아래의 모든 핸들러는 [`crate::auth::AuthUser`] 추출기로
/// 보호됩니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API 엔드포인트
        .nest("/api/auth", auth_router())
        .nest("/api/cars", cars_router())
}
