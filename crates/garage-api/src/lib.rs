//! 차량 매물 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (`/api/auth`, `/api/cars`)
//! - JWT 인증
//! - 원격 미디어 호스트 이미지 업로드/삭제
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 비밀번호 해싱
//! - [`repository`]: 데이터베이스 접근 계층
//! - [`media`]: 미디어 호스트 클라이언트
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod media;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{hash_password, verify_password, AuthUser, Claims};
pub use error::{ApiError, ApiResult};
pub use media::{DeleteOutcome, MediaClient, UploadFile};
pub use routes::create_api_router;
pub use state::AppState;
