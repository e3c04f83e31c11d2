//! # Garage Core
//!
//! 차량 매물 관리 서비스의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 서비스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 매물(차량) 도메인 규칙 (태그 파싱, 이미지 개수 제한)
//! - 설정 관리
//! - 에러 타입
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
