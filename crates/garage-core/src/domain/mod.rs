//! 도메인 규칙.
//!
//! 저장소나 HTTP 계층과 무관한 매물 도메인 규칙을 정의합니다.

pub mod car;

pub use car::*;
