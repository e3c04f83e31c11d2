//! 서비스 공통 에러 타입.
//!
//! 이 모듈은 서비스 전반에서 사용되는 에러 분류를 정의합니다.
//! HTTP 응답으로의 변환은 API 크레이트에서 담당합니다.

use thiserror::Error;

/// 핵심 서비스 에러.
#[derive(Debug, Error)]
pub enum GarageError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 입력 검증 실패 (400)
    #[error("{0}")]
    Validation(String),

    /// 중복 리소스 (400, 이메일 충돌)
    #[error("{0}")]
    Duplicate(String),

    /// 인증 실패 (401, 토큰 누락/무효/만료)
    #[error("{0}")]
    Authentication(String),

    /// 권한 없음 (401, 소유자 불일치)
    #[error("Not authorized")]
    NotAuthorized,

    /// 리소스 없음 (404)
    #[error("{0}")]
    NotFound(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 미디어 호스트 에러
    #[error("미디어 호스트 에러: {0}")]
    Media(String),

    /// 예기치 못한 내부 에러 (500)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl GarageError {
    /// 클라이언트에 노출 가능한 에러인지 여부.
    ///
    /// 노출 불가능한 에러는 로그에만 남기고 일반 메시지로 대체합니다.
    pub fn is_client_safe(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Duplicate(_)
                | Self::Authentication(_)
                | Self::NotAuthorized
                | Self::NotFound(_)
        )
    }
}

/// 서비스 공통 Result 타입.
pub type GarageResult<T> = Result<T, GarageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_safe_classification() {
        assert!(GarageError::Validation("bad input".into()).is_client_safe());
        assert!(GarageError::Duplicate("User already exists".into()).is_client_safe());
        assert!(GarageError::NotAuthorized.is_client_safe());
        assert!(GarageError::NotFound("Car not found".into()).is_client_safe());

        assert!(!GarageError::Database("connection refused".into()).is_client_safe());
        assert!(!GarageError::Media("timeout".into()).is_client_safe());
        assert!(!GarageError::Internal("panic".into()).is_client_safe());
    }

    #[test]
    fn test_display_passthrough() {
        let err = GarageError::NotFound("Car not found".to_string());
        assert_eq!(err.to_string(), "Car not found");

        let err = GarageError::NotAuthorized;
        assert_eq!(err.to_string(), "Not authorized");
    }
}
