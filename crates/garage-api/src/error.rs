//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 응답 본문은 원본 와이어 포맷인 `{"message": "..."}` 형태를 유지합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use garage_core::error::GarageError;

/// API 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "message": "Car not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorBody {
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

/// API 핸들러 에러.
///
/// 각 변형은 HTTP 상태 코드에 그대로 대응합니다. 소유자 불일치는
/// 원본 API와의 와이어 호환을 위해 403이 아닌 401을 반환합니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 잘못된 입력 또는 제한 초과 (400)
    #[error("{0}")]
    Validation(String),

    /// 이메일 중복 (400)
    #[error("{0}")]
    Duplicate(String),

    /// 토큰 누락/무효/만료 (401)
    #[error("{0}")]
    Authentication(String),

    /// 소유자 불일치 (401)
    #[error("Not authorized")]
    NotAuthorized,

    /// 리소스 없음 (404)
    #[error("{0}")]
    NotFound(String),

    /// 예기치 못한 내부 실패 (500, 상세는 로그에만 남김)
    #[error("Server Error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// 400 검증 에러 생성.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 400 중복 에러 생성.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    /// 401 인증 에러 생성.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// 404 에러 생성.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// 응답 상태 코드 반환.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Duplicate(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) | Self::NotAuthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 내부 에러는 상세를 로그에만 남기고 일반 메시지를 반환
        if let Self::Internal(ref source) = self {
            error!(error = ?source, "Unhandled internal error");
        }

        let body = Json(ApiErrorBody {
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl From<GarageError> for ApiError {
    fn from(err: GarageError) -> Self {
        match err {
            GarageError::Validation(msg) => Self::Validation(msg),
            GarageError::Duplicate(msg) => Self::Duplicate(msg),
            GarageError::Authentication(msg) => Self::Authentication(msg),
            GarageError::NotAuthorized => Self::NotAuthorized,
            GarageError::NotFound(msg) => Self::NotFound(msg),
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
