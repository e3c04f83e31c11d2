//! Axum용 JWT 인증 추출기.
//!
//! 보호된 라우트에서 `Authorization` 헤더의 토큰을 검증하고
//! 요청 사용자 ID를 핸들러에 전달합니다.
//!
//! 원본 API와 동일하게 헤더 값은 스킴 접두사 없는 토큰 문자열 그대로입니다
//! (`Authorization: <token>`, `Bearer` 아님).

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::error::ApiErrorBody;
use crate::state::AppState;

use super::decode_token;

/// JWT 인증 추출기.
///
/// 검증에 성공하면 토큰에 포함된 사용자 ID를 반환합니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthUser(user_id): AuthUser,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// JWT 인증 에러.
///
/// 실패는 항상 해당 요청에 대해 종료적입니다 (재시도 없음).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No token, authorization denied")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            message: self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Authorization 헤더에서 토큰 추출 (스킴 접두사 없음)
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let claims =
            decode_token(token, &state.auth.jwt_secret).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser(claims.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_match_wire_format() {
        // 원본 API와 동일한 리터럴 메시지
        assert_eq!(
            AuthError::MissingToken.to_string(),
            "No token, authorization denied"
        );
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
    }

    #[test]
    fn test_error_responses_are_401() {
        for error in [AuthError::MissingToken, AuthError::InvalidToken] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
