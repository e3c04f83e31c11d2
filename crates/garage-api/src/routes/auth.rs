//! 인증 API 라우트.
//!
//! 회원가입 및 로그인 엔드포인트를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/auth/signup` - 회원가입
//! - `POST /api/auth/login` - 로그인 (JWT 발급)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, issue_token, validate_password_strength, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::repository::{is_unique_violation, NewUser, UserRepository};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 회원가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// 사용자 이름
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// 이메일 (고유)
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// 비밀번호 (응답에 되돌려주지 않음)
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 단순 메시지 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// 로그인 성공 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// 서명된 JWT (1시간 유효)
    pub token: String,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /api/auth/signup - 회원가입
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "사용자 생성됨", body = MessageResponse),
        (status = 400, description = "이메일 중복 또는 잘못된 입력"),
        (status = 500, description = "서버 에러")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::validation(flatten_validation_errors(&e)))?;
    validate_password_strength(&request.password).map_err(ApiError::validation)?;

    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.into()))?;

    let user = UserRepository::create(
        &state.db_pool,
        NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::duplicate("User already exists")
        } else {
            e.into()
        }
    })?;

    info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

/// POST /api/auth/login - 로그인
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "JWT 발급", body = TokenResponse),
        (status = 400, description = "잘못된 자격 증명"),
        (status = 500, description = "서버 에러")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    debug!(email = %request.email, "Login attempt");

    // 존재하지 않는 이메일과 비밀번호 불일치는 구분하지 않고 동일한 응답
    let user = UserRepository::find_by_email(&state.db_pool, &request.email)
        .await?
        .ok_or_else(|| ApiError::validation("Invalid credentials"))?;

    verify_password(&request.password, &user.password_hash)
        .map_err(|_| ApiError::validation("Invalid credentials"))?;

    let token = issue_token(
        user.id,
        &state.auth.jwt_secret,
        state.auth.token_expiry_minutes,
    )
    .map_err(|e| ApiError::Internal(e.into()))?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse { token }))
}

/// 검증 에러를 단일 메시지로 합칩니다.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("Invalid value for {}", field)),
            }
        }
    }
    if messages.is_empty() {
        "Invalid request".to_string()
    } else {
        messages.join(", ")
    }
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            username: "a".to_string(),
            email: "a@x.com".to_string(),
            password: "pw123456".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = SignupRequest {
            username: "a".to_string(),
            email: "not-an-email".to_string(),
            password: "pw123456".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let no_username = SignupRequest {
            username: String::new(),
            email: "a@x.com".to_string(),
            password: "pw123456".to_string(),
        };
        assert!(no_username.validate().is_err());
    }

    #[test]
    fn test_flatten_validation_errors_produces_message() {
        let request = SignupRequest {
            username: String::new(),
            email: "bad".to_string(),
            password: "pw123456".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let message = flatten_validation_errors(&errors);
        assert!(!message.is_empty());
        assert_ne!(message, "Invalid request");
    }
}
