//! JWT 토큰 처리.
//!
//! 토큰 생성/검증 로직. 페이로드는 원본 API와 동일하게 `{userId, exp}`
//! 두 필드만 포함합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `expires_in_minutes` - 만료 시간 (분)
    pub fn new(user_id: Uuid, expires_in_minutes: i64) -> Self {
        Self {
            user_id,
            exp: (Utc::now() + Duration::minutes(expires_in_minutes)).timestamp(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// 토큰 발급.
///
/// # Arguments
///
/// * `user_id` - 사용자 ID
/// * `secret` - 서명 시크릿
/// * `expires_in_minutes` - 만료 시간 (분)
///
/// # Returns
///
/// 인코딩된 JWT 문자열
pub fn issue_token(user_id: Uuid, secret: &str, expires_in_minutes: i64) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, expires_in_minutes);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 서명이 유효하지 않거나, 형식이 잘못되었거나, 만료된 토큰은 거부합니다.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
        _ => JwtError::DecodingError,
    })
}
