//! 인증.
//!
//! JWT 기반 인증 및 argon2 비밀번호 해싱을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체 (`{userId, exp}`)
//! - [`AuthUser`]: 보호된 라우트용 JWT 검증 추출기
//! - 토큰 생성/검증 및 비밀번호 해싱 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 보호된 라우트에서 AuthUser 추출기 사용
//! async fn protected_handler(
//!     AuthUser(user_id): AuthUser,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", user_id)
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{decode_token, issue_token, Claims, JwtError};
pub use middleware::{AuthError, AuthUser};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
