//! User Repository
//!
//! 사용자 계정 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 레코드.
///
/// `password_hash`는 응답에 직렬화되지 않습니다. 이 타입은 저장소 계층
/// 내부용이며 API 응답 스키마는 routes 모듈에 별도로 정의합니다.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 새 사용자 입력.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// argon2 PHC 해시 (평문 아님)
    pub password_hash: String,
}

// ================================================================================================
// Repository
// ================================================================================================

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// 사용자 생성.
    ///
    /// 이메일 고유성은 UNIQUE 제약으로 보장됩니다. 중복 시
    /// unique_violation(23505) 에러가 반환되며 호출자가 400으로 매핑합니다.
    pub async fn create(pool: &PgPool, input: NewUser) -> Result<UserRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// 이메일로 사용자 조회.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }
}
