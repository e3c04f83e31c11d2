//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용합니다.

pub mod cars;
pub mod users;

pub use cars::{CarChanges, CarRecord, CarRepository, NewCar};
pub use users::{NewUser, UserRecord, UserRepository};

use sqlx::PgPool;

/// 스키마 부트스트랩.
///
/// 서비스 시작 시 필요한 테이블이 없으면 생성합니다.
/// 마이그레이션 도구는 범위 밖이므로 멱등한 DDL만 실행합니다.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cars (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            tags TEXT[] NOT NULL DEFAULT '{}',
            images TEXT[] NOT NULL DEFAULT '{}',
            owner UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_cars_owner ON cars(owner)")
        .execute(pool)
        .await?;

    Ok(())
}

/// UNIQUE 제약 위반 여부 확인.
///
/// PostgreSQL 에러 코드 23505 (unique_violation)를 검사합니다.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
