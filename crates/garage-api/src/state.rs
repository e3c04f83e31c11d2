//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use garage_core::config::AuthConfig;
use sqlx::PgPool;

use crate::media::MediaClient;

/// 애플리케이션 공유 상태.
///
/// 이 구조체는 모든 API 핸들러에서 접근할 수 있는 공유 리소스를 포함합니다.
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 (PostgreSQL)
    pub db_pool: PgPool,

    /// 미디어 호스트 클라이언트 (이미지 업로드/삭제)
    pub media: Arc<MediaClient>,

    /// 인증 설정 (JWT 시크릿, 만료 시간)
    ///
    /// 프로세스 시작 시 한 번 로드된 불변 설정입니다. 전역 상태를 두지 않고
    /// 명시적으로 전달합니다.
    pub auth: AuthConfig,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(db_pool: PgPool, media: MediaClient, auth: AuthConfig) -> Self {
        Self {
            db_pool,
            media: Arc::new(media),
            auth,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.db_pool).await.is_ok()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 라우터/추출기를 테스트할 수 있는 최소한의 상태를
/// 생성합니다. 연결 풀은 lazy로 생성되어 쿼리 전까지 네트워크에
/// 접근하지 않습니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use garage_core::config::MediaConfig;
    use sqlx::postgres::PgPoolOptions;

    let db_pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/garage_test")
        .expect("Failed to create lazy test pool");

    let media = MediaClient::new(MediaConfig::default()).expect("Failed to create test MediaClient");

    let auth = AuthConfig {
        jwt_secret: "test-secret-key-for-jwt-testing-minimum-32-chars".to_string(),
        token_expiry_minutes: 60,
    };

    AppState::new(db_pool, media, auth)
}
