//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//!
//! 설정은 프로세스 시작 시 한 번 로드되어 불변 구조체로 전달됩니다.
//! 전역 가변 상태를 사용하지 않습니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 기본 JWT 시크릿.
///
/// `GARAGE__AUTH__JWT_SECRET`이 설정되지 않은 경우에만 사용됩니다.
/// 프로덕션에서는 반드시 교체해야 합니다 (시작 시 경고 로그 출력).
pub const INSECURE_DEFAULT_JWT_SECRET: &str = "secret";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 미디어 호스트 설정
    #[serde(default)]
    pub media: MediaConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            media: MediaConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 문자열
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/garage".to_string(),
            max_connections: 10,
            connection_timeout_secs: 30,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT 서명 시크릿
    pub jwt_secret: String,
    /// 토큰 만료 시간 (분)
    pub token_expiry_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: INSECURE_DEFAULT_JWT_SECRET.to_string(),
            token_expiry_minutes: 60,
        }
    }
}

impl AuthConfig {
    /// 기본(안전하지 않은) 시크릿 사용 여부.
    pub fn uses_insecure_default(&self) -> bool {
        self.jwt_secret == INSECURE_DEFAULT_JWT_SECRET
    }
}

/// 미디어 호스트 설정.
///
/// 이미지 업로드/삭제를 담당하는 원격 미디어 호스트 접속 정보입니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// 미디어 호스트 베이스 URL (예: `https://media.example.com/v1`)
    pub base_url: String,
    /// API 키
    #[serde(default)]
    pub api_key: String,
    /// 업로드 대상 논리 폴더
    pub folder: String,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            api_key: String::new(),
            folder: "car-images".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 우선순위: 기본값 < 설정 파일 < `GARAGE__` 환경 변수.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "postgres://localhost:5432/garage")?
            .set_default("database.max_connections", 10)?
            .set_default("database.connection_timeout_secs", 30)?
            .set_default("auth.jwt_secret", INSECURE_DEFAULT_JWT_SECRET)?
            .set_default("auth.token_expiry_minutes", 60)?
            .set_default("media.base_url", "http://localhost:9000")?
            .set_default("media.api_key", "")?
            .set_default("media.folder", "car-images")?
            .set_default("media.request_timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드 (없으면 건너뜀)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("GARAGE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_expiry_minutes, 60);
        assert_eq!(config.media.folder, "car-images");
        assert!(config.auth.uses_insecure_default());
    }

    #[test]
    fn test_load_without_file() {
        // 파일이 없어도 기본값으로 로드되어야 함
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_insecure_default_detection() {
        let mut config = AppConfig::default();
        assert!(config.auth.uses_insecure_default());

        config.auth.jwt_secret = "a-real-secret-loaded-from-env".to_string();
        assert!(!config.auth.uses_insecure_default());
    }
}
