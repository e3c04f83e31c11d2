//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorBody;
use crate::repository::CarRecord;
use crate::routes::{
    ComponentHealth, HealthResponse, LoginRequest, MessageResponse, SignupRequest, TokenResponse,
};

/// Garage API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Garage API",
        description = r#"
# 차량 매물 관리 REST API

사용자 계정과 차량 매물(제목, 설명, 태그, 이미지)을 관리하는 API입니다.

## 인증

`/api/cars` 아래의 모든 엔드포인트는 JWT 인증이 필요합니다.
`Authorization: <token>` 헤더에 토큰 문자열을 그대로 포함하세요
(`Bearer` 스킴 접두사 없음).

## 이미지

매물당 이미지는 최대 10개이며, 수정 시 새 이미지를 제공하면 기존 이미지
집합 전체가 교체됩니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    paths(
        crate::routes::health::health,
        crate::routes::health::readiness,
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::cars::create_car,
        crate::routes::cars::list_cars,
        crate::routes::cars::get_car,
        crate::routes::cars::update_car,
        crate::routes::cars::delete_car,
    ),
    components(schemas(
        ApiErrorBody,
        CarRecord,
        ComponentHealth,
        HealthResponse,
        LoginRequest,
        MessageResponse,
        SignupRequest,
        TokenResponse,
    )),
    tags(
        (name = "auth", description = "회원가입 및 로그인"),
        (name = "cars", description = "차량 매물 관리"),
        (name = "health", description = "헬스 체크"),
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router() -> Router {
    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_includes_all_routes() {
        let spec = ApiDoc::openapi();
        let paths = &spec.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/health/ready"));
        assert!(paths.contains_key("/api/auth/signup"));
        assert!(paths.contains_key("/api/auth/login"));
        assert!(paths.contains_key("/api/cars"));
        assert!(paths.contains_key("/api/cars/{id}"));
    }

    #[test]
    fn test_openapi_spec_serializes() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("Garage API"));
    }
}
