//! 차량 매물 API 라우트.
//!
//! 매물 CRUD 및 이미지 업로드를 제공합니다. 모든 엔드포인트는 JWT 인증이
//! 필요하며, 항상 요청 사용자 소유의 매물로만 접근이 제한됩니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/cars` - 매물 생성 (multipart, 이미지 최대 10개)
//! - `GET /api/cars` - 내 매물 목록 (`q` 검색어 선택)
//! - `GET /api/cars/{id}` - 매물 상세
//! - `PUT /api/cars/{id}` - 매물 수정 (multipart, 이미지 전체 교체)
//! - `DELETE /api/cars/{id}` - 매물 삭제

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRequestParts, Multipart, Path, Query, State},
    http::{request::Parts, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use utoipa::IntoParams;
use uuid::Uuid;

use garage_core::domain::{
    exceeds_image_limit, parse_tags, TOO_MANY_IMAGES_ON_CREATE, TOO_MANY_IMAGES_ON_UPDATE,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::media::UploadFile;
use crate::repository::{CarChanges, CarRecord, CarRepository, NewCar};
use crate::routes::auth::MessageResponse;
use crate::state::AppState;

// ================================================================================================
// Request Types
// ================================================================================================

/// 목록 조회 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCarsQuery {
    /// 자유 텍스트 검색어 (제목/설명/태그 부분 문자열, 대소문자 무시)
    pub q: Option<String>,
}

/// 경로의 매물 ID 추출기.
///
/// `Path<Uuid>`의 기본 거부 응답은 평문이므로, 잘못된 ID도 다른 에러와
/// 동일한 `{"message": ...}` 본문으로 400을 반환하도록 감쌉니다.
#[derive(Debug, Clone, Copy)]
pub struct CarId(pub Uuid);

impl<S> FromRequestParts<S> for CarId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::validation("Invalid car id"))?;

        Ok(CarId(id))
    }
}

/// multipart 본문에서 파싱된 매물 폼.
///
/// 생성과 수정이 같은 폼 구조를 공유합니다. 수정 시 비어 있는 텍스트 필드는
/// "값 없음"으로 해석되어 기존 값이 유지됩니다 (원본 API의 동작 유지).
#[derive(Debug, Default)]
struct CarForm {
    title: Option<String>,
    description: Option<String>,
    /// 쉼표로 구분된 태그 문자열 (파싱 전)
    tags: Option<String>,
    images: Vec<UploadFile>,
}

impl CarForm {
    /// multipart 본문 파싱.
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| ApiError::validation("Invalid multipart form data"))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "title" => {
                    form.title = Some(read_text(field).await?);
                }
                "description" => {
                    form.description = Some(read_text(field).await?);
                }
                "tags" => {
                    form.tags = Some(read_text(field).await?);
                }
                "images" => {
                    let file_name = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| "upload".to_string());
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| ApiError::validation("Invalid multipart form data"))?;

                    form.images.push(UploadFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                // 알 수 없는 필드는 무시
                _ => {}
            }
        }

        Ok(form)
    }

    /// 비어 있지 않은 제목 반환.
    fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|s| !s.is_empty())
    }

    /// 비어 있지 않은 설명 반환.
    fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|s| !s.is_empty())
    }

    /// 비어 있지 않은 태그 문자열 반환.
    fn tags(&self) -> Option<&str> {
        self.tags.as_deref().filter(|s| !s.is_empty())
    }

    /// 기존 레코드 위에 폼을 적용하여 최종 변경값을 계산합니다.
    ///
    /// 누락되거나 비어 있는 텍스트 필드는 기존 값을 유지합니다.
    /// `new_images`가 `None`이면 기존 이미지 집합이 그대로 유지되고,
    /// `Some`이면 전체가 교체됩니다.
    fn apply_to(&self, car: CarRecord, new_images: Option<Vec<String>>) -> CarChanges {
        CarChanges {
            title: self.title().map(str::to_string).unwrap_or(car.title),
            description: self
                .description()
                .map(str::to_string)
                .unwrap_or(car.description),
            tags: match self.tags() {
                Some(raw) => parse_tags(Some(raw)),
                None => car.tags,
            },
            images: new_images.unwrap_or(car.images),
        }
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|_| ApiError::validation("Invalid multipart form data"))
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /api/cars - 매물 생성
///
/// 이미지 개수 검증은 업로드 전에 수행합니다. 원본 API는 업로드 후에
/// 검증하여 원격 저장소에 고아 파일을 남겼는데, 이는 의도된 동작으로 보기
/// 어려워 순서를 바로잡았습니다. 에러 메시지는 그대로 유지합니다.
#[utoipa::path(
    post,
    path = "/api/cars",
    responses(
        (status = 201, description = "매물 생성됨", body = CarRecord),
        (status = 400, description = "필수 필드 누락 또는 이미지 10개 초과"),
        (status = 401, description = "인증 실패"),
        (status = 500, description = "서버 에러")
    ),
    tag = "cars"
)]
pub async fn create_car(
    State(state): State<Arc<AppState>>,
    AuthUser(owner): AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<CarRecord>)> {
    let form = CarForm::from_multipart(multipart).await?;

    let title = form
        .title()
        .ok_or_else(|| ApiError::validation("Title and description are required"))?
        .to_string();
    let description = form
        .description()
        .ok_or_else(|| ApiError::validation("Title and description are required"))?
        .to_string();

    if exceeds_image_limit(form.images.len()) {
        return Err(ApiError::validation(TOO_MANY_IMAGES_ON_CREATE));
    }

    let tags = parse_tags(form.tags());

    let images = if form.images.is_empty() {
        Vec::new()
    } else {
        state.media.upload(form.images).await?
    };

    let car = CarRepository::insert(
        &state.db_pool,
        NewCar {
            title,
            description,
            tags,
            images,
            owner,
        },
    )
    .await?;

    info!(car_id = %car.id, %owner, image_count = car.images.len(), "Car created");

    Ok((StatusCode::CREATED, Json(car)))
}

/// GET /api/cars - 내 매물 목록 조회
#[utoipa::path(
    get,
    path = "/api/cars",
    params(ListCarsQuery),
    responses(
        (status = 200, description = "매물 목록", body = [CarRecord]),
        (status = 401, description = "인증 실패"),
        (status = 500, description = "서버 에러")
    ),
    tag = "cars"
)]
pub async fn list_cars(
    State(state): State<Arc<AppState>>,
    AuthUser(owner): AuthUser,
    Query(query): Query<ListCarsQuery>,
) -> ApiResult<Json<Vec<CarRecord>>> {
    debug!(%owner, q = ?query.q, "Listing cars");

    let cars = CarRepository::find_by_owner(&state.db_pool, owner, query.q.as_deref()).await?;

    Ok(Json(cars))
}

/// GET /api/cars/{id} - 매물 상세 조회
#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    params(("id" = Uuid, Path, description = "매물 ID")),
    responses(
        (status = 200, description = "매물 상세", body = CarRecord),
        (status = 400, description = "잘못된 매물 ID"),
        (status = 401, description = "인증 실패 또는 소유자 아님"),
        (status = 404, description = "매물 없음"),
        (status = 500, description = "서버 에러")
    ),
    tag = "cars"
)]
pub async fn get_car(
    State(state): State<Arc<AppState>>,
    AuthUser(requester): AuthUser,
    CarId(id): CarId,
) -> ApiResult<Json<CarRecord>> {
    let car = find_owned_car(&state, id, requester).await?;
    Ok(Json(car))
}

/// PUT /api/cars/{id} - 매물 수정
///
/// 본문에서 누락되거나 비어 있는 필드는 기존 값을 유지합니다 (원본 API의
/// 부분 업데이트 의미 유지). 새 이미지가 제공되면 기존 이미지 집합 전체가
/// 교체되며, 기존 원격 이미지는 레코드 저장 후 best-effort로 삭제됩니다.
/// 새 이미지 업로드가 실패하면 기존 집합은 그대로 남습니다.
#[utoipa::path(
    put,
    path = "/api/cars/{id}",
    params(("id" = Uuid, Path, description = "매물 ID")),
    responses(
        (status = 200, description = "수정된 매물", body = CarRecord),
        (status = 400, description = "이미지 10개 초과"),
        (status = 401, description = "인증 실패 또는 소유자 아님"),
        (status = 404, description = "매물 없음"),
        (status = 500, description = "서버 에러")
    ),
    tag = "cars"
)]
pub async fn update_car(
    State(state): State<Arc<AppState>>,
    AuthUser(requester): AuthUser,
    CarId(id): CarId,
    multipart: Multipart,
) -> ApiResult<Json<CarRecord>> {
    let car = find_owned_car(&state, id, requester).await?;
    let mut form = CarForm::from_multipart(multipart).await?;
    let old_images = car.images.clone();

    // 새 이미지가 있으면 기존 집합 전체 교체, 없으면 그대로 유지
    let replacing_images = !form.images.is_empty();
    let new_images = if replacing_images {
        if exceeds_image_limit(form.images.len()) {
            return Err(ApiError::validation(TOO_MANY_IMAGES_ON_UPDATE));
        }
        Some(state.media.upload(std::mem::take(&mut form.images)).await?)
    } else {
        None
    };

    let changes = form.apply_to(car, new_images);

    let updated = CarRepository::update(&state.db_pool, id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;

    // 교체된 기존 원격 이미지 정리 (best-effort, 실패해도 요청은 성공)
    if replacing_images {
        cleanup_remote_images(&state, &old_images).await;
    }

    info!(car_id = %id, %requester, replaced_images = replacing_images, "Car updated");

    Ok(Json(updated))
}

/// DELETE /api/cars/{id} - 매물 삭제
#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    params(("id" = Uuid, Path, description = "매물 ID")),
    responses(
        (status = 200, description = "삭제 확인 메시지", body = MessageResponse),
        (status = 400, description = "잘못된 매물 ID"),
        (status = 401, description = "인증 실패 또는 소유자 아님"),
        (status = 404, description = "매물 없음"),
        (status = 500, description = "서버 에러")
    ),
    tag = "cars"
)]
pub async fn delete_car(
    State(state): State<Arc<AppState>>,
    AuthUser(requester): AuthUser,
    CarId(id): CarId,
) -> ApiResult<Json<MessageResponse>> {
    let car = find_owned_car(&state, id, requester).await?;

    // 연관 원격 이미지 정리 (best-effort)
    cleanup_remote_images(&state, &car.images).await;

    let deleted = CarRepository::delete(&state.db_pool, id).await?;
    if !deleted {
        return Err(ApiError::not_found("Car not found"));
    }

    info!(car_id = %id, %requester, "Car removed");

    Ok(Json(MessageResponse {
        message: "Car removed".to_string(),
    }))
}

// ================================================================================================
// Helpers
// ================================================================================================

/// 존재 및 소유권 검사를 거쳐 매물을 조회합니다.
///
/// 매물이 없으면 404, 요청자가 소유자가 아니면 401을 반환합니다
/// (403이 아닌 401은 원본 API와의 와이어 호환).
async fn find_owned_car(
    state: &AppState,
    id: Uuid,
    requester: Uuid,
) -> Result<CarRecord, ApiError> {
    let car = CarRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Car not found"))?;

    ensure_owner(&car, requester)?;

    Ok(car)
}

/// 소유권 검사.
///
/// 요청자가 소유자가 아니면 매물 내용을 노출하지 않고 401로 거부합니다.
fn ensure_owner(car: &CarRecord, requester: Uuid) -> Result<(), ApiError> {
    if car.owner != requester {
        return Err(ApiError::NotAuthorized);
    }

    Ok(())
}

/// 원격 이미지 best-effort 일괄 삭제.
///
/// 항목별 결과를 로그로만 남기고 호출자에게 실패를 전파하지 않습니다.
async fn cleanup_remote_images(state: &AppState, urls: &[String]) {
    if urls.is_empty() {
        return;
    }

    let outcomes = state.media.delete_batch(urls).await;
    for outcome in outcomes {
        if let Err(error) = outcome.result {
            warn!(url = %outcome.url, %error, "Failed to delete remote image");
        }
    }
}

/// 매물 라우터 생성.
pub fn cars_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_car).get(list_cars))
        .route(
            "/{id}",
            get(get_car).put(update_car).delete(delete_car),
        )
        // 이미지 최대 10개를 수용할 수 있도록 본문 크기 제한 완화
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use tower::ServiceExt;

    use crate::auth::issue_token;
    use crate::error::ApiErrorBody;
    use crate::state::create_test_state;

    fn form(title: Option<&str>, description: Option<&str>, tags: Option<&str>) -> CarForm {
        CarForm {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            tags: tags.map(str::to_string),
            images: Vec::new(),
        }
    }

    fn car(owner: Uuid) -> CarRecord {
        CarRecord {
            id: Uuid::new_v4(),
            title: "Civic".to_string(),
            description: "clean".to_string(),
            tags: vec!["sedan".to_string()],
            images: vec!["https://m.test/car-images/a.jpg".to_string()],
            owner,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_fields_treated_as_absent() {
        // 빈 문자열은 "값 없음"으로 해석 (원본 API의 부분 업데이트 의미)
        let form = form(Some(""), Some(""), Some(""));
        assert!(form.title().is_none());
        assert!(form.description().is_none());
        assert!(form.tags().is_none());
    }

    #[test]
    fn test_present_fields_returned() {
        let form = form(Some("Civic"), Some("clean"), Some("sedan,red"));
        assert_eq!(form.title(), Some("Civic"));
        assert_eq!(form.description(), Some("clean"));
        assert_eq!(form.tags(), Some("sedan,red"));
    }

    #[test]
    fn test_error_messages_match_wire_format() {
        assert_eq!(TOO_MANY_IMAGES_ON_CREATE, "Cannot upload more than 10 images");
        assert_eq!(TOO_MANY_IMAGES_ON_UPDATE, "Cannot have more than 10 images");
    }

    #[test]
    fn test_update_without_images_keeps_existing_set() {
        let existing = car(Uuid::new_v4());
        let images_before = existing.images.clone();

        // images 필드가 없는 수정 요청: 기존 이미지 집합이 그대로 유지됨
        let changes = form(Some("New title"), None, None).apply_to(existing, None);

        assert_eq!(changes.images, images_before);
        assert_eq!(changes.title, "New title");
        assert_eq!(changes.description, "clean");
        assert_eq!(changes.tags, vec!["sedan"]);
    }

    #[test]
    fn test_update_replaces_image_set_wholesale() {
        let existing = car(Uuid::new_v4());
        let new_images = vec!["https://m.test/car-images/new.jpg".to_string()];

        let changes = form(None, None, None).apply_to(existing, Some(new_images.clone()));

        assert_eq!(changes.images, new_images);
    }

    #[test]
    fn test_update_empty_fields_keep_previous_values() {
        let existing = car(Uuid::new_v4());

        // 빈 문자열 필드도 "값 없음"으로 처리되어 기존 값 유지
        let changes = form(Some(""), Some(""), Some("")).apply_to(existing, None);

        assert_eq!(changes.title, "Civic");
        assert_eq!(changes.description, "clean");
        assert_eq!(changes.tags, vec!["sedan"]);
    }

    #[test]
    fn test_update_tags_reparsed_when_provided() {
        let existing = car(Uuid::new_v4());

        let changes = form(None, None, Some(" suv , red ")).apply_to(existing, None);

        assert_eq!(changes.tags, vec!["suv", "red"]);
    }

    #[test]
    fn test_non_owner_rejected_without_leaking_content() {
        let existing = car(Uuid::new_v4());

        let err = ensure_owner(&existing, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        // 응답 메시지에 매물 내용이 포함되지 않음
        let message = err.to_string();
        assert_eq!(message, "Not authorized");
        assert!(!message.contains("Civic"));
        assert!(!message.contains("clean"));
    }

    #[test]
    fn test_owner_passes_ownership_check() {
        let owner = Uuid::new_v4();
        let existing = car(owner);

        assert!(ensure_owner(&existing, owner).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_car_id_rejected_with_json_400() {
        let state = Arc::new(create_test_state());
        let token = issue_token(Uuid::new_v4(), &state.auth.jwt_secret, 60).unwrap();
        let app = Router::new()
            .nest("/api/cars", cars_router())
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cars/not-a-uuid")
                    .header("Authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // 다른 에러 경로와 동일한 {"message": ...} 본문
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ApiErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.message, "Invalid car id");
    }

    #[tokio::test]
    async fn test_missing_token_rejected_before_id_parsing() {
        let state = Arc::new(create_test_state());
        let app = Router::new()
            .nest("/api/cars", cars_router())
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/cars/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ApiErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.message, "No token, authorization denied");
    }
}
