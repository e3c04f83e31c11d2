//! Car Repository
//!
//! 차량 매물 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, Utc};
use garage_core::domain::escape_like_pattern;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 차량 매물 레코드.
///
/// 원본 API와의 와이어 호환을 위해 camelCase로 직렬화합니다
/// (`createdAt`, `owner` 등).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// 태그 목록 (입력 순서 보존)
    pub tags: Vec<String>,
    /// 이미지 참조 URL 목록 (업로드 순서 보존, 최대 10개)
    pub images: Vec<String>,
    /// 소유자 사용자 ID (생성 후 불변)
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

/// 새 매물 입력.
#[derive(Debug, Clone)]
pub struct NewCar {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub owner: Uuid,
}

/// 매물 수정 입력.
///
/// 부분 업데이트 해석(누락/빈 필드는 기존 값 유지)은 핸들러에서 끝나고,
/// 저장소에는 항상 확정된 최종 값이 전달됩니다.
#[derive(Debug, Clone)]
pub struct CarChanges {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Car Repository
pub struct CarRepository;

impl CarRepository {
    /// 매물 생성.
    pub async fn insert(pool: &PgPool, input: NewCar) -> Result<CarRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, CarRecord>(
            r#"
            INSERT INTO cars (title, description, tags, images, owner)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.tags)
        .bind(&input.images)
        .bind(input.owner)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// 소유자의 매물 목록 조회.
    ///
    /// `keyword`가 있으면 제목/설명/태그에 대해 대소문자 무시
    /// 부분 문자열 매칭(unanchored)을 수행합니다. 항상 요청 사용자의
    /// 매물로 범위가 제한됩니다.
    pub async fn find_by_owner(
        pool: &PgPool,
        owner: Uuid,
        keyword: Option<&str>,
    ) -> Result<Vec<CarRecord>, sqlx::Error> {
        let records = match keyword {
            Some(q) if !q.is_empty() => {
                let pattern = format!("%{}%", escape_like_pattern(q));
                sqlx::query_as::<_, CarRecord>(
                    r#"
                    SELECT * FROM cars
                    WHERE owner = $1
                      AND (
                        title ILIKE $2 ESCAPE '\'
                        OR description ILIKE $2 ESCAPE '\'
                        OR EXISTS (
                            SELECT 1 FROM unnest(tags) AS tag
                            WHERE tag ILIKE $2 ESCAPE '\'
                        )
                      )
                    ORDER BY created_at
                    "#,
                )
                .bind(owner)
                .bind(pattern)
                .fetch_all(pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, CarRecord>(
                    "SELECT * FROM cars WHERE owner = $1 ORDER BY created_at",
                )
                .bind(owner)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(records)
    }

    /// ID로 매물 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CarRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, CarRecord>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// 매물 수정.
    ///
    /// 소유자(owner)와 생성 시각은 변경되지 않습니다.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: CarChanges,
    ) -> Result<Option<CarRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, CarRecord>(
            r#"
            UPDATE cars
            SET title = $2, description = $3, tags = $4, images = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.tags)
        .bind(&changes.images)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// 매물 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_record_serializes_camel_case() {
        let record = CarRecord {
            id: Uuid::new_v4(),
            title: "Civic".to_string(),
            description: "clean".to_string(),
            tags: vec![],
            images: vec![],
            owner: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();

        assert!(object.contains_key("createdAt"));
        assert!(object.contains_key("owner"));
        assert!(!object.contains_key("created_at"));
    }

    #[test]
    fn test_empty_collections_serialize_as_arrays() {
        let record = CarRecord {
            id: Uuid::new_v4(),
            title: "Civic".to_string(),
            description: "clean".to_string(),
            tags: vec![],
            images: vec![],
            owner: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tags"], serde_json::json!([]));
        assert_eq!(json["images"], serde_json::json!([]));
    }
}
