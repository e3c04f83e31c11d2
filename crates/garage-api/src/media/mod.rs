//! 미디어 호스트 클라이언트.
//!
//! 이미지 바이너리를 원격 미디어 호스트에 업로드하고 안정적인 참조 URL을
//! 돌려받습니다. 삭제는 참조 URL에서 원격 저장 식별자를 유도하여 수행합니다.
//!
//! # 계약
//!
//! - `upload`: 입력 순서를 보존하는 URL 목록 반환. 실패 시 에러 전파.
//! - `delete_batch`: best-effort 일괄 삭제. 항목별 결과를 반환하며
//!   실패를 호출자에게 던지지 않습니다 (호출자는 로그만 남김).

use futures::future::join_all;
use garage_core::config::MediaConfig;
use garage_core::error::GarageError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// 업로드할 단일 파일.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// 원본 파일명 (확장자 포함)
    pub file_name: String,
    /// MIME 타입 (알 수 없으면 None)
    pub content_type: Option<String>,
    /// 파일 내용
    pub bytes: Vec<u8>,
}

/// 항목별 삭제 결과.
///
/// 삭제 실패는 상위 작업을 실패시키지 않습니다. 호출자는 결과를 순회하며
/// 실패만 로그로 남깁니다.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// 삭제를 시도한 참조 URL
    pub url: String,
    /// 개별 삭제 결과
    pub result: Result<(), GarageError>,
}

/// 업로드 응답 본문.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// 업로드된 이미지의 안정적인 참조 URL
    secure_url: String,
}

/// 미디어 호스트 클라이언트.
#[derive(Debug, Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl MediaClient {
    /// 새 클라이언트 생성.
    pub fn new(config: MediaConfig) -> Result<Self, GarageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GarageError::Media(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { http, config })
    }

    /// 여러 파일 업로드.
    ///
    /// 반환되는 URL 목록은 입력 파일 순서를 보존합니다.
    /// 하나라도 실패하면 전체가 에러입니다.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<String>, GarageError> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let url = self.upload_one(file).await?;
            urls.push(url);
        }
        Ok(urls)
    }

    async fn upload_one(&self, file: UploadFile) -> Result<String, GarageError> {
        let file_name = file.file_name.clone();
        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| GarageError::Media(format!("잘못된 MIME 타입: {}", e)))?;
        }

        let form = reqwest::multipart::Form::new()
            .text("folder", self.config.folder.clone())
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/image/upload", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GarageError::Media(format!("업로드 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            return Err(GarageError::Media(format!(
                "업로드 거부됨 ({}): {}",
                response.status(),
                file_name
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| GarageError::Media(format!("업로드 응답 파싱 실패: {}", e)))?;

        debug!(file = %file_name, url = %body.secure_url, "Image uploaded");
        Ok(body.secure_url)
    }

    /// 참조 URL에서 원격 저장 식별자를 유도합니다.
    ///
    /// URL의 마지막 경로 세그먼트에서 확장자를 제거하고 논리 폴더 이름을
    /// 접두사로 붙입니다.
    ///
    /// # Example
    ///
    /// `https://media.example.com/car-images/abc123.jpg` → `car-images/abc123`
    pub fn public_id_from_url(&self, url: &str) -> String {
        let last_segment = url.rsplit('/').next().unwrap_or(url);
        let name = last_segment.split('.').next().unwrap_or(last_segment);
        format!("{}/{}", self.config.folder, name)
    }

    /// 참조 URL 목록에 대한 best-effort 일괄 삭제.
    ///
    /// 모든 삭제 요청을 동시에 발행하고 전부 완료될 때까지 기다립니다.
    /// 항목별 결과를 반환하며, 어떤 실패도 에러로 전파하지 않습니다.
    pub async fn delete_batch(&self, urls: &[String]) -> Vec<DeleteOutcome> {
        let deletions = urls.iter().map(|url| async {
            let result = self.delete_one(url).await;
            DeleteOutcome {
                url: url.clone(),
                result,
            }
        });

        join_all(deletions).await
    }

    async fn delete_one(&self, url: &str) -> Result<(), GarageError> {
        let public_id = self.public_id_from_url(url);

        let response = self
            .http
            .post(format!("{}/image/destroy", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .json(&json!({ "public_id": public_id }))
            .send()
            .await
            .map_err(|e| GarageError::Media(format!("삭제 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            return Err(GarageError::Media(format!(
                "삭제 거부됨 ({}): {}",
                response.status(),
                public_id
            )));
        }

        debug!(%public_id, "Image deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> MediaConfig {
        MediaConfig {
            base_url,
            api_key: "test-key".to_string(),
            folder: "car-images".to_string(),
            request_timeout_secs: 5,
        }
    }

    fn test_client(base_url: String) -> MediaClient {
        MediaClient::new(test_config(base_url)).unwrap()
    }

    #[test]
    fn test_public_id_from_url() {
        let client = test_client("http://localhost".to_string());

        assert_eq!(
            client.public_id_from_url("https://media.example.com/car-images/abc123.jpg"),
            "car-images/abc123"
        );
        // 확장자가 없어도 동작
        assert_eq!(
            client.public_id_from_url("https://media.example.com/x/abc123"),
            "car-images/abc123"
        );
        // 첫 번째 점 기준으로 잘라냄 (원본 동작과 동일)
        assert_eq!(
            client.public_id_from_url("https://m.example.com/f/photo.min.png"),
            "car-images/photo"
        );
    }

    #[tokio::test]
    async fn test_upload_preserves_order() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("POST", "/image/upload")
            .with_status(200)
            .with_body(r#"{"secure_url":"https://m.test/car-images/one.jpg"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = test_client(server.url());
        let files = vec![UploadFile {
            file_name: "one.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![1, 2, 3],
        }];

        let urls = client.upload(files).await.unwrap();
        assert_eq!(urls, vec!["https://m.test/car-images/one.jpg"]);
        first.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_error_propagates() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/image/upload")
            .with_status(500)
            .create_async()
            .await;

        let client = test_client(server.url());
        let files = vec![UploadFile {
            file_name: "one.jpg".to_string(),
            content_type: None,
            bytes: vec![0],
        }];

        assert!(client.upload(files).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_batch_is_best_effort() {
        let mut server = mockito::Server::new_async().await;

        // 모든 삭제 요청이 실패해도 delete_batch 자체는 항목별 결과를 반환
        let destroy = server
            .mock("POST", "/image/destroy")
            .with_status(500)
            .expect(2)
            .create_async()
            .await;

        let client = test_client(server.url());
        let urls = vec![
            "https://m.test/car-images/a.jpg".to_string(),
            "https://m.test/car-images/b.jpg".to_string(),
        ];

        let outcomes = client.delete_batch(&urls).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_err()));
        // 이전 URL 하나당 삭제 요청 하나
        destroy.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_batch_success() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/image/destroy")
            .with_status(200)
            .with_body(r#"{"result":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = test_client(server.url());
        let urls = vec!["https://m.test/car-images/a.jpg".to_string()];

        let outcomes = client.delete_batch(&urls).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].result.is_ok());
        assert_eq!(outcomes[0].url, urls[0]);
    }

    #[tokio::test]
    async fn test_delete_batch_empty() {
        let client = test_client("http://localhost:1".to_string());
        let outcomes = client.delete_batch(&[]).await;
        assert!(outcomes.is_empty());
    }
}
