use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::{Course, Page};
use serde_json::json;

impl ApiClient {
    pub async fn courses(&self, page: u32) -> Result<Page<Course>, ApiError> {
        self.send(ApiRequest::get(format!("courses?page={page}")))
            .await?
            .json()
    }

    pub async fn course(&self, course_id: &str) -> Result<Course, ApiError> {
        self.send(ApiRequest::get(format!(
            "courses/{}",
            urlencoding::encode(course_id)
        )))
        .await?
        .json()
    }

    pub async fn enroll(&self, course_id: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::post_json(
            format!("courses/{}/enroll", urlencoding::encode(course_id)),
            json!({}),
        ))
        .await?;
        Ok(())
    }
}
