use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::{ForumPost, ForumThread};
use serde_json::json;

impl ApiClient {
    pub async fn course_threads(&self, course_id: &str) -> Result<Vec<ForumThread>, ApiError> {
        self.send(ApiRequest::get(format!(
            "courses/{}/forums",
            urlencoding::encode(course_id)
        )))
        .await?
        .json()
    }

    pub async fn thread_posts(&self, thread_id: &str) -> Result<Vec<ForumPost>, ApiError> {
        self.send(ApiRequest::get(format!(
            "forums/threads/{}/posts",
            urlencoding::encode(thread_id)
        )))
        .await?
        .json()
    }

    pub async fn create_post(&self, thread_id: &str, body: &str) -> Result<ForumPost, ApiError> {
        self.send(ApiRequest::post_json(
            format!("forums/threads/{}/posts", urlencoding::encode(thread_id)),
            json!({ "body": body }),
        ))
        .await?
        .json()
    }

    pub async fn update_post(
        &self,
        thread_id: &str,
        post_id: &str,
        body: &str,
    ) -> Result<ForumPost, ApiError> {
        self.send(ApiRequest::put_json(
            format!(
                "forums/threads/{}/posts/{}",
                urlencoding::encode(thread_id),
                urlencoding::encode(post_id)
            ),
            json!({ "body": body }),
        ))
        .await?
        .json()
    }

    pub async fn delete_post(&self, thread_id: &str, post_id: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(format!(
            "forums/threads/{}/posts/{}",
            urlencoding::encode(thread_id),
            urlencoding::encode(post_id)
        )))
        .await?;
        Ok(())
    }
}
