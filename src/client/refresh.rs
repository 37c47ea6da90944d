use super::transport::{RequestBody, Transport, TransportRequest};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::redact::redact_secrets;
use crate::session::SessionStore;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

/// Exchanges the current session for a fresh access token without user
/// interaction. Failure is fatal for the session.
#[async_trait]
pub trait RefreshCapability: Send + Sync {
    async fn refresh_access_token(&self) -> Result<String, ApiError>;
}

/// Default capability: posts the stored refresh token to the backend's
/// `auth/refresh` endpoint.
pub struct HttpRefresher {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    endpoint: String,
}

impl HttpRefresher {
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore, config: &ApiConfig) -> Self {
        Self {
            transport,
            session,
            endpoint: config.endpoint("auth/refresh"),
        }
    }
}

#[async_trait]
impl RefreshCapability for HttpRefresher {
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let Some(refresh_token) = self.session.refresh_token().await? else {
            return Err(ApiError::RefreshFailed(
                "no refresh token in session".to_string(),
            ));
        };

        let response = self
            .transport
            .execute(TransportRequest {
                method: Method::POST,
                url: self.endpoint.clone(),
                bearer: None,
                body: RequestBody::Json(json!({ "refreshToken": refresh_token })),
            })
            .await
            .map_err(|e| ApiError::RefreshFailed(redact_secrets(&e.to_string()).to_string()))?;

        if !response.is_success() {
            return Err(ApiError::RefreshFailed(format!(
                "refresh endpoint returned {}",
                response.status
            )));
        }

        let value: Value = serde_json::from_str(&response.body)
            .map_err(|_| ApiError::RefreshFailed("refresh response was not json".to_string()))?;
        let token = value
            .get("token")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::RefreshFailed("refresh response carried no token".to_string())
            })?;
        Ok(token.to_string())
    }
}
