mod refresh;
mod transport;

pub use refresh::{HttpRefresher, RefreshCapability};
pub use transport::{
    ReqwestTransport, RequestBody, Transport, TransportRequest, TransportResponse, UploadPart,
};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::redact::redact_secrets;
use crate::session::SessionStore;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// One outbound call. `retried` is flipped by the 401 interceptor and never
/// reset; it caps recovery at a single resend.
pub struct ApiRequest {
    method: Method,
    path: String,
    body: RequestBody,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.body = RequestBody::Json(body);
        request
    }

    pub fn put_json(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(Method::PUT, path);
        request.body = RequestBody::Json(body);
        request
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn multipart(path: impl Into<String>, parts: Vec<UploadPart>) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.body = RequestBody::Multipart(parts);
        request
    }
}

#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    body: String,
}

impl ApiResponse {
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Authenticated HTTP client. Every outbound call gets the freshest stored
/// bearer token; a 401 triggers exactly one silent refresh-and-resend, and a
/// failed recovery clears the session.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    session: SessionStore,
    refresher: Arc<dyn RefreshCapability>,
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config)?);
        let session = SessionStore::keyring();
        Ok(Self::with_parts(config, transport, session, None))
    }

    /// Assembles a client from explicit collaborators. When no refresh
    /// capability is given, the default `auth/refresh` exchange is used.
    pub fn with_parts(
        config: ApiConfig,
        transport: Arc<dyn Transport>,
        session: SessionStore,
        refresher: Option<Arc<dyn RefreshCapability>>,
    ) -> Self {
        let refresher = refresher.unwrap_or_else(|| {
            Arc::new(HttpRefresher::new(
                transport.clone(),
                session.clone(),
                &config,
            ))
        });
        Self {
            config,
            transport,
            session,
            refresher,
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut request = request;
        let url = self.config.endpoint(&request.path);

        loop {
            let token = self.session.access_token().await?;
            debug!(
                method = %request.method,
                path = %request.path,
                retried = request.retried,
                authenticated = token.is_some(),
                "dispatching request"
            );

            let response = self
                .transport
                .execute(TransportRequest {
                    method: request.method.clone(),
                    url: url.clone(),
                    bearer: token.clone(),
                    body: request.body.clone(),
                })
                .await?;

            if response.status == StatusCode::UNAUTHORIZED.as_u16() {
                if request.retried {
                    warn!(path = %request.path, "still unauthorized after refresh, dropping session");
                    self.session.clear_session().await;
                    return Err(ApiError::Unauthorized {
                        message: extract_message(&response.body),
                    });
                }

                request.retried = true;
                if let Err(err) = self.refresh_once(token.as_deref()).await {
                    warn!(path = %request.path, "token refresh failed, dropping session");
                    self.session.clear_session().await;
                    return Err(err);
                }
                continue;
            }

            return into_result(response);
        }
    }

    /// At-most-one refresh in flight. A caller that acquires the gate after
    /// another caller already swapped the stored token reuses that token
    /// instead of issuing a second refresh.
    async fn refresh_once(&self, failed_token: Option<&str>) -> Result<(), ApiError> {
        let _guard = self.refresh_gate.lock().await;

        if let Some(current) = self.session.access_token().await? {
            if Some(current.as_str()) != failed_token {
                return Ok(());
            }
        }

        let fresh = self.refresher.refresh_access_token().await?;
        self.session.set_access_token(&fresh).await?;
        info!("access token refreshed");
        Ok(())
    }
}

fn into_result(response: TransportResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(ApiResponse {
            status: response.status,
            body: response.body,
        })
    } else {
        Err(ApiError::status(
            response.status,
            extract_message(&response.body),
        ))
    }
}

/// Pulls a human-readable message out of a conventional JSON error body.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for key in ["message", "error"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            let msg = msg.trim();
            if !msg.is_empty() {
                return Some(redact_secrets(msg).to_string());
            }
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Replays a fixed queue of responses and records every request.
    pub(crate) struct QueueTransport {
        responses: StdMutex<VecDeque<TransportResponse>>,
        pub(crate) seen: StdMutex<Vec<TransportRequest>>,
    }

    impl QueueTransport {
        pub(crate) fn new(responses: Vec<(u16, &str)>) -> Arc<Self> {
            Arc::new(Self {
                responses: StdMutex::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| TransportResponse {
                            status,
                            body: body.to_string(),
                        })
                        .collect(),
                ),
                seen: StdMutex::new(Vec::new()),
            })
        }

        pub(crate) fn bearer_of(&self, call: usize) -> Option<String> {
            self.seen.lock().unwrap()[call].bearer.clone()
        }

        pub(crate) fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for QueueTransport {
        async fn execute(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra request"))
        }
    }

    pub(crate) struct StubRefresher {
        outcome: Result<String, String>,
        pub(crate) calls: AtomicUsize,
    }

    impl StubRefresher {
        pub(crate) fn ok(token: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(token.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RefreshCapability for StubRefresher {
        async fn refresh_access_token(&self) -> Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Yield so concurrent recoveries can actually contend on the gate.
            tokio::task::yield_now().await;
            match &self.outcome {
                Ok(token) => Ok(token.clone()),
                Err(message) => Err(ApiError::RefreshFailed(message.clone())),
            }
        }
    }

    pub(crate) fn client(
        transport: Arc<dyn Transport>,
        refresher: Arc<dyn RefreshCapability>,
    ) -> ApiClient {
        ApiClient::with_parts(
            ApiConfig::new("https://campus.test/api"),
            transport,
            SessionStore::in_memory(),
            Some(refresher),
        )
    }
}
