use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::{LoginResponse, UserProfile};
use serde_json::json;
use tracing::info;

impl ApiClient {
    /// Authenticates and persists the session (token, refresh token, user
    /// descriptor) before returning the profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .send(ApiRequest::post_json(
                "auth/login",
                json!({ "email": email, "password": password }),
            ))
            .await?;
        let login: LoginResponse = response.json()?;

        self.session().set_access_token(&login.token).await?;
        self.session()
            .set_refresh_token(&login.refresh_token)
            .await?;
        self.session().set_user(&login.user).await?;
        info!(user = %login.user.id, "logged in");
        Ok(login.user)
    }

    pub async fn logout(&self) {
        self.session().clear_session().await;
        info!("logged out");
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.send(ApiRequest::get("users/me")).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{client, QueueTransport, StubRefresher};
    use crate::types::UserRole;

    const LOGIN_BODY: &str = r#"{
        "token": "tok-1",
        "refreshToken": "ref-1",
        "user": {"id": "u1", "name": "Ada", "email": "ada@campus.test", "role": "student"}
    }"#;

    #[tokio::test]
    async fn login_persists_the_whole_session() {
        let transport = QueueTransport::new(vec![(200, LOGIN_BODY)]);
        let api = client(transport.clone(), StubRefresher::ok("unused"));

        let user = api.login("ada@campus.test", "hunter2").await.unwrap();

        assert_eq!(user.role, UserRole::Student);
        assert_eq!(
            api.session().access_token().await.unwrap().as_deref(),
            Some("tok-1")
        );
        assert_eq!(
            api.session().refresh_token().await.unwrap().as_deref(),
            Some("ref-1")
        );
        assert_eq!(api.session().user().await.unwrap().unwrap().id, "u1");
        assert_eq!(
            transport.seen.lock().unwrap()[0].url,
            "https://campus.test/api/auth/login"
        );
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let transport = QueueTransport::new(vec![]);
        let api = client(transport, StubRefresher::ok("unused"));
        api.session().set_access_token("tok").await.unwrap();

        api.logout().await;

        assert!(!api.session().has_session().await);
    }
}
