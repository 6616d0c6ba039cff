//! Typed client for the pass Culture native API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::fetch::{Credentials, DeviceIdentity, RequestOptions, SafeFetch, authentication_headers};
use super::models::{RefreshResponse, SigninRequest, SigninResponse};
use super::response::{ApiResponse, parse_api_response};
use super::RefreshApi;
use crate::auth::{JwtDecoder, TokenKey, TokenStore};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Connection settings resolved from config and CLI flags
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub identity: DeviceIdentity,
    pub timeout: Duration,
}

/// pass Culture API client; every call goes through [`SafeFetch`]
pub struct PassClient {
    base_url: String,
    fetch: SafeFetch,
    state: AppState,
}

impl PassClient {
    pub fn new(settings: ClientSettings, store: Arc<dyn TokenStore>, state: AppState) -> Result<Self> {
        let fetch = SafeFetch::new(
            settings.identity,
            settings.timeout,
            store,
            Arc::new(JwtDecoder),
            Arc::new(state.clone()),
        )?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            fetch,
            state,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        self.fetch.store()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Options carrying the stored bearer token, if any
    async fn authenticated(&self, method: Method) -> Result<RequestOptions> {
        let headers = authentication_headers(self.fetch.store().as_ref(), Credentials::Include).await?;
        Ok(RequestOptions::new(method).with_headers(headers))
    }

    async fn send(&self, path: &str, options: &RequestOptions) -> Result<ApiResponse> {
        let response = self.fetch.safe_fetch(&self.url(path), options, self).await?;
        ApiResponse::read(response).await
    }

    async fn send_parsed<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<T> {
        let response = self.send(path, options).await?;
        parse_api_response(&response, &self.state)
    }

    /// Sign in and store the issued tokens
    pub async fn signin(&self, email: &str, password: &str) -> Result<SigninResponse> {
        let body = serde_json::to_value(SigninRequest {
            identifier: email.to_string(),
            password: password.to_string(),
        })?;
        let options = RequestOptions::post()
            .with_json(body)
            .with_credentials(Credentials::Omit);

        let tokens: SigninResponse = self.send_parsed("native/v1/signin", &options).await?;

        let store = self.store();
        store.save(TokenKey::AccessToken, &tokens.access_token).await?;
        store.save(TokenKey::RefreshToken, &tokens.refresh_token).await?;
        self.state.set_login_required(false);
        log::info!("Signed in as {}", email);

        Ok(tokens)
    }

    /// Forget stored credentials
    pub async fn logout(&self) -> Result<()> {
        let store = self.store();
        store.clear(TokenKey::AccessToken).await?;
        store.clear(TokenKey::RefreshToken).await?;
        Ok(())
    }

    /// Current user profile
    pub async fn me(&self) -> Result<serde_json::Value> {
        let options = self.authenticated(Method::GET).await?;
        self.send_parsed("native/v1/me", &options).await
    }

    /// Public backend settings
    pub async fn settings(&self) -> Result<serde_json::Value> {
        let options = RequestOptions::get().with_credentials(Credentials::Omit);
        self.send_parsed("native/v1/settings", &options).await
    }

    /// Arbitrary call relative to the API host
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let mut options = self.authenticated(method).await?;
        options.body = body;
        self.send_parsed(path, &options).await
    }
}

#[async_trait]
impl RefreshApi for PassClient {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", refresh_token)).map_err(ApiError::from)?,
        );
        let options = RequestOptions::post()
            .with_headers(headers)
            .with_credentials(Credentials::Omit);

        let response: RefreshResponse = self
            .send_parsed("native/v1/refresh_access_token", &options)
            .await?;
        Ok(response.access_token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::auth::jwt::test_token;
    use crate::error::{AuthError, Error};

    fn client(server: &mockito::ServerGuard, store: Arc<MemoryTokenStore>) -> PassClient {
        PassClient::new(
            ClientSettings {
                base_url: server.url(),
                identity: DeviceIdentity {
                    device_id: "device-1".to_string(),
                    app_version: "1.0".to_string(),
                },
                timeout: Duration::from_secs(5),
            },
            store,
            AppState::new(),
        )
        .unwrap()
    }

    fn expired_token() -> String {
        test_token(Utc::now().timestamp() - 60, 111)
    }

    #[tokio::test]
    async fn test_signin_stores_tokens() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/native/v1/signin")
            .match_header("device-id", "device-1")
            .match_header("authorization", mockito::Matcher::Missing)
            .match_body(mockito::Matcher::Json(
                json!({"identifier": "jane@example.org", "password": "secret"}),
            ))
            .with_status(200)
            .with_body(r#"{"accessToken":"access","refreshToken":"refresh"}"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let client = client(&server, store.clone());

        client.signin("jane@example.org", "secret").await.unwrap();

        assert_eq!(
            store.read(TokenKey::AccessToken).await.unwrap().as_deref(),
            Some("access")
        );
        assert_eq!(
            store.read(TokenKey::RefreshToken).await.unwrap().as_deref(),
            Some("refresh")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_me_refreshes_through_backend() {
        let mut server = mockito::Server::new_async().await;
        let refresh = server
            .mock("POST", "/native/v1/refresh_access_token")
            .match_header("authorization", "Bearer refresh")
            .match_header("app-version", "1.0")
            .with_status(200)
            .with_body(r#"{"accessToken":"new"}"#)
            .expect(1)
            .create_async()
            .await;
        let me = server
            .mock("GET", "/native/v1/me")
            .match_header("authorization", "Bearer new")
            .with_status(200)
            .with_body(r#"{"email":"jane@example.org"}"#)
            .expect(1)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens(
            Some(&expired_token()),
            Some("refresh"),
        ));
        let client = client(&server, store.clone());

        let profile = client.me().await.unwrap();

        assert_eq!(profile, json!({"email": "jane@example.org"}));
        assert_eq!(
            store.read(TokenKey::AccessToken).await.unwrap().as_deref(),
            Some("new")
        );
        refresh.assert_async().await;
        me.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_rejection_logs_out() {
        let mut server = mockito::Server::new_async().await;
        let _refresh = server
            .mock("POST", "/native/v1/refresh_access_token")
            .with_status(401)
            .with_body(r#"{"msg":"Token has expired"}"#)
            .create_async()
            .await;
        let me = server
            .mock("GET", "/native/v1/me")
            .expect(0)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens(
            Some(&expired_token()),
            Some("refresh"),
        ));
        let client = client(&server, store.clone());

        let err = client.me().await.unwrap_err();

        assert!(matches!(err, Error::Auth(AuthError::CannotRefresh)));
        assert!(client.state().login_required());
        assert_eq!(store.read(TokenKey::AccessToken).await.unwrap(), None);
        assert_eq!(store.read(TokenKey::RefreshToken).await.unwrap(), None);
        me.assert_async().await;
    }

    #[tokio::test]
    async fn test_me_without_signin_redirects() {
        let server = mockito::Server::new_async().await;
        let client = client(&server, Arc::new(MemoryTokenStore::new()));

        let err = client.me().await.unwrap_err();

        assert!(matches!(err, Error::Auth(AuthError::UndecodableToken)));
        assert!(client.state().login_required());
    }

    #[tokio::test]
    async fn test_settings_is_public() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/native/v1/settings")
            .with_status(200)
            .with_body(r#"{"depositAmount":30000}"#)
            .create_async()
            .await;

        let client = client(&server, Arc::new(MemoryTokenStore::new()));

        assert_eq!(
            client.settings().await.unwrap(),
            json!({"depositAmount": 30000})
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_call_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let valid = test_token(Utc::now().timestamp() + 3600, 111);
        let _mock = server
            .mock("POST", "/native/v1/bookings")
            .with_status(400)
            .with_body(r#"{"code":"ALREADY_BOOKED","message":"Already booked"}"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens(Some(&valid), None));
        let client = client(&server, store);

        let err = client
            .call(Method::POST, "/native/v1/bookings", Some(json!({"stockId": 1})))
            .await
            .unwrap_err();

        match err {
            Error::Api(ApiError::Status {
                status_code,
                content,
                ..
            }) => {
                assert_eq!(status_code, 400);
                assert_eq!(content["code"], "ALREADY_BOOKED");
            }
            other => panic!("Expected ApiError::Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_logout_clears_tokens() {
        let server = mockito::Server::new_async().await;
        let store = Arc::new(MemoryTokenStore::with_tokens(Some("a"), Some("r")));
        let client = client(&server, store.clone());

        client.logout().await.unwrap();

        assert_eq!(store.read(TokenKey::AccessToken).await.unwrap(), None);
        assert_eq!(store.read(TokenKey::RefreshToken).await.unwrap(), None);
    }
}
