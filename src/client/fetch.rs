//! Authenticated fetch wrapper
//!
//! Every outgoing call goes through [`SafeFetch::safe_fetch`], which:
//! - stamps the device identity headers on the request
//! - lets allowlisted (pre-authentication) endpoints through untouched
//! - decodes the caller's bearer token and refreshes it once when expired
//!
//! Undecodable tokens and failed refreshes redirect to login before the call
//! is rejected. At most one request reaches the target URL per invocation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, Response};
use tokio::sync::Mutex;

use super::RefreshApi;
use super::refresh::refresh_access_token;
use crate::auth::{LoginRedirect, TokenDecoder, TokenKey, TokenStore, bearer_token};
use crate::error::{ApiError, AuthError, Result};

/// Header carrying the per-install identifier
pub const DEVICE_ID_HEADER: &str = "device-id";

/// Header carrying the client version
pub const APP_VERSION_HEADER: &str = "app-version";

/// Path fragments reachable without authentication
pub const NOT_AUTHENTICATED_CALLS: &[&str] = &[
    "native/v1/account",
    "native/v1/refresh_access_token",
    "native/v1/request_password_reset",
    "native/v1/resend_email_validation",
    "native/v1/reset_password",
    "native/v1/settings",
    "native/v1/signin",
    "native/v1/validate_email",
    "native/v1/offer",
];

/// Substring match of the URL against the allowlist
pub fn is_not_authenticated_call(url: &str) -> bool {
    NOT_AUTHENTICATED_CALLS
        .iter()
        .any(|fragment| url.contains(fragment))
}

/// Whether stored credentials may be attached to a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Include,
    Omit,
}

/// Caller-built request descriptor
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
    pub credentials: Credentials,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
            credentials: Credentials::Include,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// `Authorization` header built from the stored access token.
///
/// Empty when no token is stored or the request omits credentials.
pub async fn authentication_headers(
    store: &dyn TokenStore,
    credentials: Credentials,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if credentials == Credentials::Omit {
        return Ok(headers);
    }

    if let Some(token) = store.read(TokenKey::AccessToken).await? {
        headers.insert(AUTHORIZATION, bearer_header(&token)?);
    }

    Ok(headers)
}

fn bearer_header(token: &str) -> Result<HeaderValue> {
    Ok(HeaderValue::from_str(&format!("Bearer {}", token)).map_err(ApiError::from)?)
}

/// Identity stamped on every request
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub app_version: String,
}

/// Fetch wrapper owning the HTTP client and its credential collaborators
pub struct SafeFetch {
    http: HttpClient,
    identity: DeviceIdentity,
    store: Arc<dyn TokenStore>,
    decoder: Arc<dyn TokenDecoder>,
    redirect: Arc<dyn LoginRedirect>,
    // single in-flight refresh per process
    refresh_gate: Mutex<()>,
}

impl SafeFetch {
    pub fn new(
        identity: DeviceIdentity,
        timeout: Duration,
        store: Arc<dyn TokenStore>,
        decoder: Arc<dyn TokenDecoder>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            identity,
            store,
            decoder,
            redirect,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Perform `url` with `options`, refreshing the bearer token if needed
    pub async fn safe_fetch(
        &self,
        url: &str,
        options: &RequestOptions,
        api: &dyn RefreshApi,
    ) -> Result<Response> {
        let mut runtime_options = options.clone();
        runtime_options.headers.insert(
            DEVICE_ID_HEADER,
            HeaderValue::from_str(&self.identity.device_id).map_err(ApiError::from)?,
        );
        runtime_options.headers.insert(
            APP_VERSION_HEADER,
            HeaderValue::from_str(&self.identity.app_version).map_err(ApiError::from)?,
        );

        if is_not_authenticated_call(url) {
            log::debug!("{} {} is public, skipping token checks", options.method, url);
            return self.send(url, runtime_options).await;
        }

        let authorization = options
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let token = bearer_token(authorization);

        let Some(claims) = self.decoder.decode(token) else {
            log::debug!("{} {} has no decodable access token", options.method, url);
            self.redirect.navigate_to_login();
            return Err(AuthError::UndecodableToken.into());
        };

        if claims.is_expired() {
            log::debug!("Access token expired at {}, refreshing", claims.exp);
            let new_token = match self.refresh_once(token, api).await {
                Ok(new_token) => new_token,
                Err(err) => {
                    log::warn!("Could not refresh access token: {}", err);
                    self.redirect.navigate_to_login();
                    return Err(AuthError::CannotRefresh.into());
                }
            };
            runtime_options
                .headers
                .insert(AUTHORIZATION, bearer_header(&new_token)?);
        }

        self.send(url, runtime_options).await
    }

    /// Refresh behind the gate, reusing a token another caller just stored
    async fn refresh_once(&self, expired: &str, api: &dyn RefreshApi) -> Result<String> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.store.read(TokenKey::AccessToken).await? {
            let fresh = current != expired
                && self
                    .decoder
                    .decode(&current)
                    .is_some_and(|claims| !claims.is_expired());
            if fresh {
                log::debug!("Reusing access token refreshed by a concurrent call");
                return Ok(current);
            }
        }

        refresh_access_token(api, self.store.as_ref()).await
    }

    async fn send(&self, url: &str, options: RequestOptions) -> Result<Response> {
        let mut request = self
            .http
            .request(options.method, url)
            .headers(options.headers);
        if let Some(body) = options.body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        log::debug!("{} -> {}", url, response.status());
        Ok(response)
    }
}
