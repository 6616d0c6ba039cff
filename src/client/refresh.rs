//! Access token refresh

use super::RefreshApi;
use crate::auth::{TokenKey, TokenStore};
use crate::error::{AuthError, Result};

/// Exchange the stored refresh token for a new access token.
///
/// - no refresh token stored: fails without calling the backend
/// - success: the new access token is persisted and returned
/// - any failure: both tokens are cleared before failing
pub async fn refresh_access_token(api: &dyn RefreshApi, store: &dyn TokenStore) -> Result<String> {
    let Some(refresh_token) = store.read(TokenKey::RefreshToken).await? else {
        log::debug!("No refresh token stored");
        return Err(AuthError::CannotRefresh.into());
    };

    match exchange(api, store, &refresh_token).await {
        Ok(access_token) => Ok(access_token),
        Err(err) => {
            log::warn!("Refresh rejected, clearing stored credentials: {}", err);
            for key in [TokenKey::RefreshToken, TokenKey::AccessToken] {
                if let Err(clear_err) = store.clear(key).await {
                    log::warn!("Failed to clear {}: {}", key, clear_err);
                }
            }
            Err(AuthError::CannotRefresh.into())
        }
    }
}

async fn exchange(api: &dyn RefreshApi, store: &dyn TokenStore, refresh_token: &str) -> Result<String> {
    let access_token = api.refresh_access_token(refresh_token).await?;
    store.save(TokenKey::AccessToken, &access_token).await?;

    store
        .read(TokenKey::AccessToken)
        .await?
        .ok_or_else(|| AuthError::CannotRefresh.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::error::{ApiError, Error};

    /// Records the refresh token it was called with
    struct RecordingRefresh {
        response: std::result::Result<String, u16>,
        seen: Mutex<Vec<String>>,
    }

    impl RecordingRefresh {
        fn new(response: std::result::Result<&str, u16>) -> Self {
            Self {
                response: response.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RefreshApi for RecordingRefresh {
        async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
            self.seen.lock().unwrap().push(refresh_token.to_string());
            self.response.clone().map_err(|status_code| {
                ApiError::Status {
                    status_code,
                    content: serde_json::Value::Null,
                    message: format!("code: {}", status_code),
                }
                .into()
            })
        }
    }

    #[tokio::test]
    async fn test_refresh_stores_new_access_token() {
        let store = MemoryTokenStore::with_tokens(Some("old"), Some("refresh-1"));
        let api = RecordingRefresh::new(Ok("fresh"));

        let token = refresh_access_token(&api, &store).await.unwrap();

        assert_eq!(token, "fresh");
        assert_eq!(*api.seen.lock().unwrap(), vec!["refresh-1".to_string()]);
        assert_eq!(
            store.read(TokenKey::AccessToken).await.unwrap().as_deref(),
            Some("fresh")
        );
        assert_eq!(
            store.read(TokenKey::RefreshToken).await.unwrap().as_deref(),
            Some("refresh-1")
        );
    }

    #[tokio::test]
    async fn test_missing_refresh_token_skips_backend() {
        let store = MemoryTokenStore::with_tokens(Some("old"), None);
        let api = RecordingRefresh::new(Ok("fresh"));

        let err = refresh_access_token(&api, &store).await.unwrap_err();

        assert!(matches!(err, Error::Auth(AuthError::CannotRefresh)));
        assert!(api.seen.lock().unwrap().is_empty());
        // nothing to clear when we never talked to the backend
        assert_eq!(
            store.read(TokenKey::AccessToken).await.unwrap().as_deref(),
            Some("old")
        );
    }

    #[tokio::test]
    async fn test_rejected_refresh_clears_both_tokens() {
        let store = MemoryTokenStore::with_tokens(Some("old"), Some("refresh-1"));
        let api = RecordingRefresh::new(Err(401));

        let err = refresh_access_token(&api, &store).await.unwrap_err();

        assert!(matches!(err, Error::Auth(AuthError::CannotRefresh)));
        assert_eq!(store.read(TokenKey::AccessToken).await.unwrap(), None);
        assert_eq!(store.read(TokenKey::RefreshToken).await.unwrap(), None);
    }
}
