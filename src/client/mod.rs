//! pass Culture native API client

use async_trait::async_trait;

use crate::error::Result;

pub mod fetch;
pub mod models;
pub mod pass;
pub mod refresh;
pub mod response;

pub use fetch::DeviceIdentity;
#[allow(unused_imports)]
pub use fetch::{Credentials, NOT_AUTHENTICATED_CALLS, RequestOptions, SafeFetch};
pub use pass::{ClientSettings, PassClient};
pub use response::{extract_api_error_message, is_api_error};

/// Backend capable of minting a new access token
#[async_trait]
pub trait RefreshApi: Send + Sync {
    /// Exchange a refresh token for a fresh access token
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String>;
}
