//! Authentication payloads

use serde::{Deserialize, Serialize};

/// Body of `POST /native/v1/signin`
#[derive(Debug, Clone, Serialize)]
pub struct SigninRequest {
    /// Account email
    pub identifier: String,
    pub password: String,
}

/// Tokens returned on sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response of `POST /native/v1/refresh_access_token`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signin_response_uses_camel_case() {
        let parsed: SigninResponse =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(parsed.access_token, "a");
        assert_eq!(parsed.refresh_token, "r");
    }
}
