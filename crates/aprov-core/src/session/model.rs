use serde::{Deserialize, Serialize};

use super::biometric::BiometricKind;

/// The signed-in user and their tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub name: String,
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl User {
    /// Applies a refresh response. A response without a refresh token keeps
    /// the previous one.
    pub fn refreshed(&self, response: &TokenResponse) -> Self {
        Self {
            token: response.access_token.clone(),
            refresh_token: response
                .refresh_token
                .clone()
                .or_else(|| self.refresh_token.clone()),
            ..self.clone()
        }
    }
}

/// Body returned by `/api/oauth2/v1/token` for both grant types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default, rename = "hasMFA")]
    pub has_mfa: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Session record kept in persistent storage under `auth-storage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSession {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub biometric_enabled: bool,
    pub biometric_kind: BiometricKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            username: "admin".into(),
            name: "Admin".into(),
            token: "old-access".into(),
            refresh_token: Some("old-refresh".into()),
        }
    }

    fn response(refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "new-access".into(),
            refresh_token: refresh.map(String::from),
            expires_in: Some(3600),
            token_type: Some("Bearer".into()),
            scope: None,
            has_mfa: None,
            name: None,
        }
    }

    #[test]
    fn test_refresh_keeps_previous_refresh_token() {
        let updated = user().refreshed(&response(None));
        assert_eq!(updated.token, "new-access");
        assert_eq!(updated.refresh_token.as_deref(), Some("old-refresh"));
    }

    #[test]
    fn test_refresh_replaces_refresh_token() {
        let updated = user().refreshed(&response(Some("new-refresh")));
        assert_eq!(updated.refresh_token.as_deref(), Some("new-refresh"));
    }

    #[test]
    fn test_token_response_parses_protheus_body() {
        let json = r#"{"access_token":"a","refresh_token":"r","scope":"default","token_type":"Bearer","expires_in":3600,"hasMFA":false}"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.expires_in, Some(3600));
        assert_eq!(parsed.has_mfa, Some(false));
    }
}
