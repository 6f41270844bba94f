//! Access-token supply for API requests.
//!
//! Managers never obtain or refresh tokens themselves; they ask an
//! [`AuthRepository`] for the current bearer token before every request.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// An authenticated OAuth2 session.
#[derive(Debug)]
pub struct OAuthSession {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Lifetime of the access token in seconds, as issued.
    pub expires_in: Option<u64>,
    pub token_type: String,
}

impl OAuthSession {
    pub fn bearer(access_token: SecretString) -> Self {
        Self {
            access_token,
            refresh_token: None,
            expires_in: None,
            token_type: "bearer".to_string(),
        }
    }
}

/// Source of bearer tokens for outgoing requests.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Current access token. Implementations that refresh do so here.
    async fn access_token(&self) -> Result<SecretString>;
}

/// Serves a fixed session; never refreshes.
#[derive(Debug)]
pub struct StaticTokenAuth {
    session: OAuthSession,
}

impl StaticTokenAuth {
    pub fn new(session: OAuthSession) -> Self {
        Self { session }
    }

    pub fn from_token(token: &SecretString) -> Self {
        Self::new(OAuthSession::bearer(SecretString::from(
            token.expose_secret().to_string(),
        )))
    }

    pub fn session(&self) -> &OAuthSession {
        &self.session
    }
}

#[async_trait]
impl AuthRepository for StaticTokenAuth {
    async fn access_token(&self) -> Result<SecretString> {
        let token = self.session.access_token.expose_secret();
        if token.is_empty() {
            return Err(Error::Auth("session has no access token".to_string()));
        }
        Ok(SecretString::from(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_auth_returns_session_token() {
        let auth = StaticTokenAuth::from_token(&SecretString::from("T0KEN"));
        let token = auth.access_token().await.unwrap();
        assert_eq!(token.expose_secret(), "T0KEN");
        assert_eq!(auth.session().token_type, "bearer");
    }

    #[tokio::test]
    async fn static_auth_rejects_empty_token() {
        let auth = StaticTokenAuth::from_token(&SecretString::from(""));
        let err = auth.access_token().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
