//! Access tokens for the Google Calendar API

use async_trait::async_trait;
use caledit_domain::{CalEditError, Result};

/// Environment variable holding a ready-to-use OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "CALEDIT_GOOGLE_ACCESS_TOKEN";

/// Trait for types that can provide bearer tokens for API calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Hands out one fixed token. Acquisition and refresh happen elsewhere.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// Read the token from [`ACCESS_TOKEN_ENV`].
    pub fn from_env() -> Result<Self> {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => Err(CalEditError::Config(format!("{ACCESS_TOKEN_ENV} is not set"))),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
