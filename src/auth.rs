use crate::{
    client::{base_url, error_from_response},
    config::ApiConfig,
    error::{OpenStackError, OpenStackResult},
    keystone::{Access, TokenRequest, TokenResponse},
};
use chrono::Utc;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use tokio::sync::RwLock;

/// Header carrying the Keystone token on every service request
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Seconds before expiry at which a cached token is replaced
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;

/// Authentication trait for OpenStack service requests
#[async_trait::async_trait]
pub trait Authentication: Send + Sync {
    /// Apply authentication to the request headers
    async fn apply_auth(&self, headers: &mut HeaderMap) -> OpenStackResult<()>;
}

/// Pre-issued token sent as `X-Auth-Token`
#[derive(Debug, Clone)]
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl Authentication for TokenAuth {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> OpenStackResult<()> {
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), token_header(&self.token)?);
        Ok(())
    }
}

/// No authentication
#[derive(Debug, Clone)]
pub struct NoAuth;

#[async_trait::async_trait]
impl Authentication for NoAuth {
    async fn apply_auth(&self, _headers: &mut HeaderMap) -> OpenStackResult<()> {
        Ok(())
    }
}

/// Keystone v2.0 session: exchanges credentials for a token and keeps it fresh
pub struct KeystoneAuth {
    client: Client,
    tokens_url: Url,
    request: TokenRequest,
    access: RwLock<Option<Access>>,
}

impl KeystoneAuth {
    pub fn new(client: Client, config: &ApiConfig) -> OpenStackResult<Self> {
        let tokens_url = base_url(config.require_endpoint()?)?.join("tokens")?;
        let request = TokenRequest::new(
            config.credential_type()?,
            config.require_identity()?,
            config.require_credential()?,
        );

        Ok(Self {
            client,
            tokens_url,
            request,
            access: RwLock::new(None),
        })
    }

    /// Current access, authenticating first if there is none or it is about to expire
    pub async fn access(&self) -> OpenStackResult<Access> {
        {
            let cached = self.access.read().await;
            if let Some(access) = cached.as_ref().filter(|a| !Self::is_stale(a)) {
                return Ok(access.clone());
            }
        }

        let mut cached = self.access.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(access) = cached.as_ref().filter(|a| !Self::is_stale(a)) {
            return Ok(access.clone());
        }

        let access = self.authenticate().await?;
        *cached = Some(access.clone());
        Ok(access)
    }

    fn is_stale(access: &Access) -> bool {
        access.expires_within(
            Utc::now(),
            chrono::Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS),
        )
    }

    async fn authenticate(&self) -> OpenStackResult<Access> {
        info!("Authenticating against {}", self.tokens_url);
        debug!("HTTP POST {} body: {:?}", self.tokens_url, self.request);

        let response = self
            .client
            .post(self.tokens_url.clone())
            .json(&self.request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(match error_from_response(response).await {
                OpenStackError::Api { status, message } => {
                    OpenStackError::auth_error(format!("HTTP {}: {}", status, message))
                }
                other => other,
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!("Token issued, expires {}", token.access.token.expires);
        Ok(token.access)
    }
}

#[async_trait::async_trait]
impl Authentication for KeystoneAuth {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> OpenStackResult<()> {
        let access = self.access().await?;
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), token_header(&access.token.id)?);
        Ok(())
    }
}

fn token_header(token: &str) -> OpenStackResult<HeaderValue> {
    let mut value = HeaderValue::from_str(token)
        .map_err(|e| OpenStackError::auth_error(format!("Invalid auth header: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}
