//! Keystone v2.0 token exchange payloads and service catalog lookup.

use crate::error::{OpenStackError, OpenStackResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Property naming the credential type sent to Keystone
pub const KEYSTONE_CREDENTIAL_TYPE: &str = "jclouds.keystone.credential-type";

/// Property naming the service catalog type the client binds to
pub const KEYSTONE_SERVICE_TYPE: &str = "jclouds.keystone.service-type";

/// Comma separated list of regions; the first one selects the endpoint
pub const REGIONS: &str = "jclouds.regions";

/// How the identity and credential are presented to Keystone
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CredentialType {
    #[default]
    #[serde(rename = "passwordCredentials")]
    PasswordCredentials,
    #[serde(rename = "apiAccessKeyCredentials")]
    ApiAccessKeyCredentials,
}

impl CredentialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PasswordCredentials => "passwordCredentials",
            Self::ApiAccessKeyCredentials => "apiAccessKeyCredentials",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialType {
    type Err = OpenStackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passwordCredentials" => Ok(Self::PasswordCredentials),
            "apiAccessKeyCredentials" => Ok(Self::ApiAccessKeyCredentials),
            other => Err(OpenStackError::config_error(format!(
                "unknown credential type: {}",
                other
            ))),
        }
    }
}

/// Body of `POST /tokens`
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub auth: AuthBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthBody {
    #[serde(rename = "passwordCredentials", skip_serializing_if = "Option::is_none")]
    pub password_credentials: Option<PasswordCredentials>,
    #[serde(rename = "apiAccessKeyCredentials", skip_serializing_if = "Option::is_none")]
    pub api_access_key_credentials: Option<ApiAccessKeyCredentials>,
    #[serde(rename = "tenantName", skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
}

#[derive(Clone, Serialize)]
pub struct PasswordCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct ApiAccessKeyCredentials {
    #[serde(rename = "accessKey")]
    pub access_key: String,
    #[serde(rename = "secretKey")]
    pub secret_key: String,
}

// Secrets stay out of debug logs.
impl fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl fmt::Debug for ApiAccessKeyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiAccessKeyCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

impl TokenRequest {
    /// Build the token request for an identity of the form `tenant:user` or `user`
    pub fn new(credential_type: CredentialType, identity: &str, credential: &str) -> Self {
        let (tenant_name, user) = match identity.split_once(':') {
            Some((tenant, user)) => (Some(tenant.to_string()), user.to_string()),
            None => (None, identity.to_string()),
        };

        let mut auth = AuthBody {
            password_credentials: None,
            api_access_key_credentials: None,
            tenant_name,
        };
        match credential_type {
            CredentialType::PasswordCredentials => {
                auth.password_credentials = Some(PasswordCredentials {
                    username: user,
                    password: credential.to_string(),
                });
            }
            CredentialType::ApiAccessKeyCredentials => {
                auth.api_access_key_credentials = Some(ApiAccessKeyCredentials {
                    access_key: user,
                    secret_key: credential.to_string(),
                });
            }
        }

        Self { auth }
    }
}

/// Response of `POST /tokens`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access: Access,
}

/// Token and service catalog granted by Keystone
#[derive(Debug, Clone, Deserialize)]
pub struct Access {
    pub token: Token,
    #[serde(rename = "serviceCatalog", default)]
    pub service_catalog: Vec<Service>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub id: String,
    pub expires: DateTime<Utc>,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    #[serde(rename = "type")]
    pub service_type: String,
    pub name: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub region: Option<String>,
    #[serde(rename = "publicURL")]
    pub public_url: String,
    #[serde(rename = "internalURL")]
    pub internal_url: Option<String>,
    #[serde(rename = "tenantId")]
    pub tenant_id: Option<String>,
}

impl Access {
    /// Public URL of the first endpoint for `service_type`, optionally restricted to `region`
    pub fn endpoint(&self, service_type: &str, region: Option<&str>) -> OpenStackResult<&str> {
        self.service_catalog
            .iter()
            .filter(|service| service.service_type == service_type)
            .flat_map(|service| service.endpoints.iter())
            .find(|endpoint| match region {
                Some(region) => endpoint.region.as_deref() == Some(region),
                None => true,
            })
            .map(|endpoint| endpoint.public_url.as_str())
            .ok_or_else(|| OpenStackError::EndpointNotFound {
                service_type: service_type.to_string(),
                region: region.map(str::to_string),
            })
    }

    /// Whether the token expires within `margin` of `now`
    pub fn expires_within(&self, now: DateTime<Utc>, margin: chrono::Duration) -> bool {
        self.token.expires - margin <= now
    }
}
