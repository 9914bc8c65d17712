use crate::{
    error::{OpenStackError, OpenStackResult},
    keystone::{CredentialType, KEYSTONE_CREDENTIAL_TYPE, KEYSTONE_SERVICE_TYPE, REGIONS},
};
use std::collections::BTreeMap;
use std::fmt;

/// Static description of an OpenStack provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub api_version: &'static str,
    pub default_service_type: &'static str,
    pub default_credential_type: CredentialType,
}

/// OpenStack Object Storage (Swift) API v1
pub const OPENSTACK_SWIFT: ProviderMetadata = ProviderMetadata {
    id: "openstack-swift",
    name: "OpenStack Swift API",
    api_version: "1.0",
    default_service_type: "object-store",
    default_credential_type: CredentialType::PasswordCredentials,
};

/// OpenStack Database (RedDwarf) API v1
pub const OPENSTACK_REDDWARF: ProviderMetadata = ProviderMetadata {
    id: "openstack-reddwarf",
    name: "OpenStack RedDwarf API",
    api_version: "1",
    default_service_type: "database",
    default_credential_type: CredentialType::PasswordCredentials,
};

/// Settings used to open a session against a provider
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub provider: ProviderMetadata,
    /// Keystone endpoint, e.g. `http://localhost:5000/v2.0/`
    pub endpoint: Option<String>,
    /// `tenant:user` or a bare user name
    pub identity: Option<String>,
    pub credential: Option<String>,
    pub api_version: String,
    pub properties: BTreeMap<String, String>,
}

impl ApiConfig {
    pub fn for_provider(provider: &ProviderMetadata) -> Self {
        Self {
            provider: *provider,
            endpoint: None,
            identity: None,
            credential: None,
            api_version: provider.api_version.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Configured credential type, falling back to the provider default
    pub fn credential_type(&self) -> OpenStackResult<CredentialType> {
        match self.properties.get(KEYSTONE_CREDENTIAL_TYPE) {
            Some(value) => value.parse(),
            None => Ok(self.provider.default_credential_type),
        }
    }

    /// Configured service type, falling back to the provider default
    pub fn service_type(&self) -> &str {
        self.properties
            .get(KEYSTONE_SERVICE_TYPE)
            .map(String::as_str)
            .unwrap_or(self.provider.default_service_type)
    }

    /// First configured region, if any
    pub fn region(&self) -> Option<&str> {
        self.properties
            .get(REGIONS)?
            .split(',')
            .map(str::trim)
            .find(|region| !region.is_empty())
    }

    pub(crate) fn require_endpoint(&self) -> OpenStackResult<&str> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| OpenStackError::config_error(format!("{}: endpoint not set", self.provider.id)))
    }

    pub(crate) fn require_identity(&self) -> OpenStackResult<&str> {
        self.identity
            .as_deref()
            .ok_or_else(|| OpenStackError::config_error(format!("{}: identity not set", self.provider.id)))
    }

    pub(crate) fn require_credential(&self) -> OpenStackResult<&str> {
        self.credential
            .as_deref()
            .ok_or_else(|| OpenStackError::config_error(format!("{}: credential not set", self.provider.id)))
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("provider", &self.provider.id)
            .field("endpoint", &self.endpoint)
            .field("identity", &self.identity)
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .field("api_version", &self.api_version)
            .field("properties", &self.properties)
            .finish()
    }
}
