//! Scaffold for live tests against a running OpenStack deployment.
//!
//! Settings come from test properties named `test.<provider>.<name>` (and
//! `test.<key>` for arbitrary property keys). Each property is read from the
//! environment variable obtained by upper-casing the key and replacing `.` and
//! `-` with `_`, so `test.openstack-reddwarf.identity` is read from
//! `TEST_OPENSTACK_REDDWARF_IDENTITY`.

use crate::{
    client::OpenStackClient,
    config::{ApiConfig, ProviderMetadata},
    error::OpenStackResult,
    keystone::{KEYSTONE_CREDENTIAL_TYPE, KEYSTONE_SERVICE_TYPE, REGIONS},
};
use log::{debug, info};

/// Environment variable holding the test property `key`
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Per-provider live test settings
#[derive(Debug, Clone)]
pub struct ApiLiveTest {
    provider: ProviderMetadata,
    /// Property keys copied from `test.<key>` when present
    passthrough: Vec<&'static str>,
}

impl ApiLiveTest {
    /// Live test settings that forward the Keystone credential and service type
    pub fn new(provider: &ProviderMetadata) -> Self {
        Self {
            provider: *provider,
            passthrough: vec![KEYSTONE_CREDENTIAL_TYPE, KEYSTONE_SERVICE_TYPE, REGIONS],
        }
    }

    pub fn provider(&self) -> &ProviderMetadata {
        &self.provider
    }

    /// Build the API configuration from the process environment, loading `.env` first
    pub fn setup_properties(&self) -> ApiConfig {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded test environment from {}", path.display());
        }
        self.setup_properties_from(|key| std::env::var(env_var_name(key)).ok())
    }

    /// Build the API configuration from an arbitrary property lookup
    pub fn setup_properties_from<F>(&self, lookup: F) -> ApiConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider_key = |name: &str| format!("test.{}.{}", self.provider.id, name);

        let mut config = ApiConfig::for_provider(&self.provider);
        config.endpoint = lookup(&provider_key("endpoint"));
        config.identity = lookup(&provider_key("identity"));
        config.credential = lookup(&provider_key("credential"));
        if let Some(api_version) = lookup(&provider_key("api-version")) {
            config.api_version = api_version;
        }

        for key in &self.passthrough {
            set_if_test_property_present(&mut config, key, &lookup);
        }
        config
    }

    /// Whether the environment holds enough to reach a deployment: endpoint, identity and credential
    pub fn is_configured(&self, config: &ApiConfig) -> bool {
        config.endpoint.is_some() && config.identity.is_some() && config.credential.is_some()
    }

    /// Open a session with the provider using the environment configuration
    pub async fn connect(&self) -> OpenStackResult<OpenStackClient> {
        let config = self.setup_properties();
        info!("Connecting live test to {}", self.provider.name);
        OpenStackClient::connect(&config).await
    }
}

/// Copy `test.<key>` into `config` under `key` when the lookup has a value
pub fn set_if_test_property_present<F>(config: &mut ApiConfig, key: &str, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(&format!("test.{}", key)) {
        debug!("Test property {} = {}", key, value);
        config.properties.insert(key.to_string(), value);
    }
}
