use crate::{
    apis::numeric_header,
    client::OpenStackClient,
    error::{OpenStackError, OpenStackResult},
    models::Account,
};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::collections::BTreeMap;

pub const ACCOUNT_CONTAINER_COUNT: &str = "X-Account-Container-Count";
pub const ACCOUNT_BYTES_USED: &str = "X-Account-Bytes-Used";
const ACCOUNT_METADATA_PREFIX: &str = "X-Account-Meta-";
const ACCOUNT_REMOVE_METADATA_PREFIX: &str = "X-Remove-Account-Meta-";

/// Swift account operations
pub struct AccountApi<'a> {
    client: &'a OpenStackClient,
}

impl<'a> AccountApi<'a> {
    pub fn new(client: &'a OpenStackClient) -> Self {
        Self { client }
    }

    /// Retrieve account usage
    pub async fn get(&self) -> OpenStackResult<Account> {
        info!("Getting account metadata");
        let req = self.client.request(Method::HEAD, "").await?;
        let headers = self.client.execute_headers(req).await?;

        let account = Account::builder()
            .container_count(numeric_header(&headers, ACCOUNT_CONTAINER_COUNT)?)
            .bytes_used(numeric_header(&headers, ACCOUNT_BYTES_USED)?)
            .build();
        debug!("Account: {}", account);
        Ok(account)
    }

    /// Set or replace account metadata entries
    ///
    /// # Arguments
    /// * `metadata` - Keys without the `X-Account-Meta-` prefix
    pub async fn update_metadata(&self, metadata: &BTreeMap<String, String>) -> OpenStackResult<bool> {
        info!("Updating {} account metadata entries", metadata.len());
        let mut headers = HeaderMap::new();
        for (key, value) in metadata {
            let value = HeaderValue::from_str(value).map_err(|e| {
                OpenStackError::invalid_param(format!("metadata value for {}: {}", key, e))
            })?;
            headers.insert(metadata_header(ACCOUNT_METADATA_PREFIX, key)?, value);
        }

        let req = self.client.request(Method::POST, "").await?.headers(headers);
        let status = self.client.execute_status(req, &[]).await?;
        Ok(status.is_success())
    }

    /// Remove account metadata entries
    pub async fn delete_metadata<I, S>(&self, keys: I) -> OpenStackResult<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers = HeaderMap::new();
        for key in keys {
            headers.insert(
                metadata_header(ACCOUNT_REMOVE_METADATA_PREFIX, key.as_ref())?,
                HeaderValue::from_static("ignored"),
            );
        }
        info!("Removing {} account metadata entries", headers.len());

        let req = self.client.request(Method::POST, "").await?.headers(headers);
        let status = self.client.execute_status(req, &[]).await?;
        Ok(status.is_success())
    }
}

fn metadata_header(prefix: &str, key: &str) -> OpenStackResult<HeaderName> {
    HeaderName::from_bytes(format!("{}{}", prefix, key).as_bytes())
        .map_err(|e| OpenStackError::invalid_param(format!("metadata key {:?}: {}", key, e)))
}
